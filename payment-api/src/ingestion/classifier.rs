use num_bigint::BigUint;
use num_traits::Zero;
use payment_sqlx::TransactionType;
use tracing::trace;

/// Coarse type of an ingested transaction.
///
/// Only distinguishes a native value transfer from everything else: call data
/// is not decoded, so zero-value contract calls (swaps, token moves, escrow
/// operations) all land in `Conversion` until contract-call decoding exists.
pub fn classify(value: &BigUint, has_call_data: bool) -> TransactionType {
    if !value.is_zero() {
        return TransactionType::Transfer;
    }
    if !has_call_data {
        trace!("Zero value transaction without call data");
    }
    TransactionType::Conversion
}
