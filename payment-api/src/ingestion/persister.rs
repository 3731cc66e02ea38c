use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use payment_sqlx::{
    NewTransaction, ProviderError, TransactionRecord, TransactionStatus, TransactionStore,
};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::classifier::classify;
use super::payload::{CanonicalTransaction, ExecutionOutcome};
use crate::utils::http_utils::to_big_decimal;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("Transaction {0} was rejected as duplicate but cannot be read back")]
    ConflictUnresolved(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub record: TransactionRecord,
    /// True when the hash was already stored; nothing was written.
    pub duplicate: bool,
}

pub fn status_for(outcome: ExecutionOutcome) -> TransactionStatus {
    match outcome {
        ExecutionOutcome::Success => TransactionStatus::Completed,
        ExecutionOutcome::Failure => TransactionStatus::Failed,
        ExecutionOutcome::Unknown => TransactionStatus::Pending,
    }
}

pub fn gas_fee(gas_used: &BigUint, gas_price: &BigUint) -> BigUint {
    gas_used * gas_price
}

pub fn build_new_transaction(
    tx: &CanonicalTransaction,
    user_id: Uuid,
    received_at: DateTime<Utc>,
) -> NewTransaction {
    NewTransaction {
        tx_hash: tx.tx_hash.clone(),
        block_number: tx.block_number,
        wallet_timestamp: tx.wallet_timestamp.unwrap_or(received_at),
        network: tx.network.clone(),
        chain_id: tx.chain_id,
        from_address: tx.from_address.clone(),
        to_address: tx.to_address.clone(),
        token_symbol: tx.token.symbol.clone(),
        token_address: tx.token.address.clone(),
        token_amount: to_big_decimal(&tx.value),
        token_decimals: tx.token.decimals as i32,
        fiat_currency: None,
        fiat_amount: None,
        exchange_rate: None,
        gas_used: to_big_decimal(&tx.gas_used),
        gas_price: to_big_decimal(&tx.gas_price),
        gas_fee: to_big_decimal(&gas_fee(&tx.gas_used, &tx.gas_price)),
        status: status_for(tx.outcome),
        tx_type: classify(&tx.value, tx.has_call_data),
        user_id,
    }
}

/// Stores `tx` once. A hash already present (or inserted concurrently by
/// another delivery) yields the stored record untouched.
pub async fn persist_transaction<S>(
    store: &S,
    tx: &CanonicalTransaction,
) -> Result<IngestOutcome, IngestError>
where
    S: TransactionStore + ?Sized,
{
    if let Some(record) = store.find_transaction_by_hash(&tx.tx_hash).await? {
        debug!("Transaction {} already processed", tx.tx_hash);
        return Ok(IngestOutcome {
            record,
            duplicate: true,
        });
    }

    let user = store.find_or_create_user(&tx.from_address).await?;
    let new_tx = build_new_transaction(tx, user.id, Utc::now());

    match store.create_transaction(&new_tx).await {
        Ok(record) => {
            info!(
                "Stored transaction {} as {} / {}",
                record.tx_hash, record.tx_type, record.status
            );
            Ok(IngestOutcome {
                record,
                duplicate: false,
            })
        }
        Err(ProviderError::DuplicateKey(reason)) => {
            warn!(
                "Concurrent delivery stored {} first ({}), returning stored record",
                tx.tx_hash, reason
            );
            let record = store
                .find_transaction_by_hash(&tx.tx_hash)
                .await?
                .ok_or_else(|| IngestError::ConflictUnresolved(tx.tx_hash.clone()))?;
            Ok(IngestOutcome {
                record,
                duplicate: true,
            })
        }
        Err(e) => Err(e.into()),
    }
}
