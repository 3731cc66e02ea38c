//! Webhook ingestion: signature check, envelope parsing, classification and
//! idempotent persistence of blockchain transaction events.

pub mod classifier;
pub mod payload;
pub mod persister;
pub mod signature;

pub use classifier::classify;
pub use payload::{parse_envelope, CanonicalTransaction, PayloadError};
pub use persister::{persist_transaction, IngestError, IngestOutcome};
pub use signature::{SignatureVerifier, UnsignedPolicy};
