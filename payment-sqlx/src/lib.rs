pub mod providers;

pub use providers::payment::{
    NewTransaction, TransactionFilter, TransactionRecord, TransactionStatus, TransactionStore,
    TransactionSummary, TransactionType, UserRecord, UserRole,
};
#[cfg(feature = "mock")]
pub use providers::payment::MockTransactionStore;
pub use providers::ProviderError;
