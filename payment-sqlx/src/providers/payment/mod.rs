mod store;
pub mod types;

pub use types::{
    NewTransaction, TransactionFilter, TransactionRecord, TransactionStatus, TransactionSummary,
    TransactionType, UserRecord, UserRole,
};

use crate::providers::ProviderError;
use async_trait::async_trait;

/// Persistence operations over the transaction and user tables.
///
/// `create_transaction` must surface a uniqueness rejection on `tx_hash` as
/// [`ProviderError::DuplicateKey`] so callers can reconcile concurrent
/// deliveries of the same hash.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_transaction_by_hash(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionRecord>, ProviderError>;

    async fn find_or_create_user(&self, wallet_address: &str) -> Result<UserRecord, ProviderError>;

    async fn find_user(&self, wallet_address: &str) -> Result<Option<UserRecord>, ProviderError>;

    async fn create_transaction(
        &self,
        tx: &NewTransaction,
    ) -> Result<TransactionRecord, ProviderError>;

    async fn update_transaction_status(
        &self,
        tx_hash: &str,
        status: TransactionStatus,
    ) -> Result<Option<TransactionRecord>, ProviderError>;

    async fn update_user_role(
        &self,
        wallet_address: &str,
        role: UserRole,
    ) -> Result<Option<UserRecord>, ProviderError>;

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, ProviderError>;

    async fn transaction_summary(
        &self,
        address: Option<String>,
    ) -> Result<TransactionSummary, ProviderError>;
}
