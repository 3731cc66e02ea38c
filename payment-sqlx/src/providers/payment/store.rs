use super::types::SummaryRow;
use super::{
    NewTransaction, TransactionFilter, TransactionRecord, TransactionStatus, TransactionStore,
    TransactionSummary, UserRecord, UserRole,
};
use crate::providers::ProviderError;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::trace;
use uuid::Uuid;

const TRANSACTION_COLUMNS: &str = r#"
    id, tx_hash, block_number, wallet_timestamp, network, chain_id,
    from_address, to_address, token_symbol, token_address, token_amount, token_decimals,
    fiat_currency, fiat_amount, exchange_rate, gas_used, gas_price, gas_fee,
    status, tx_type, user_id, created_at, updated_at
"#;

const USER_COLUMNS: &str = "id, wallet_address, role, created_at, updated_at";

#[async_trait]
impl TransactionStore for PgPool {
    async fn find_transaction_by_hash(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionRecord>, ProviderError> {
        let query = format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE tx_hash = $1");

        let tx = sqlx::query_as::<_, TransactionRecord>(&query)
            .bind(tx_hash)
            .fetch_optional(self)
            .await?;

        Ok(tx)
    }

    async fn find_or_create_user(&self, wallet_address: &str) -> Result<UserRecord, ProviderError> {
        trace!("Resolving user for {}", wallet_address);

        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            r#"
            INSERT INTO users (id, wallet_address, role, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (wallet_address) DO UPDATE
            SET wallet_address = EXCLUDED.wallet_address
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(Uuid::new_v4())
            .bind(wallet_address)
            .bind(UserRole::default())
            .fetch_one(self)
            .await?;

        Ok(user)
    }

    async fn find_user(&self, wallet_address: &str) -> Result<Option<UserRecord>, ProviderError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE wallet_address = $1");

        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(wallet_address)
            .fetch_optional(self)
            .await?;

        Ok(user)
    }

    async fn create_transaction(
        &self,
        tx: &NewTransaction,
    ) -> Result<TransactionRecord, ProviderError> {
        trace!("Inserting transaction {}", tx.tx_hash);

        // No ON CONFLICT clause: a concurrent insert of the same hash must fail
        // with a unique violation, mapped to ProviderError::DuplicateKey.
        let query = format!(
            r#"
            INSERT INTO transactions (
                id, tx_hash, block_number, wallet_timestamp, network, chain_id,
                from_address, to_address, token_symbol, token_address, token_amount, token_decimals,
                fiat_currency, fiat_amount, exchange_rate, gas_used, gas_price, gas_fee,
                status, tx_type, user_id, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, NOW(), NOW()
            )
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, TransactionRecord>(&query)
            .bind(Uuid::new_v4())
            .bind(&tx.tx_hash)
            .bind(tx.block_number)
            .bind(tx.wallet_timestamp)
            .bind(&tx.network)
            .bind(tx.chain_id)
            .bind(&tx.from_address)
            .bind(&tx.to_address)
            .bind(&tx.token_symbol)
            .bind(&tx.token_address)
            .bind(&tx.token_amount)
            .bind(tx.token_decimals)
            .bind(&tx.fiat_currency)
            .bind(&tx.fiat_amount)
            .bind(&tx.exchange_rate)
            .bind(&tx.gas_used)
            .bind(&tx.gas_price)
            .bind(&tx.gas_fee)
            .bind(tx.status)
            .bind(tx.tx_type)
            .bind(tx.user_id)
            .fetch_one(self)
            .await?;

        Ok(record)
    }

    async fn update_transaction_status(
        &self,
        tx_hash: &str,
        status: TransactionStatus,
    ) -> Result<Option<TransactionRecord>, ProviderError> {
        let query = format!(
            r#"
            UPDATE transactions
            SET status = $2, updated_at = NOW()
            WHERE tx_hash = $1
            RETURNING {TRANSACTION_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, TransactionRecord>(&query)
            .bind(tx_hash)
            .bind(status)
            .fetch_optional(self)
            .await?;

        Ok(record)
    }

    async fn update_user_role(
        &self,
        wallet_address: &str,
        role: UserRole,
    ) -> Result<Option<UserRecord>, ProviderError> {
        let query = format!(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE wallet_address = $1
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, UserRecord>(&query)
            .bind(wallet_address)
            .bind(role)
            .fetch_optional(self)
            .await?;

        Ok(user)
    }

    async fn list_transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Vec<TransactionRecord>, ProviderError> {
        let query = format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM transactions
            WHERE ($1::text IS NULL OR from_address = $1 OR to_address = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR tx_type = $3)
            ORDER BY wallet_timestamp DESC, created_at DESC
            LIMIT $4 OFFSET $5
            "#
        );

        let offset = filter.offset().ok_or_else(|| {
            ProviderError::DataValueError(format!("page {} is out of range", filter.page))
        })?;

        let txs = sqlx::query_as::<_, TransactionRecord>(&query)
            .bind(&filter.address)
            .bind(filter.status)
            .bind(filter.tx_type)
            .bind(filter.items_per_page)
            .bind(offset)
            .fetch_all(self)
            .await?;

        Ok(txs)
    }

    async fn transaction_summary(
        &self,
        address: Option<String>,
    ) -> Result<TransactionSummary, ProviderError> {
        let query = r#"
            SELECT
                status,
                tx_type,
                COUNT(*) AS count,
                COALESCE(SUM(token_amount), 0) AS token_volume,
                COALESCE(SUM(gas_fee), 0) AS gas_fees
            FROM transactions
            WHERE ($1::text IS NULL OR from_address = $1 OR to_address = $1)
            GROUP BY status, tx_type
        "#;

        let rows = sqlx::query_as::<_, SummaryRow>(query)
            .bind(address)
            .fetch_all(self)
            .await?;

        Ok(TransactionSummary::from_rows(rows))
    }
}
