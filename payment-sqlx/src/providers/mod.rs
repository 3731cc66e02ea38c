pub mod payment;

use sqlx::{postgres::PgPoolOptions, Error as SqlxError, PgPool};
use tracing::info;

/// Opens the Postgres pool shared by every request handler.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, ProviderError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), ProviderError> {
    info!("Running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| ProviderError::DatabaseError(e.to_string()))
}

/// Generic errors for providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// A uniqueness constraint rejected the write.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Missing data error: {0}")]
    MissingDataError(String),
    #[error("Data value error: {0}")]
    DataValueError(String),
}

impl From<SqlxError> for ProviderError {
    fn from(e: SqlxError) -> Self {
        match &e {
            SqlxError::Database(db_err) if db_err.is_unique_violation() => {
                ProviderError::DuplicateKey(db_err.message().to_string())
            }
            _ => ProviderError::DatabaseError(e.to_string()),
        }
    }
}
