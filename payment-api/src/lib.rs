pub mod handlers;
pub mod ingestion;
pub mod routes;
pub mod types;
pub mod utils;
