pub mod analytics_handler;
pub mod default_handler;
pub mod transaction_handler;
pub mod user_handler;
pub mod utils;
pub mod webhook_handler;
