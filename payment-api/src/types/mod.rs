pub mod default;
pub mod transaction;
pub mod webhook;
