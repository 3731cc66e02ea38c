pub mod app_config;
pub mod http_utils;
pub mod role_utils;
