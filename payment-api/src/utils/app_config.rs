use config::{Config, File, FileFormat};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_SIGNATURE_HEADER: &str = "x-provider-signature";
const DEFAULT_MAX_DB_CONNECTIONS: u32 = 5;

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_rust_log() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_owned()
}

fn default_max_db_connections() -> u32 {
    DEFAULT_MAX_DB_CONNECTIONS
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    pub database_url: Option<String>,
    pub aws_secret_db: Option<String>,
    pub aws_default_region: Option<String>,
    pub webhook_secret: Option<String>,
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
    #[serde(default)]
    pub run_migrations: bool,
    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
}

impl AppConfig {
    pub fn load_from_file(config_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let builder = Config::builder();
        let settings = builder
            .add_source(File::new(config_path, FileFormat::Yaml))
            .build()?;
        let config: AppConfig = settings.try_deserialize()?;

        Ok(config)
    }

    /// `WEBHOOK_SECRET` wins over the file; an empty value counts as unset.
    pub fn resolve_webhook_secret(&self) -> Option<String> {
        std::env::var("WEBHOOK_SECRET")
            .ok()
            .or_else(|| self.webhook_secret.clone())
            .filter(|secret| !secret.trim().is_empty())
    }
}
