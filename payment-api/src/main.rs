mod api_doc;

use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer};
use anyhow::{anyhow, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_secretsmanager::Client as AwsClient;
use clap::Parser;
use payment_api::ingestion::SignatureVerifier;
use payment_api::routes;
use payment_api::utils::app_config::AppConfig;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{error, info};
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

// Default alocator change
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Receives blockchain webhook deliveries and serves the stored transactions
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    config_path: String,
}

/// Initializes the logging, ensuring that the `RUST_LOG` environment
/// variable is always considered first.
fn init_logging(default_filter: &str) {
    tracing::subscriber::set_global_default(
        fmt::Subscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .or(EnvFilter::try_new(default_filter))
                    .expect("Invalid RUST_LOG filters"),
            )
            .finish(),
    )
    .expect("Failed to set the global tracing subscriber");
}

#[derive(Deserialize)]
struct DatabaseCredentials {
    username: String,
    password: String,
    dbname: String,
    port: u16,
    host: String,
}

/// `DATABASE_URL`, then the config file, then the AWS secret.
async fn get_database_url(config: &AppConfig) -> Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    if let Some(url) = &config.database_url {
        return Ok(url.clone());
    }

    let secret = config
        .aws_secret_db
        .clone()
        .ok_or_else(|| anyhow!("No DATABASE_URL, database_url or aws_secret_db configured"))?;

    let region_provider = match &config.aws_default_region {
        Some(region) => RegionProviderChain::first_try(Region::new(region.clone())),
        None => RegionProviderChain::default_provider(),
    };
    let aws_config = aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await;
    let client = AwsClient::new(&aws_config);

    let secret_value = client
        .get_secret_value()
        .secret_id(secret)
        .send()
        .await?;
    let result = secret_value
        .secret_string()
        .ok_or_else(|| anyhow!("Database secret has no string value"))?;

    let creds: DatabaseCredentials = serde_json::from_str(result)?;
    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        creds.username, creds.password, creds.host, creds.port, creds.dbname
    ))
}

async fn connect_database(config: &AppConfig) -> Result<PgPool> {
    let database_url = get_database_url(config).await?;
    let pool = payment_sqlx::providers::connect(&database_url, config.max_db_connections).await?;
    if config.run_migrations {
        payment_sqlx::providers::run_migrations(&pool).await?;
    }
    Ok(pool)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let config = match AppConfig::load_from_file(&args.config_path) {
        Ok(config) => config,
        Err(error) => panic!("{:#?}", error),
    };
    init_logging(&config.rust_log);
    info!("Starting payment api on port {}", config.port);

    let db_pool = match connect_database(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to the database: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "Failed to connect to the database",
            ));
        }
    };

    let verifier = web::Data::new(SignatureVerifier::from_config(&config));
    let store = web::Data::new(db_pool);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(DefaultHeaders::new().add((
                "X-GIT-REVISION",
                option_env!("GIT_HASH").unwrap_or("N/A"),
            )))
            .app_data(verifier.clone())
            .app_data(store.clone())
            .configure(routes::config::<PgPool>)
            .service(api_doc::configure())
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
