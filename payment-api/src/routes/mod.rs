pub mod auth;

use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;
use payment_sqlx::TransactionStore;

use crate::handlers::{
    analytics_handler, default_handler, transaction_handler, user_handler, webhook_handler,
};

pub fn config<S: TransactionStore + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.configure(default_handler::configure)
        .service(
            web::resource("/api/webhooks/blockchain")
                .route(web::post().to(webhook_handler::receive_webhook::<S>))
                .route(web::get().to(webhook_handler::webhook_health)),
        )
        .route(
            "/api/transactions",
            web::get().to(transaction_handler::get_transactions::<S>),
        )
        .route(
            "/api/transactions/{tx_hash}",
            web::get().to(transaction_handler::get_transaction::<S>),
        )
        .route(
            "/api/users/{address}",
            web::get().to(user_handler::get_user::<S>),
        )
        .route(
            "/api/analytics/summary",
            web::get().to(analytics_handler::get_summary::<S>),
        )
        .service(
            web::scope("/api/admin")
                .wrap(HttpAuthentication::basic(auth::validator))
                .route(
                    "/transactions/{tx_hash}/status",
                    web::patch().to(transaction_handler::update_transaction_status::<S>),
                )
                .route(
                    "/users/{address}/role",
                    web::patch().to(user_handler::update_user_role::<S>),
                ),
        );
}
