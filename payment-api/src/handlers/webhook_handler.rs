use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use payment_sqlx::TransactionStore;
use tracing::{error, info, warn};

use crate::ingestion::{parse_envelope, persist_transaction, SignatureVerifier};
use crate::types::default::ErrorResponse;
use crate::types::webhook::{WebhookHealthResponse, WebhookProcessed, WebhookResponse};

pub const SERVICE_NAME: &str = "blockchain-webhook";

#[utoipa::path(
    post,
    path = "/api/webhooks/blockchain",
    tag = "Webhooks",
    request_body(content = String, description = "Provider address-activity envelope", content_type = "application/json"),
    responses(
        (status = 200, description = "Transaction processed", body = WebhookResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 401, description = "Invalid signature", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn receive_webhook<S: TransactionStore + 'static>(
    req: HttpRequest,
    body: web::Bytes,
    verifier: web::Data<SignatureVerifier>,
    store: web::Data<S>,
) -> impl Responder {
    let signature = req
        .headers()
        .get(verifier.header_name())
        .and_then(|value| value.to_str().ok());

    if !verifier.verify(&body, signature) {
        warn!(
            "Rejected webhook delivery: invalid signature (header present: {})",
            signature.is_some()
        );
        return HttpResponse::Unauthorized().json(ErrorResponse::new("Invalid signature"));
    }

    let tx = match parse_envelope(&body) {
        Ok(tx) => tx,
        Err(err) => {
            warn!("Rejected webhook delivery: {}", err);
            return HttpResponse::BadRequest().json(ErrorResponse::new("Invalid payload"));
        }
    };

    info!(
        "Webhook delivery for transaction {} on {}",
        tx.tx_hash, tx.network
    );

    match persist_transaction(store.get_ref(), &tx).await {
        Ok(outcome) => HttpResponse::Ok().json(WebhookResponse {
            success: true,
            data: WebhookProcessed {
                processed: true,
                tx_hash: outcome.record.tx_hash,
                transaction_id: outcome.record.id,
            },
        }),
        Err(err) => {
            error!("Failed to persist transaction {}: {}", tx.tx_hash, err);
            HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/webhooks/blockchain",
    tag = "Webhooks",
    responses(
        (status = 200, description = "Webhook receiver health", body = WebhookHealthResponse)
    )
)]
pub async fn webhook_health() -> impl Responder {
    HttpResponse::Ok().json(WebhookHealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
    })
}
