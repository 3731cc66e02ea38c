use actix_web::{web, HttpResponse};

use crate::types::default::HealthCheckResponse;

/// Liveness probe. Does not touch the database.
#[utoipa::path(
    get,
    path = "/health",
    tag = "HealthCheck",
    responses(
        (status = 200, description = "Service is up", body = HealthCheckResponse)
    )
)]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthCheckResponse::ok())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/", web::get().to(health_check));
}
