use actix_web::HttpResponse;
use payment_sqlx::ProviderError;

use crate::types::default::ErrorResponse;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_ITEMS_PER_PAGE: i64 = 20;
pub const MAX_ITEMS_PER_PAGE: i64 = 100;

/// Clamps the page parameters to the supported range.
pub fn extract_page_params(page: Option<i64>, items_per_page: Option<i64>) -> (i64, i64) {
    (
        page.unwrap_or(DEFAULT_PAGE).max(1),
        items_per_page
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
            .clamp(1, MAX_ITEMS_PER_PAGE),
    )
}

pub fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new(message))
}

pub fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new("data not found"))
}

/// Logs the cause server side and answers with a generic message.
pub fn internal_error(context: &str, err: &ProviderError) -> HttpResponse {
    tracing::error!("error query {}: {}", context, err);
    HttpResponse::InternalServerError().json(ErrorResponse::new("Internal server error"))
}
