use actix_web::{web, HttpResponse, Responder};
use payment_sqlx::TransactionStore;
use serde::Deserialize;

use super::utils::internal_error;
use crate::types::transaction::SummaryResponse;
use crate::utils::http_utils::normalize_address;

#[derive(Deserialize, Debug)]
pub struct SummaryQueryParameters {
    address: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    tag = "Analytics",
    responses(
        (status = 200, description = "Counts and volumes grouped by status and type", body = SummaryResponse)
    ),
    params(
        ("address" = Option<String>, Query, description = "Restrict to a sender or recipient address"),
    )
)]
pub async fn get_summary<S: TransactionStore + 'static>(
    query_parameters: web::Query<SummaryQueryParameters>,
    store: web::Data<S>,
) -> impl Responder {
    let address = query_parameters.address.as_deref().map(normalize_address);

    match store.transaction_summary(address).await {
        Ok(data) => HttpResponse::Ok().json(SummaryResponse { data }),
        Err(err) => internal_error("transaction_summary", &err),
    }
}
