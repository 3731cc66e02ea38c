use actix_web::{web, HttpResponse, Responder};
use payment_sqlx::{TransactionFilter, TransactionStatus, TransactionStore, TransactionType};
use serde::Deserialize;
use std::str::FromStr;

use super::utils::{bad_request, extract_page_params, internal_error, not_found};
use crate::types::transaction::{StatusUpdateRequest, TransactionResponse, TransactionsResponse};
use crate::utils::http_utils::normalize_address;

#[derive(Deserialize, Debug)]
pub struct TransactionQueryParameters {
    address: Option<String>,
    status: Option<String>,
    #[serde(rename = "type")]
    tx_type: Option<String>,
    page: Option<i64>,
    items_per_page: Option<i64>,
}

fn build_filter(params: &TransactionQueryParameters) -> Result<TransactionFilter, String> {
    let (page, items_per_page) = extract_page_params(params.page, params.items_per_page);
    let filter = TransactionFilter {
        address: params.address.as_deref().map(normalize_address),
        status: params
            .status
            .as_deref()
            .map(TransactionStatus::from_str)
            .transpose()?,
        tx_type: params
            .tx_type
            .as_deref()
            .map(TransactionType::from_str)
            .transpose()?,
        page,
        items_per_page,
    };
    if filter.offset().is_none() {
        return Err(format!("page {} is out of range", page));
    }
    Ok(filter)
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "Stored transactions, newest first", body = TransactionsResponse),
        (status = 400, description = "Invalid filter", body = crate::types::default::ErrorResponse),
    ),
    params(
        ("address" = Option<String>, Query, description = "Sender or recipient address"),
        ("status" = Option<String>, Query, description = "pending, confirmed, completed, failed or cancelled"),
        ("type" = Option<String>, Query, description = "deposit, withdrawal, conversion, payment, transfer or refund"),
        ("page" = Option<i64>, Query, description = "Page number for pagination, defaults to 1"),
        ("items_per_page" = Option<i64>, Query, description = "Number of items per page, defaults to 20"),
    )
)]
pub async fn get_transactions<S: TransactionStore + 'static>(
    query_parameters: web::Query<TransactionQueryParameters>,
    store: web::Data<S>,
) -> impl Responder {
    let filter = match build_filter(&query_parameters) {
        Ok(filter) => filter,
        Err(msg) => return bad_request(&msg),
    };

    match store.list_transactions(&filter).await {
        Ok(data) => {
            let next_page = if data.len() as i64 == filter.items_per_page {
                Some(filter.page + 1)
            } else {
                None
            };
            HttpResponse::Ok().json(TransactionsResponse { data, next_page })
        }
        Err(err) => internal_error("list_transactions", &err),
    }
}

#[utoipa::path(
    get,
    path = "/api/transactions/{tx_hash}",
    tag = "Transactions",
    responses(
        (status = 200, description = "Stored transaction", body = TransactionResponse),
        (status = 404, description = "Data not found", body = crate::types::default::ErrorResponse),
    ),
    params(("tx_hash" = String, Path, description = "Transaction hash"))
)]
pub async fn get_transaction<S: TransactionStore + 'static>(
    path: web::Path<String>,
    store: web::Data<S>,
) -> impl Responder {
    let tx_hash = normalize_address(&path.into_inner());

    match store.find_transaction_by_hash(&tx_hash).await {
        Ok(Some(data)) => HttpResponse::Ok().json(TransactionResponse { data }),
        Ok(None) => not_found(),
        Err(err) => internal_error("find_transaction_by_hash", &err),
    }
}

#[utoipa::path(
    patch,
    path = "/api/admin/transactions/{tx_hash}/status",
    tag = "Admin",
    request_body = StatusUpdateRequest,
    responses(
        (status = 200, description = "Updated transaction", body = TransactionResponse),
        (status = 400, description = "Invalid status", body = crate::types::default::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Data not found", body = crate::types::default::ErrorResponse),
    ),
    params(("tx_hash" = String, Path, description = "Transaction hash"))
)]
pub async fn update_transaction_status<S: TransactionStore + 'static>(
    path: web::Path<String>,
    body: web::Json<StatusUpdateRequest>,
    store: web::Data<S>,
) -> impl Responder {
    let tx_hash = normalize_address(&path.into_inner());
    let status = match TransactionStatus::from_str(&body.status) {
        Ok(status) => status,
        Err(msg) => return bad_request(&msg),
    };

    match store.update_transaction_status(&tx_hash, status).await {
        Ok(Some(data)) => {
            tracing::info!("Transaction {} moved to {}", tx_hash, status);
            HttpResponse::Ok().json(TransactionResponse { data })
        }
        Ok(None) => not_found(),
        Err(err) => internal_error("update_transaction_status", &err),
    }
}
