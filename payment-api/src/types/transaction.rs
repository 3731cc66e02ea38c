use payment_sqlx::{TransactionRecord, TransactionSummary, UserRecord};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::utils::role_utils::Permission;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct TransactionResponse {
    #[schema(value_type = Object)]
    pub data: TransactionRecord,
}

#[derive(ToSchema, Serialize, Deserialize)]
pub struct TransactionsResponse {
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<TransactionRecord>,
    pub next_page: Option<i64>,
}

#[derive(ToSchema, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[schema(example = "confirmed")]
    pub status: String,
}

#[derive(ToSchema, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    #[schema(example = "merchant")]
    pub role: String,
}

#[derive(ToSchema, Serialize)]
pub struct UserWithPermissions {
    #[schema(value_type = Object)]
    pub user: UserRecord,
    pub permissions: Vec<Permission>,
}

#[derive(ToSchema, Serialize)]
pub struct UserResponse {
    pub data: UserWithPermissions,
}

#[derive(ToSchema, Serialize, Deserialize)]
pub struct SummaryResponse {
    #[schema(value_type = Object)]
    pub data: TransactionSummary,
}
