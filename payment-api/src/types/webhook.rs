use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookProcessed {
    pub processed: bool,
    pub tx_hash: String,
    pub transaction_id: Uuid,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct WebhookResponse {
    pub success: bool,
    pub data: WebhookProcessed,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct WebhookHealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
}
