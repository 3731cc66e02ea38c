use payment_api::handlers::{
    analytics_handler, default_handler, transaction_handler, user_handler, webhook_handler,
};
use payment_api::types::default::{ErrorResponse, HealthCheckResponse};
use payment_api::types::transaction::{
    RoleUpdateRequest, StatusUpdateRequest, SummaryResponse, TransactionResponse,
    TransactionsResponse, UserResponse, UserWithPermissions,
};
use payment_api::types::webhook::{WebhookHealthResponse, WebhookProcessed, WebhookResponse};
use payment_api::utils::role_utils::Permission;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        default_handler::health_check,
        webhook_handler::receive_webhook,
        webhook_handler::webhook_health,
        transaction_handler::get_transactions,
        transaction_handler::get_transaction,
        transaction_handler::update_transaction_status,
        user_handler::get_user,
        user_handler::update_user_role,
        analytics_handler::get_summary,
    ),
    components(schemas(
        HealthCheckResponse,
        ErrorResponse,
        WebhookResponse,
        WebhookProcessed,
        WebhookHealthResponse,
        TransactionResponse,
        TransactionsResponse,
        StatusUpdateRequest,
        RoleUpdateRequest,
        UserResponse,
        UserWithPermissions,
        Permission,
        SummaryResponse,
    ))
)]
pub struct ApiDoc;

pub fn configure() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi())
}
