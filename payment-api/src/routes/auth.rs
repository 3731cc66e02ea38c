use actix_web::dev::ServiceRequest;
use actix_web::{error, Error};
use actix_web_httpauth::extractors::basic::BasicAuth;

/// Basic auth guard for the administrative routes, checked against
/// `API_USER` / `API_PASSWORD`. Unset credentials reject everything.
pub async fn validator(
    req: ServiceRequest,
    credentials: BasicAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let user = std::env::var("API_USER").unwrap_or_default();
    let password = std::env::var("API_PASSWORD").unwrap_or_default();

    if !user.is_empty()
        && credentials.user_id() == user
        && credentials.password().unwrap_or_default() == password
    {
        Ok(req)
    } else {
        tracing::warn!("Rejected admin request for {}", req.path());
        Err((error::ErrorUnauthorized("Unauthorized"), req))
    }
}
