use actix_web::{web, HttpResponse, Responder};
use payment_sqlx::{TransactionStore, UserRecord, UserRole};
use std::str::FromStr;

use super::utils::{bad_request, internal_error, not_found};
use crate::types::transaction::{RoleUpdateRequest, UserResponse, UserWithPermissions};
use crate::utils::http_utils::normalize_address;
use crate::utils::role_utils::permissions;

fn with_permissions(user: UserRecord) -> UserResponse {
    UserResponse {
        data: UserWithPermissions {
            permissions: permissions(user.role).to_vec(),
            user,
        },
    }
}

#[utoipa::path(
    get,
    path = "/api/users/{address}",
    tag = "Users",
    responses(
        (status = 200, description = "User and the permissions of its role", body = UserResponse),
        (status = 404, description = "Data not found", body = crate::types::default::ErrorResponse),
    ),
    params(("address" = String, Path, description = "Wallet address"))
)]
pub async fn get_user<S: TransactionStore + 'static>(
    path: web::Path<String>,
    store: web::Data<S>,
) -> impl Responder {
    let address = normalize_address(&path.into_inner());

    match store.find_user(&address).await {
        Ok(Some(user)) => HttpResponse::Ok().json(with_permissions(user)),
        Ok(None) => not_found(),
        Err(err) => internal_error("find_user", &err),
    }
}

#[utoipa::path(
    patch,
    path = "/api/admin/users/{address}/role",
    tag = "Admin",
    request_body = RoleUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid role", body = crate::types::default::ErrorResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Data not found", body = crate::types::default::ErrorResponse),
    ),
    params(("address" = String, Path, description = "Wallet address"))
)]
pub async fn update_user_role<S: TransactionStore + 'static>(
    path: web::Path<String>,
    body: web::Json<RoleUpdateRequest>,
    store: web::Data<S>,
) -> impl Responder {
    let address = normalize_address(&path.into_inner());
    let role = match UserRole::from_str(&body.role) {
        Ok(role) => role,
        Err(msg) => return bad_request(&msg),
    };

    match store.update_user_role(&address, role).await {
        Ok(Some(user)) => {
            tracing::info!("User {} role set to {}", address, role);
            HttpResponse::Ok().json(with_permissions(user))
        }
        Ok(None) => not_found(),
        Err(err) => internal_error("update_user_role", &err),
    }
}
