use axum::{response::Json, Extension};
use serde::Deserialize;

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::database::models::User;
use crate::database::users;
use crate::domain::Role;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub id: i32,
    pub new_password: String,
}

/// GET /api/users - list staff accounts, excluding the ADMIN itself
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<User>> {
    user.require_role(&[Role::Admin])?;

    let pool = DatabaseManager::pool().await?;
    let users = users::list_non_admin(pool).await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/users - create a staff account (ADMIN only)
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<User> {
    user.require_role(&[Role::Admin])?;

    let role: Role = payload
        .role
        .parse()
        .map_err(|e: crate::domain::role::UnknownRole| ApiError::bad_request(e.to_string()))?;

    let pool = DatabaseManager::pool().await?;

    if users::find_by_email(pool, &payload.email).await?.is_some() {
        return Err(ApiError::validation_error("User already exists", None));
    }
    if role == Role::Admin && users::admin_exists(pool).await? {
        return Err(ApiError::validation_error("Admin user already exists", None));
    }

    let hash = hash_password(payload.password).await?;
    let created = users::insert(pool, payload.name.as_deref(), &payload.email, &hash, role).await?;

    Ok(ApiResponse::created(created))
}

/// POST /api/users/change-password (ADMIN only)
pub async fn change_password(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<()> {
    user.require_role(&[Role::Admin])?;

    let pool = DatabaseManager::pool().await?;

    let hash = hash_password(payload.new_password).await?;
    let updated = users::update_password(pool, payload.id, &hash).await?;
    if !updated {
        return Err(ApiError::not_found("User not found"));
    }

    Ok(ApiResponse::success(()).with_message("Password changed successfully"))
}

async fn hash_password(password: String) -> Result<String, ApiError> {
    let cost = config::config().security.bcrypt_cost;
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?
        .map_err(|e| ApiError::internal_server_error(e.to_string()))
}
