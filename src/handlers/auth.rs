use axum::{response::Json, Extension};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::{generate_jwt, Claims};
use crate::database::manager::DatabaseManager;
use crate::database::users;
use crate::domain::Role;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// POST /api/auth/login - staff email + password, returns a staff JWT
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<LoginResponse> {
    let pool = DatabaseManager::pool().await?;

    // Same message whether the account is missing or the password is wrong
    let user = users::find_by_email(pool, &payload.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let password = payload.password;
    let hash = user.password.clone();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    if !valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let role = user.role().map_err(|e| {
        tracing::error!("User {} has unparseable role: {}", user.id, e);
        ApiError::internal_server_error("Account is misconfigured")
    })?;

    let claims = Claims::staff(user.id, &user.email, role);
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(ApiResponse::success(LoginResponse { token, role }).with_message("Login successful"))
}

/// GET /api/auth/validate-token - echoes the authenticated identity
pub async fn validate_token(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": user.id,
        "email": user.email,
        "role": user.role,
    })))
}
