use axum::{response::Json, Extension};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::database::enquiries;
use crate::database::manager::DatabaseManager;
use crate::database::models::Enquiry;
use crate::error::ApiError;
use crate::middleware::auth::AuthStudent;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct StudentLoginRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct StudentLoginResponse {
    pub token: String,
    pub student: Enquiry,
}

/// POST /api/enquiry-students/login - enquiries with candidate status
/// "class" or "class qualified" may log in with email alone.
pub async fn login(Json(payload): Json<StudentLoginRequest>) -> ApiResult<StudentLoginResponse> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::bad_request("Email is required"));
    }

    let pool = DatabaseManager::pool().await?;
    let enquiry = enquiries::find_enrolled_by_email(pool, &payload.email)
        .await?
        .ok_or_else(|| {
            ApiError::unauthorized(
                "Invalid credentials or enrollment not active. Only students with \
                 \"class\" or \"class qualified\" status can login.",
            )
        })?;

    let claims = Claims::enquiry_student(enquiry.id, &enquiry.email);
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    Ok(ApiResponse::success(StudentLoginResponse { token, student: enquiry })
        .with_message("Login successful"))
}

/// GET /api/enquiry-students/me - the student's own enquiry record. The
/// enrollment gate is re-checked here: a token outlives a status change.
pub async fn me(Extension(student): Extension<AuthStudent>) -> ApiResult<Enquiry> {
    let pool = DatabaseManager::pool().await?;
    let enquiry = enquiries::find_by_id(pool, student.enquiry_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Student record not found"))?;

    let enrolled = enquiry.status().map(|s| s.is_enrolled()).unwrap_or(false);
    if !enrolled {
        return Err(ApiError::forbidden(
            "Access denied. Only students with \"class\" or \"class qualified\" status \
             can access classroom.",
        ));
    }

    Ok(ApiResponse::success(enquiry))
}
