use axum::{
    extract::Path,
    response::Json,
    Extension,
};
use serde::Deserialize;

use crate::database::enquiries::{self, NewEnquiry, PgEnquiryStore, UpdateEnquiry};
use crate::database::manager::DatabaseManager;
use crate::database::models::Enquiry;
use crate::domain::{CandidateStatus, Role};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::enquiry_service;

const WRITE_ROLES: &[Role] = &[Role::Admin, Role::Counsellor];
const STATUS_ROLES: &[Role] = &[Role::Admin, Role::Counsellor, Role::Hr, Role::Accounts];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub enquiry_id: i32,
    pub new_status: String,
}

/// GET /api/enquiries - all roles
pub async fn list(Extension(_user): Extension<AuthUser>) -> ApiResult<Vec<Enquiry>> {
    let pool = DatabaseManager::pool().await?;
    let rows = enquiries::list_all(pool).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/enquiries/:id - all roles
pub async fn get_by_id(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Enquiry> {
    let pool = DatabaseManager::pool().await?;
    let enquiry = enquiries::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Enquiry not found"))?;
    Ok(ApiResponse::success(enquiry))
}

/// POST /api/enquiries - ADMIN and COUNSELLOR; runs the duplicate guard
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewEnquiry>,
) -> ApiResult<Enquiry> {
    user.require_role(WRITE_ROLES)?;

    let pool = DatabaseManager::pool().await?;
    let store = PgEnquiryStore::new(pool.clone());
    let created = enquiry_service::create_enquiry(&store, &payload).await?;

    Ok(ApiResponse::created(created).with_message("Enquiry created successfully"))
}

/// PUT /api/enquiries/:id - ADMIN and COUNSELLOR. candidate_status is not
/// updatable here; only the change-status endpoint may move it.
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEnquiry>,
) -> ApiResult<Enquiry> {
    user.require_role(WRITE_ROLES)?;

    let pool = DatabaseManager::pool().await?;
    let updated = enquiries::update(pool, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Enquiry not found"))?;

    Ok(ApiResponse::success(updated).with_message("Enquiry updated successfully"))
}

/// DELETE /api/enquiries/:id - ADMIN and COUNSELLOR
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    user.require_role(WRITE_ROLES)?;

    let pool = DatabaseManager::pool().await?;
    let deleted = enquiries::delete(pool, id).await?;
    if !deleted {
        return Err(ApiError::not_found("Enquiry not found"));
    }

    Ok(ApiResponse::success(()).with_message("Enquiry deleted successfully"))
}

/// POST /api/enquiries/change-status - role-gated candidate-status
/// transition. The route gate admits the four staff roles that own funnel
/// stages; the per-transition decision happens in domain::status.
pub async fn change_status(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ChangeStatusRequest>,
) -> ApiResult<Enquiry> {
    user.require_role(STATUS_ROLES)?;

    // Reject labels outside the enumerated set before touching the table
    let requested: CandidateStatus = payload
        .new_status
        .parse()
        .map_err(|e: crate::domain::status::UnknownStatus| ApiError::bad_request(e.to_string()))?;

    let pool = DatabaseManager::pool().await?;
    let store = PgEnquiryStore::new(pool.clone());
    let updated =
        enquiry_service::change_status(&store, payload.enquiry_id, requested, user.role).await?;

    Ok(ApiResponse::success(updated).with_message("Enquiry status updated successfully"))
}
