use axum::{extract::Path, response::Json, Extension};
use serde::Deserialize;

use crate::database::batches::{self, NewBatch, UpdateBatch};
use crate::database::manager::DatabaseManager;
use crate::database::models::batch::approval;
use crate::database::models::Batch;
use crate::database::subjects;
use crate::domain::Role;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalStatusRequest {
    pub approval_status: String,
}

/// POST /api/batches/create - instructors submit for approval,
/// admin/counsellor create directly as approved.
pub async fn create(
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<NewBatch>,
) -> ApiResult<Batch> {
    let pool = DatabaseManager::pool().await?;

    // Subject existence is mandatory for a batch
    if subjects::find_by_id(pool, payload.subject_id).await?.is_none() {
        return Err(ApiError::bad_request(
            "Cannot create batch. The specified subject does not exist. \
             Please create or select a valid subject first.",
        ));
    }

    let approval_status = match user.role {
        Role::Admin | Role::Counsellor => approval::APPROVED,
        _ => approval::PENDING,
    };

    let batch = batches::insert(pool, &payload, approval_status, user.id).await?;

    let message = if approval_status == approval::PENDING {
        "Batch created successfully and sent for approval"
    } else {
        "Batch created successfully"
    };
    Ok(ApiResponse::created(batch).with_message(message))
}

/// GET /api/batches - instructors see their own plus approved batches;
/// admin/counsellor see everything; other roles are denied.
pub async fn list(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Batch>> {
    let pool = DatabaseManager::pool().await?;

    let rows = match user.role {
        Role::Instructor => batches::list_for_instructor(pool, user.id).await?,
        Role::Admin | Role::Counsellor => batches::list_all(pool).await?,
        _ => return Err(ApiError::forbidden("Access denied")),
    };

    Ok(ApiResponse::success(rows))
}

/// GET /api/batches/available-batches - approved batches, instructors only
pub async fn available(Extension(user): Extension<AuthUser>) -> ApiResult<Vec<Batch>> {
    if user.role != Role::Instructor {
        return Err(ApiError::forbidden("Only instructors can view available batches"));
    }

    let pool = DatabaseManager::pool().await?;
    let rows = batches::list_approved(pool).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/batches/:id
pub async fn get_by_id(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Batch> {
    let pool = DatabaseManager::pool().await?;
    let batch = batches::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Batch not found"))?;
    Ok(ApiResponse::success(batch))
}

/// PUT /api/batches/:id - instructors may only touch their own submissions
pub async fn update(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBatch>,
) -> ApiResult<Batch> {
    let pool = DatabaseManager::pool().await?;

    let existing = batches::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Batch not found"))?;
    if user.role == Role::Instructor && existing.created_by != user.id {
        return Err(ApiError::forbidden("Access denied"));
    }

    let updated = batches::update(pool, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Batch not found"))?;
    Ok(ApiResponse::success(updated).with_message("Batch updated successfully"))
}

/// PATCH /api/batches/:id/approval-status - ADMIN and COUNSELLOR
pub async fn set_approval_status(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<ApprovalStatusRequest>,
) -> ApiResult<Batch> {
    user.require_role(&[Role::Admin, Role::Counsellor])?;

    let value = payload.approval_status.as_str();
    if value != approval::APPROVED && value != approval::REJECTED && value != approval::PENDING {
        return Err(ApiError::bad_request(
            "approvalStatus must be one of: pending, approved, rejected",
        ));
    }

    let pool = DatabaseManager::pool().await?;
    let updated = batches::set_approval_status(pool, id, value)
        .await?
        .ok_or_else(|| ApiError::not_found("Batch not found"))?;
    Ok(ApiResponse::success(updated).with_message("Batch approval status updated"))
}

/// DELETE /api/batches/:id - instructors may only delete their own
pub async fn delete(
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;

    let existing = batches::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Batch not found"))?;
    if user.role == Role::Instructor && existing.created_by != user.id {
        return Err(ApiError::forbidden("Access denied"));
    }

    if !batches::delete(pool, id).await? {
        return Err(ApiError::not_found("Batch not found"));
    }
    Ok(ApiResponse::success(()).with_message("Batch deleted successfully"))
}
