use axum::{extract::Path, response::Json, Extension};

use crate::database::manager::DatabaseManager;
use crate::database::models::Subject;
use crate::database::subjects::{self, NewSubject, UpdateSubject};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/subjects
pub async fn list(Extension(_user): Extension<AuthUser>) -> ApiResult<Vec<Subject>> {
    let pool = DatabaseManager::pool().await?;
    let rows = subjects::list_all(pool).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/subjects/:id
pub async fn get_by_id(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Subject> {
    let pool = DatabaseManager::pool().await?;
    let subject = subjects::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject not found"))?;
    Ok(ApiResponse::success(subject))
}

/// POST /api/subjects
pub async fn create(
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<NewSubject>,
) -> ApiResult<Subject> {
    let pool = DatabaseManager::pool().await?;
    let created = subjects::insert(pool, &payload).await?;
    Ok(ApiResponse::created(created).with_message("Subject created successfully"))
}

/// PUT /api/subjects/:id
pub async fn update(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSubject>,
) -> ApiResult<Subject> {
    let pool = DatabaseManager::pool().await?;
    let updated = subjects::update(pool, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Subject not found"))?;
    Ok(ApiResponse::success(updated).with_message("Subject updated successfully"))
}

/// DELETE /api/subjects/:id
pub async fn delete(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    if !subjects::delete(pool, id).await? {
        return Err(ApiError::not_found("Subject not found"));
    }
    Ok(ApiResponse::success(()).with_message("Subject deleted successfully"))
}
