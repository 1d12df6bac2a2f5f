use axum::{extract::Path, response::Json, Extension};

use crate::database::manager::DatabaseManager;
use crate::database::models::Package;
use crate::database::packages::{self, NewPackage, UpdatePackage};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/packages
pub async fn list(Extension(_user): Extension<AuthUser>) -> ApiResult<Vec<Package>> {
    let pool = DatabaseManager::pool().await?;
    let rows = packages::list_all(pool).await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/packages/:id
pub async fn get_by_id(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<Package> {
    let pool = DatabaseManager::pool().await?;
    let package = packages::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Package not found"))?;
    Ok(ApiResponse::success(package))
}

/// POST /api/packages
pub async fn create(
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<NewPackage>,
) -> ApiResult<Package> {
    let pool = DatabaseManager::pool().await?;
    let created = packages::insert(pool, &payload).await?;
    Ok(ApiResponse::created(created).with_message("Package created successfully"))
}

/// PUT /api/packages/:id
pub async fn update(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePackage>,
) -> ApiResult<Package> {
    let pool = DatabaseManager::pool().await?;
    let updated = packages::update(pool, id, &payload)
        .await?
        .ok_or_else(|| ApiError::not_found("Package not found"))?;
    Ok(ApiResponse::success(updated).with_message("Package updated successfully"))
}

/// DELETE /api/packages/:id
pub async fn delete(
    Extension(_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> ApiResult<()> {
    let pool = DatabaseManager::pool().await?;
    if !packages::delete(pool, id).await? {
        return Err(ApiError::not_found("Package not found"));
    }
    Ok(ApiResponse::success(()).with_message("Package deleted successfully"))
}
