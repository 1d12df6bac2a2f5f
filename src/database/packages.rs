use bigdecimal::BigDecimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Package;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    pub name: String,
    pub description: Option<String>,
    pub price: BigDecimal,
    pub duration: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePackage {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub duration: Option<String>,
    pub image: Option<String>,
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Package>, DatabaseError> {
    let rows = sqlx::query_as::<_, Package>("SELECT * FROM packages ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Package>, DatabaseError> {
    let row = sqlx::query_as::<_, Package>("SELECT * FROM packages WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, new: &NewPackage) -> Result<Package, DatabaseError> {
    let row = sqlx::query_as::<_, Package>(
        r#"
        INSERT INTO packages (name, description, price, duration, image)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.price)
    .bind(&new.duration)
    .bind(&new.image)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: &UpdatePackage,
) -> Result<Option<Package>, DatabaseError> {
    let row = sqlx::query_as::<_, Package>(
        r#"
        UPDATE packages SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            price = COALESCE($4, price),
            duration = COALESCE($5, duration),
            image = COALESCE($6, image),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.price)
    .bind(&changes.duration)
    .bind(&changes.image)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM packages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
