use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Subject;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    pub name: String,
    pub code: String,
    pub image: Option<String>,
    pub overview: Option<String>,
    pub syllabus: Option<String>,
    pub prerequisites: Option<String>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubject {
    pub name: Option<String>,
    pub code: Option<String>,
    pub image: Option<String>,
    pub overview: Option<String>,
    pub syllabus: Option<String>,
    pub prerequisites: Option<String>,
    pub start_date: Option<NaiveDate>,
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Subject>, DatabaseError> {
    let rows = sqlx::query_as::<_, Subject>("SELECT * FROM subjects ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Subject>, DatabaseError> {
    let row = sqlx::query_as::<_, Subject>("SELECT * FROM subjects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, new: &NewSubject) -> Result<Subject, DatabaseError> {
    let row = sqlx::query_as::<_, Subject>(
        r#"
        INSERT INTO subjects (name, code, image, overview, syllabus, prerequisites, start_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&new.name)
    .bind(&new.code)
    .bind(&new.image)
    .bind(&new.overview)
    .bind(&new.syllabus)
    .bind(&new.prerequisites)
    .bind(new.start_date)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: &UpdateSubject,
) -> Result<Option<Subject>, DatabaseError> {
    let row = sqlx::query_as::<_, Subject>(
        r#"
        UPDATE subjects SET
            name = COALESCE($2, name),
            code = COALESCE($3, code),
            image = COALESCE($4, image),
            overview = COALESCE($5, overview),
            syllabus = COALESCE($6, syllabus),
            prerequisites = COALESCE($7, prerequisites),
            start_date = COALESCE($8, start_date),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.code)
    .bind(&changes.image)
    .bind(&changes.overview)
    .bind(&changes.syllabus)
    .bind(&changes.prerequisites)
    .bind(changes.start_date)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
