use serde::Deserialize;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::batch::approval;
use crate::database::models::Batch;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBatch {
    pub name: String,
    pub code: String,
    pub session_date: String,
    pub session_time: String,
    pub status: Option<String>,
    pub number_of_students: Option<i32>,
    pub session_link: Option<String>,
    pub subject_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatch {
    pub name: Option<String>,
    pub code: Option<String>,
    pub session_date: Option<String>,
    pub session_time: Option<String>,
    pub status: Option<String>,
    pub number_of_students: Option<i32>,
    pub session_link: Option<String>,
    pub subject_id: Option<i32>,
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Batch>, DatabaseError> {
    let rows = sqlx::query_as::<_, Batch>("SELECT * FROM batches ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Instructors see their own submissions plus anything approved.
pub async fn list_for_instructor(pool: &PgPool, user_id: i32) -> Result<Vec<Batch>, DatabaseError> {
    let rows = sqlx::query_as::<_, Batch>(
        "SELECT * FROM batches WHERE created_by = $1 OR approval_status = $2 \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(approval::APPROVED)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_approved(pool: &PgPool) -> Result<Vec<Batch>, DatabaseError> {
    let rows = sqlx::query_as::<_, Batch>(
        "SELECT * FROM batches WHERE approval_status = $1 ORDER BY created_at DESC",
    )
    .bind(approval::APPROVED)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Batch>, DatabaseError> {
    let row = sqlx::query_as::<_, Batch>("SELECT * FROM batches WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn insert(
    pool: &PgPool,
    new: &NewBatch,
    approval_status: &str,
    created_by: i32,
) -> Result<Batch, DatabaseError> {
    let row = sqlx::query_as::<_, Batch>(
        r#"
        INSERT INTO batches (
            name, code, session_date, session_time, status,
            number_of_students, session_link, approval_status, created_by, subject_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&new.name)
    .bind(&new.code)
    .bind(&new.session_date)
    .bind(&new.session_time)
    .bind(new.status.as_deref().unwrap_or("yet to start"))
    .bind(new.number_of_students.unwrap_or(0))
    .bind(&new.session_link)
    .bind(approval_status)
    .bind(created_by)
    .bind(new.subject_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: &UpdateBatch,
) -> Result<Option<Batch>, DatabaseError> {
    let row = sqlx::query_as::<_, Batch>(
        r#"
        UPDATE batches SET
            name = COALESCE($2, name),
            code = COALESCE($3, code),
            session_date = COALESCE($4, session_date),
            session_time = COALESCE($5, session_time),
            status = COALESCE($6, status),
            number_of_students = COALESCE($7, number_of_students),
            session_link = COALESCE($8, session_link),
            subject_id = COALESCE($9, subject_id),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.code)
    .bind(&changes.session_date)
    .bind(&changes.session_time)
    .bind(&changes.status)
    .bind(changes.number_of_students)
    .bind(&changes.session_link)
    .bind(changes.subject_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn set_approval_status(
    pool: &PgPool,
    id: i32,
    approval_status: &str,
) -> Result<Option<Batch>, DatabaseError> {
    let row = sqlx::query_as::<_, Batch>(
        "UPDATE batches SET approval_status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(approval_status)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM batches WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
