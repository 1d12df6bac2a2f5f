use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::User;
use crate::domain::Role;

/// Listing excludes the ADMIN account itself.
pub async fn list_non_admin(pool: &PgPool) -> Result<Vec<User>, DatabaseError> {
    let rows = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE role <> $1 ORDER BY created_at DESC",
    )
    .bind(Role::Admin.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, DatabaseError> {
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, DatabaseError> {
    let row = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The system allows exactly one ADMIN account.
pub async fn admin_exists(pool: &PgPool) -> Result<bool, DatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
        .bind(Role::Admin.as_str())
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn insert(
    pool: &PgPool,
    name: Option<&str>,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, DatabaseError> {
    let row = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update_password(
    pool: &PgPool,
    id: i32,
    password_hash: &str,
) -> Result<bool, DatabaseError> {
    let result =
        sqlx::query("UPDATE users SET password = $1, updated_at = now() WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(pool)
            .await?;
    Ok(result.rows_affected() > 0)
}
