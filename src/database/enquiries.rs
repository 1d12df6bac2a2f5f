use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Enquiry;
use crate::domain::CandidateStatus;
use crate::services::enquiry_service::EnquiryStore;

/// Creation payload. candidate_status is not accepted here: new enquiries
/// always start in "demo" and only the transition service may move them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEnquiry {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_location: Option<String>,
    pub package_id: Option<i32>,
    pub batch_id: Option<i32>,
    #[serde(default)]
    pub subject_ids: Vec<i32>,
    pub training_mode: Option<String>,
    pub training_time: Option<String>,
    pub start_time: Option<String>,
    pub profession: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub referral: Option<String>,
    #[serde(default)]
    pub consent: bool,
}

/// Partial update; None fields keep their stored values. candidate_status
/// is deliberately absent (see services::enquiry_service::change_status).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnquiry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub current_location: Option<String>,
    pub package_id: Option<i32>,
    pub batch_id: Option<i32>,
    pub subject_ids: Option<Vec<i32>>,
    pub training_mode: Option<String>,
    pub training_time: Option<String>,
    pub start_time: Option<String>,
    pub profession: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub referral: Option<String>,
    pub consent: Option<bool>,
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Enquiry>, DatabaseError> {
    let rows = sqlx::query_as::<_, Enquiry>("SELECT * FROM enquiries ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Enquiry>, DatabaseError> {
    let row = sqlx::query_as::<_, Enquiry>("SELECT * FROM enquiries WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Duplicate guard lookup: matches on email OR phone (when a phone is
/// supplied), not both.
pub async fn find_by_email_or_phone(
    pool: &PgPool,
    email: &str,
    phone: Option<&str>,
) -> Result<Option<Enquiry>, DatabaseError> {
    let row = sqlx::query_as::<_, Enquiry>(
        "SELECT * FROM enquiries WHERE email = $1 OR ($2::text IS NOT NULL AND phone = $2) LIMIT 1",
    )
    .bind(email)
    .bind(phone)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Student login lookup: email match restricted to actively enrolled
/// statuses ("class" / "class qualified").
pub async fn find_enrolled_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<Enquiry>, DatabaseError> {
    let row = sqlx::query_as::<_, Enquiry>(
        "SELECT * FROM enquiries WHERE email = $1 AND candidate_status = ANY($2) LIMIT 1",
    )
    .bind(email)
    .bind(vec![
        CandidateStatus::Class.as_str(),
        CandidateStatus::ClassQualified.as_str(),
    ])
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn insert(pool: &PgPool, new: &NewEnquiry) -> Result<Enquiry, DatabaseError> {
    let row = sqlx::query_as::<_, Enquiry>(
        r#"
        INSERT INTO enquiries (
            name, email, phone, current_location, package_id, batch_id,
            subject_ids, training_mode, training_time, start_time,
            profession, qualification, experience, referral, consent,
            candidate_status
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING *
        "#,
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.phone)
    .bind(&new.current_location)
    .bind(new.package_id)
    .bind(new.batch_id)
    .bind(&new.subject_ids)
    .bind(&new.training_mode)
    .bind(&new.training_time)
    .bind(&new.start_time)
    .bind(&new.profession)
    .bind(&new.qualification)
    .bind(&new.experience)
    .bind(&new.referral)
    .bind(new.consent)
    .bind(CandidateStatus::default().as_str())
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: &UpdateEnquiry,
) -> Result<Option<Enquiry>, DatabaseError> {
    let row = sqlx::query_as::<_, Enquiry>(
        r#"
        UPDATE enquiries SET
            name = COALESCE($2, name),
            email = COALESCE($3, email),
            phone = COALESCE($4, phone),
            current_location = COALESCE($5, current_location),
            package_id = COALESCE($6, package_id),
            batch_id = COALESCE($7, batch_id),
            subject_ids = COALESCE($8, subject_ids),
            training_mode = COALESCE($9, training_mode),
            training_time = COALESCE($10, training_time),
            start_time = COALESCE($11, start_time),
            profession = COALESCE($12, profession),
            qualification = COALESCE($13, qualification),
            experience = COALESCE($14, experience),
            referral = COALESCE($15, referral),
            consent = COALESCE($16, consent),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(&changes.phone)
    .bind(&changes.current_location)
    .bind(changes.package_id)
    .bind(changes.batch_id)
    .bind(&changes.subject_ids)
    .bind(&changes.training_mode)
    .bind(&changes.training_time)
    .bind(&changes.start_time)
    .bind(&changes.profession)
    .bind(&changes.qualification)
    .bind(&changes.experience)
    .bind(&changes.referral)
    .bind(changes.consent)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM enquiries WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Atomic conditional status write. The WHERE clause re-checks the status
/// the decision was made against, so two racing transitions cannot both
/// win: the loser affects zero rows.
pub async fn compare_and_set_status(
    pool: &PgPool,
    id: i32,
    from: CandidateStatus,
    to: CandidateStatus,
) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "UPDATE enquiries SET candidate_status = $1, updated_at = now() \
         WHERE id = $2 AND candidate_status = $3",
    )
    .bind(to.as_str())
    .bind(id)
    .bind(from.as_str())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// sqlx-backed store used by the enquiry service in production.
pub struct PgEnquiryStore {
    pool: PgPool,
}

impl PgEnquiryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnquiryStore for PgEnquiryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Enquiry>, DatabaseError> {
        find_by_id(&self.pool, id).await
    }

    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<Enquiry>, DatabaseError> {
        find_by_email_or_phone(&self.pool, email, phone).await
    }

    async fn insert(&self, new: &NewEnquiry) -> Result<Enquiry, DatabaseError> {
        insert(&self.pool, new).await
    }

    async fn compare_and_set_status(
        &self,
        id: i32,
        from: CandidateStatus,
        to: CandidateStatus,
    ) -> Result<bool, DatabaseError> {
        compare_and_set_status(&self.pool, id, from, to).await
    }
}
