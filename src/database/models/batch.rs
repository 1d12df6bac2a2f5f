use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Instructor-submitted batches start as "pending"; admin/counsellor
/// created batches are "approved" immediately.
pub mod approval {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: i32,
    pub name: String,
    pub code: String,
    pub session_date: String,
    pub session_time: String,
    pub status: String,
    pub number_of_students: i32,
    pub session_link: Option<String>,
    pub approval_status: String,
    pub created_by: i32,
    pub subject_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
