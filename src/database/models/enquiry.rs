use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::domain::status::{CandidateStatus, UnknownStatus};

/// A prospective-student record tracked through the enrollment funnel.
/// candidate_status is stored as text; the governed label set lives in
/// domain::status and all mutation goes through the transition service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub current_location: Option<String>,
    pub package_id: Option<i32>,
    pub batch_id: Option<i32>,
    pub subject_ids: Vec<i32>,
    pub training_mode: Option<String>,
    pub training_time: Option<String>,
    pub start_time: Option<String>,
    pub profession: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub referral: Option<String>,
    pub consent: bool,
    pub candidate_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enquiry {
    pub fn status(&self) -> Result<CandidateStatus, UnknownStatus> {
        self.candidate_status.parse()
    }
}
