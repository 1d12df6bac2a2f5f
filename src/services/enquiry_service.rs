use async_trait::async_trait;
use thiserror::Error;

use crate::database::enquiries::NewEnquiry;
use crate::database::manager::DatabaseError;
use crate::database::models::Enquiry;
use crate::domain::{authorize_transition, CandidateStatus, Role};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{message}")]
    Validation {
        message: String,
        /// (field name, detail) for field-level reporting
        field: Option<(String, String)>,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Persistence seam for the enquiry service. The production implementation
/// is PgEnquiryStore; tests run against an in-memory store so the
/// decide-then-apply sequence is checkable without a database.
#[async_trait]
pub trait EnquiryStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Enquiry>, DatabaseError>;

    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<Enquiry>, DatabaseError>;

    async fn insert(&self, new: &NewEnquiry) -> Result<Enquiry, DatabaseError>;

    /// Write `to` only if the stored status still equals `from`; reports
    /// whether a row was updated.
    async fn compare_and_set_status(
        &self,
        id: i32,
        from: CandidateStatus,
        to: CandidateStatus,
    ) -> Result<bool, DatabaseError>;
}

/// Uniqueness guard + insert. Creation is rejected when an existing enquiry
/// shares the email or the phone number (either one), and the response
/// names the field that collided.
pub async fn create_enquiry(
    store: &dyn EnquiryStore,
    new: &NewEnquiry,
) -> Result<Enquiry, ServiceError> {
    if new.name.trim().is_empty() || new.email.trim().is_empty() {
        return Err(ServiceError::Validation {
            message: "name and email are required".to_string(),
            field: None,
        });
    }

    if let Some(existing) = store
        .find_by_email_or_phone(&new.email, new.phone.as_deref())
        .await?
    {
        if existing.email == new.email {
            return Err(ServiceError::Validation {
                message: "An enquiry with this email already exists".to_string(),
                field: Some(("email".to_string(), "already registered".to_string())),
            });
        }
        return Err(ServiceError::Validation {
            message: "An enquiry with this phone number already exists".to_string(),
            field: Some(("phone".to_string(), "already registered".to_string())),
        });
    }

    Ok(store.insert(new).await?)
}

/// Role-gated candidate-status transition: read current status, evaluate
/// the transition table, then apply with an atomic conditional write. On
/// any denial the stored status is untouched; a lost write race surfaces
/// as a Conflict instead of silently overwriting the other writer.
pub async fn change_status(
    store: &dyn EnquiryStore,
    enquiry_id: i32,
    requested: CandidateStatus,
    acting_role: Role,
) -> Result<Enquiry, ServiceError> {
    let enquiry = store
        .find_by_id(enquiry_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Enquiry not found".to_string()))?;

    let current = enquiry.status().map_err(|e| {
        // Stored label outside the enumerated set means corrupt data, not a
        // caller mistake.
        ServiceError::Internal(format!(
            "enquiry {} has invalid candidate status: {}",
            enquiry_id, e.0
        ))
    })?;

    authorize_transition(current, requested, acting_role)
        .map_err(|denied| ServiceError::Forbidden(denied.to_string()))?;

    let updated = store
        .compare_and_set_status(enquiry_id, current, requested)
        .await?;
    if !updated {
        return Err(ServiceError::Conflict(
            "Enquiry status was changed by another request; please retry".to_string(),
        ));
    }

    Ok(Enquiry {
        candidate_status: requested.as_str().to_string(),
        ..enquiry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryStore {
        rows: Mutex<HashMap<i32, Enquiry>>,
        next_id: Mutex<i32>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self { rows: Mutex::new(HashMap::new()), next_id: Mutex::new(1) }
        }

        fn seed(&self, email: &str, phone: Option<&str>, status: CandidateStatus) -> i32 {
            let mut next = self.next_id.lock().unwrap();
            let id = *next;
            *next += 1;

            let now = Utc::now();
            let enquiry = Enquiry {
                id,
                name: format!("Candidate {}", id),
                email: email.to_string(),
                phone: phone.map(str::to_string),
                current_location: None,
                package_id: None,
                batch_id: None,
                subject_ids: vec![],
                training_mode: None,
                training_time: None,
                start_time: None,
                profession: None,
                qualification: None,
                experience: None,
                referral: None,
                consent: false,
                candidate_status: status.as_str().to_string(),
                created_at: now,
                updated_at: now,
            };
            self.rows.lock().unwrap().insert(id, enquiry);
            id
        }

        fn status_of(&self, id: i32) -> String {
            self.rows.lock().unwrap()[&id].candidate_status.clone()
        }
    }

    #[async_trait]
    impl EnquiryStore for MemoryStore {
        async fn find_by_id(&self, id: i32) -> Result<Option<Enquiry>, DatabaseError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email_or_phone(
            &self,
            email: &str,
            phone: Option<&str>,
        ) -> Result<Option<Enquiry>, DatabaseError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .values()
                .find(|e| e.email == email || (phone.is_some() && e.phone.as_deref() == phone))
                .cloned())
        }

        async fn insert(&self, new: &NewEnquiry) -> Result<Enquiry, DatabaseError> {
            let id = self.seed(&new.email, new.phone.as_deref(), CandidateStatus::default());
            let mut rows = self.rows.lock().unwrap();
            let enquiry = rows.get_mut(&id).unwrap();
            enquiry.name = new.name.clone();
            Ok(enquiry.clone())
        }

        async fn compare_and_set_status(
            &self,
            id: i32,
            from: CandidateStatus,
            to: CandidateStatus,
        ) -> Result<bool, DatabaseError> {
            let mut rows = self.rows.lock().unwrap();
            match rows.get_mut(&id) {
                Some(enquiry) if enquiry.candidate_status == from.as_str() => {
                    enquiry.candidate_status = to.as_str().to_string();
                    Ok(true)
                }
                _ => Ok(false),
            }
        }
    }

    fn new_enquiry(name: &str, email: &str, phone: Option<&str>) -> NewEnquiry {
        NewEnquiry {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn accounts_moves_qualified_demo_into_class() {
        let store = MemoryStore::new();
        let id = store.seed("a@example.com", None, CandidateStatus::QualifiedDemo);

        let updated = change_status(&store, id, CandidateStatus::Class, Role::Accounts)
            .await
            .unwrap();

        assert_eq!(updated.candidate_status, "class");
        assert_eq!(store.status_of(id), "class");
    }

    #[tokio::test]
    async fn denied_role_leaves_status_untouched() {
        let store = MemoryStore::new();
        let id = store.seed("a@example.com", None, CandidateStatus::QualifiedDemo);

        let err = change_status(&store, id, CandidateStatus::Class, Role::Instructor)
            .await
            .unwrap_err();

        match err {
            ServiceError::Forbidden(msg) => {
                assert!(msg.contains("ADMIN"), "got: {}", msg);
                assert!(msg.contains("ACCOUNTS"), "got: {}", msg);
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
        assert_eq!(store.status_of(id), "qualified demo");
    }

    #[tokio::test]
    async fn unlisted_pair_is_denied_even_for_admin() {
        let store = MemoryStore::new();
        let id = store.seed("a@example.com", None, CandidateStatus::Demo);

        let err = change_status(&store, id, CandidateStatus::Placement, Role::Admin)
            .await
            .unwrap_err();

        match err {
            ServiceError::Forbidden(msg) => {
                assert_eq!(msg, "Invalid status transition from demo to placement");
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
        assert_eq!(store.status_of(id), "demo");
    }

    #[tokio::test]
    async fn missing_enquiry_is_not_found() {
        let store = MemoryStore::new();
        let err = change_status(&store, 999, CandidateStatus::Demo, Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn conflicting_writers_cannot_both_win() {
        let store = MemoryStore::new();
        let id = store.seed("a@example.com", None, CandidateStatus::Class);

        // Both writers validated against "class"; the first commit wins and
        // the stale second write affects nothing.
        assert!(store
            .compare_and_set_status(id, CandidateStatus::Class, CandidateStatus::ClassQualified)
            .await
            .unwrap());
        assert!(!store
            .compare_and_set_status(id, CandidateStatus::Class, CandidateStatus::Placement)
            .await
            .unwrap());

        assert_eq!(store.status_of(id), "class qualified");
    }

    /// Store wrapper that suspends between the status read and the
    /// conditional write, so two concurrent transitions both decide
    /// against the same snapshot.
    struct PausingStore(MemoryStore);

    #[async_trait]
    impl EnquiryStore for PausingStore {
        async fn find_by_id(&self, id: i32) -> Result<Option<Enquiry>, DatabaseError> {
            let row = self.0.find_by_id(id).await?;
            tokio::task::yield_now().await;
            Ok(row)
        }

        async fn find_by_email_or_phone(
            &self,
            email: &str,
            phone: Option<&str>,
        ) -> Result<Option<Enquiry>, DatabaseError> {
            self.0.find_by_email_or_phone(email, phone).await
        }

        async fn insert(&self, new: &NewEnquiry) -> Result<Enquiry, DatabaseError> {
            self.0.insert(new).await
        }

        async fn compare_and_set_status(
            &self,
            id: i32,
            from: CandidateStatus,
            to: CandidateStatus,
        ) -> Result<bool, DatabaseError> {
            self.0.compare_and_set_status(id, from, to).await
        }
    }

    #[tokio::test]
    async fn racing_transitions_yield_one_winner_and_one_conflict() {
        let store = PausingStore(MemoryStore::new());
        let id = store.0.seed("a@example.com", None, CandidateStatus::Class);

        // Both read "class" before either commits; only one conditional
        // write can match it.
        let (a, b) = futures::join!(
            change_status(&store, id, CandidateStatus::ClassQualified, Role::Accounts),
            change_status(&store, id, CandidateStatus::Placement, Role::Hr),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(ServiceError::Conflict(_)))));
        assert_eq!(store.0.status_of(id), "class qualified");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_naming_the_email_field() {
        let store = MemoryStore::new();
        store.seed("taken@example.com", Some("111"), CandidateStatus::Demo);

        let err = create_enquiry(&store, &new_enquiry("B", "taken@example.com", Some("222")))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation { message, field } => {
                assert!(message.contains("email"), "got: {}", message);
                assert_eq!(field.unwrap().0, "email");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn duplicate_phone_is_rejected_naming_the_phone_field() {
        let store = MemoryStore::new();
        store.seed("a@example.com", Some("555"), CandidateStatus::Demo);

        let err = create_enquiry(&store, &new_enquiry("B", "b@example.com", Some("555")))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation { field, .. } => {
                assert_eq!(field.unwrap().0, "phone");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn fresh_enquiry_is_created_in_demo() {
        let store = MemoryStore::new();
        let created = create_enquiry(&store, &new_enquiry("New", "new@example.com", None))
            .await
            .unwrap();
        assert_eq!(created.candidate_status, "demo");
    }
}
