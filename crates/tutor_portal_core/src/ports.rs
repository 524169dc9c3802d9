//! crates/tutor_portal_core/src/ports.rs
//!
//! Defines the contracts (traits) for every remote collaborator the dashboard
//! talks to, plus the durable local store. The core never sees HTTP; the
//! `portal` service supplies the concrete adapters.

use crate::records::{
    AllocationRecord, AvailabilityRecord, AvailabilityUpdate, NewAvailability, SessionRecord,
    SessionUpdate, StudentLogEntry, StudentLogRecord, StudentRecord, SubjectRecord, TeacherRecord,
    TeacherUpdate,
};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::HashMap;
use tracing::warn;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away transport and decoding failures of the remote sheets.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Remote Collaborators
//=========================================================================================

#[async_trait]
pub trait TeacherService: Send + Sync {
    /// `Ok(None)` when no teacher is registered under `contact`.
    async fn get_teacher_by_contact(&self, contact: &str) -> PortResult<Option<TeacherRecord>>;

    async fn update_teacher(&self, contact: &str, update: &TeacherUpdate) -> PortResult<()>;
}

#[async_trait]
pub trait SubjectService: Send + Sync {
    async fn get_all_subjects(&self) -> PortResult<Vec<SubjectRecord>>;

    async fn get_subjects_by_ids(&self, ids: &[String]) -> PortResult<Vec<SubjectRecord>>;
}

#[async_trait]
pub trait AvailabilityService: Send + Sync {
    async fn get_availability(&self, teacher_id: &str) -> PortResult<Vec<AvailabilityRecord>>;

    /// Returns the id the sheet assigned, when it reports one.
    async fn add_availability(&self, slot: &NewAvailability) -> PortResult<Option<String>>;

    async fn update_availability(
        &self,
        available_id: &str,
        update: &AvailabilityUpdate,
    ) -> PortResult<()>;

    async fn delete_availability(&self, available_id: &str) -> PortResult<()>;
}

#[async_trait]
pub trait AllocationService: Send + Sync {
    async fn fetch_by_teacher_id(&self, teacher_id: &str) -> PortResult<Vec<AllocationRecord>>;
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn fetch_by_teacher_id(&self, teacher_id: &str) -> PortResult<Vec<SessionRecord>>;

    async fn update_session(&self, session_id: &str, update: &SessionUpdate) -> PortResult<()>;
}

#[async_trait]
pub trait StudentLogService: Send + Sync {
    async fn fetch_by_session_id(&self, session_id: &str) -> PortResult<Vec<StudentLogRecord>>;

    async fn bulk_add(&self, logs: &[StudentLogEntry]) -> PortResult<()>;
}

#[async_trait]
pub trait StudentService: Send + Sync {
    async fn get_student_by_id(&self, student_id: &str) -> PortResult<Option<StudentRecord>>;

    /// Resolves many names at once. The remote has no bulk lookup, so the
    /// default issues one request per id concurrently. Ids that fail or are
    /// unknown are left out of the map.
    async fn get_student_names(&self, student_ids: &[String]) -> HashMap<String, String> {
        let lookups = student_ids.iter().map(|id| async move {
            match self.get_student_by_id(id).await {
                Ok(Some(student)) => Some((id.clone(), student.student_name)),
                Ok(None) => None,
                Err(e) => {
                    warn!("Failed to resolve name for student {}: {}", id, e);
                    None
                }
            }
        });
        join_all(lookups).await.into_iter().flatten().collect()
    }
}

//=========================================================================================
// Durable Local Store
//=========================================================================================

/// Small string key/value store that survives between runs.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> PortResult<()>;

    fn remove(&self, key: &str) -> PortResult<()>;
}
