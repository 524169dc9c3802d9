//! services/portal/src/adapters/student.rs
//!
//! Student sheet adapter. The sheet only supports single lookups; bulk name
//! resolution comes from the port's default `get_student_names`.

use super::envelope::{ApiEnvelope, RemoteReply};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde_json::json;
use tutor_portal_core::ports::{PortResult, StudentService};
use tutor_portal_core::records::StudentRecord;

#[derive(Debug, Clone)]
pub struct StudentSheetAdapter {
    endpoint: RemoteEndpoint,
}

impl StudentSheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl StudentService for StudentSheetAdapter {
    async fn get_student_by_id(&self, student_id: &str) -> PortResult<Option<StudentRecord>> {
        let reply: ApiEnvelope<StudentRecord> = self
            .endpoint
            .post(&json!({ "action": "getStudentById", "studentId": student_id }))
            .await?;
        if !reply.succeeded() {
            return Ok(None);
        }
        Ok(reply.into_data())
    }
}
