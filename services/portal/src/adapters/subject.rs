//! services/portal/src/adapters/subject.rs

use super::envelope::{ApiEnvelope, RemoteReply};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde_json::json;
use tutor_portal_core::ports::{PortResult, SubjectService};
use tutor_portal_core::records::SubjectRecord;

#[derive(Debug, Clone)]
pub struct SubjectSheetAdapter {
    endpoint: RemoteEndpoint,
}

impl SubjectSheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl SubjectService for SubjectSheetAdapter {
    async fn get_all_subjects(&self) -> PortResult<Vec<SubjectRecord>> {
        let reply: ApiEnvelope<Vec<SubjectRecord>> = self
            .endpoint
            .post(&json!({ "action": "readAllSubjects" }))
            .await?;
        Ok(reply.into_port_result()?.unwrap_or_default())
    }

    async fn get_subjects_by_ids(&self, ids: &[String]) -> PortResult<Vec<SubjectRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let reply: ApiEnvelope<Vec<SubjectRecord>> = self
            .endpoint
            .post(&json!({ "action": "readSubjectsByIds", "subjectIds": ids }))
            .await?;
        Ok(reply.into_port_result()?.unwrap_or_default())
    }
}
