//! services/portal/src/adapters/allocation.rs

use super::envelope::{ApiEnvelope, RemoteReply};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde_json::json;
use tutor_portal_core::ports::{AllocationService, PortResult};
use tutor_portal_core::records::AllocationRecord;

#[derive(Debug, Clone)]
pub struct AllocationSheetAdapter {
    endpoint: RemoteEndpoint,
}

impl AllocationSheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl AllocationService for AllocationSheetAdapter {
    async fn fetch_by_teacher_id(&self, teacher_id: &str) -> PortResult<Vec<AllocationRecord>> {
        let reply: ApiEnvelope<Vec<AllocationRecord>> = self
            .endpoint
            .post(&json!({ "action": "readByTeacherId", "teacher_id": teacher_id }))
            .await?;
        Ok(reply.into_port_result()?.unwrap_or_default())
    }
}
