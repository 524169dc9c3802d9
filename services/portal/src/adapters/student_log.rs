//! services/portal/src/adapters/student_log.rs

use super::envelope::{ApiEnvelope, RemoteReply};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde_json::{json, Value};
use tutor_portal_core::ports::{PortResult, StudentLogService};
use tutor_portal_core::records::{StudentLogEntry, StudentLogRecord};

#[derive(Debug, Clone)]
pub struct StudentLogSheetAdapter {
    endpoint: RemoteEndpoint,
}

impl StudentLogSheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl StudentLogService for StudentLogSheetAdapter {
    async fn fetch_by_session_id(&self, session_id: &str) -> PortResult<Vec<StudentLogRecord>> {
        let reply: ApiEnvelope<Vec<StudentLogRecord>> = self
            .endpoint
            .post(&json!({ "action": "readBySessionId", "sessionId": session_id }))
            .await?;
        Ok(reply.into_port_result()?.unwrap_or_default())
    }

    async fn bulk_add(&self, logs: &[StudentLogEntry]) -> PortResult<()> {
        let reply: ApiEnvelope<Value> = self
            .endpoint
            .post(&json!({ "action": "bulkAdd", "logs": logs }))
            .await?;
        reply.into_port_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_portal_core::domain::AttendanceMark;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn bulk_add_sends_camel_case_rows() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({
                "action": "bulkAdd",
                "logs": [{
                    "sessionId": "SES1",
                    "studentId": "STD1",
                    "status": "Present",
                    "rating": 5,
                    "comment": "Great"
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "", "data": null})))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = StudentLogSheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()));
        let logs = [StudentLogEntry::new("SES1", "STD1", AttendanceMark::Present, 5, "Great")];
        adapter.bulk_add(&logs).await.unwrap();
    }

    #[tokio::test]
    async fn failed_bulk_add_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "quota", "data": null})))
            .mount(&server)
            .await;

        let adapter = StudentLogSheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()));
        assert!(adapter.bulk_add(&[]).await.is_err());
    }
}
