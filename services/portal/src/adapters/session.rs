//! services/portal/src/adapters/session.rs
//!
//! Session sheet adapter. Rows come back with their uploaded files already
//! joined in; assembly into `Session`s happens in the core.

use super::envelope::{ApiEnvelope, RemoteReply};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde_json::{json, Value};
use tutor_portal_core::ports::{PortResult, SessionService};
use tutor_portal_core::records::{SessionRecord, SessionUpdate};

#[derive(Debug, Clone)]
pub struct SessionSheetAdapter {
    endpoint: RemoteEndpoint,
}

impl SessionSheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl SessionService for SessionSheetAdapter {
    async fn fetch_by_teacher_id(&self, teacher_id: &str) -> PortResult<Vec<SessionRecord>> {
        let reply: ApiEnvelope<Vec<SessionRecord>> = self
            .endpoint
            .post(&json!({ "action": "readByTeacherId", "teacherId": teacher_id }))
            .await?;
        Ok(reply.into_port_result()?.unwrap_or_default())
    }

    async fn update_session(&self, session_id: &str, update: &SessionUpdate) -> PortResult<()> {
        let reply: ApiEnvelope<Value> = self
            .endpoint
            .post(&json!({
                "action": "updateBySessionId",
                "sessionId": session_id,
                "updateData": update,
            }))
            .await?;
        reply.into_port_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_rows_with_files() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"action": "readByTeacherId", "teacherId": "TCH108"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "",
                "data": [{
                    "Session ID": "SES1",
                    "Student ID": "STD1",
                    "Date": "19/02/2026",
                    "Start Time": "07:00pm",
                    "End Time": "08:15pm",
                    "Status": "Scheduled",
                    "Files": [{"File Name": "proof.png", "Type": "Session Proof"}]
                }]
            })))
            .mount(&server)
            .await;

        let adapter = SessionSheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()));
        let rows = adapter.fetch_by_teacher_id("TCH108").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].files.len(), 1);
        assert_eq!(rows[0].files[0].file_name, "proof.png");
    }

    #[tokio::test]
    async fn rows_with_broken_file_columns_still_load() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "",
                "data": [
                    {"Session ID": "SES1", "Status": "Scheduled", "Files": null},
                    {"Session ID": "SES2", "Status": "Scheduled", "Files": ""},
                    {"Session ID": "SES3", "Status": "Scheduled", "Files": [{"File Name": "a.pdf", "Type": null}]}
                ]
            })))
            .mount(&server)
            .await;

        let adapter = SessionSheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()));
        let rows = adapter.fetch_by_teacher_id("TCH108").await.unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.session_id.as_str()).collect();
        assert_eq!(ids, ["SES1", "SES2", "SES3"]);
        assert!(rows[0].files.is_empty());
        assert!(rows[1].files.is_empty());
        assert_eq!(rows[2].files[0].category, tutor_portal_core::domain::FileCategory::Other);
    }

    #[tokio::test]
    async fn completion_sends_status_only() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({
                "action": "updateBySessionId",
                "sessionId": "SES1",
                "updateData": {"Status": "Completed"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "", "data": null})))
            .expect(1)
            .mount(&server)
            .await;

        let adapter = SessionSheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()));
        adapter.update_session("SES1", &SessionUpdate::completed()).await.unwrap();
    }
}
