//! services/portal/src/adapters/teacher.rs
//!
//! Teacher sheet adapter: profile lookup by contact number and partial
//! updates (subjects, password) keyed by contact.

use super::envelope::{ApiEnvelope, RemoteReply};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde_json::json;
use tutor_portal_core::ports::{PortResult, TeacherService};
use tutor_portal_core::records::{TeacherRecord, TeacherUpdate};

#[derive(Debug, Clone)]
pub struct TeacherSheetAdapter {
    endpoint: RemoteEndpoint,
}

impl TeacherSheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl TeacherService for TeacherSheetAdapter {
    async fn get_teacher_by_contact(&self, contact: &str) -> PortResult<Option<TeacherRecord>> {
        let reply: ApiEnvelope<TeacherRecord> = self
            .endpoint
            .post(&json!({ "action": "readByContact", "contact": contact }))
            .await?;
        // An unknown contact is answered with `success: false`.
        if !reply.succeeded() {
            return Ok(None);
        }
        Ok(reply.into_data())
    }

    async fn update_teacher(&self, contact: &str, update: &TeacherUpdate) -> PortResult<()> {
        let reply: ApiEnvelope<serde_json::Value> = self
            .endpoint
            .post(&json!({
                "action": "updateByContact",
                "contact": contact,
                "updateData": update,
            }))
            .await?;
        reply.into_port_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> TeacherSheetAdapter {
        TeacherSheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()))
    }

    #[tokio::test]
    async fn finds_a_teacher_by_contact() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"action": "readByContact", "contact": "9999999999"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "",
                "data": {
                    "Teacher ID": "TCH108",
                    "Name": "Asha",
                    "Contact": 9999999999u64,
                    "Subjects ID(s)": "SUB227, SUB228",
                    "Mail": "asha@example.com",
                    "Status": "Active"
                }
            })))
            .mount(&server)
            .await;

        let record = adapter(&server)
            .get_teacher_by_contact("9999999999")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.teacher_id, "TCH108");
        assert_eq!(record.contact, "9999999999");
        assert_eq!(record.password, None);
    }

    #[tokio::test]
    async fn unknown_contact_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "message": "Teacher not found",
                "data": null
            })))
            .mount(&server)
            .await;

        let record = adapter(&server).get_teacher_by_contact("1").await.unwrap();
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn updates_send_only_the_changed_columns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "action": "updateByContact",
                "contact": "9999999999",
                "updateData": {"Password": "secret1"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ok", "data": null})))
            .expect(1)
            .mount(&server)
            .await;

        adapter(&server)
            .update_teacher("9999999999", &TeacherUpdate::password("secret1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_updates_are_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false, "message": "denied", "data": null})))
            .mount(&server)
            .await;

        let result = adapter(&server)
            .update_teacher("1", &TeacherUpdate::subjects(&["SUB1".into()]))
            .await;
        assert!(result.is_err());
    }
}
