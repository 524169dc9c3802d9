//! services/portal/src/adapters/availability.rs
//!
//! Availability sheet adapter. This endpoint answers with the
//! `{ status, data?, message? }` envelope and reads through a GET.

use super::envelope::{RemoteReply, StatusEnvelope};
use super::http::RemoteEndpoint;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tutor_portal_core::ports::{AvailabilityService, PortResult};
use tutor_portal_core::records::{
    cell_text, AvailabilityRecord, AvailabilityUpdate, NewAvailability,
};

#[derive(Debug, Clone)]
pub struct AvailabilitySheetAdapter {
    endpoint: RemoteEndpoint,
}

impl AvailabilitySheetAdapter {
    pub fn new(endpoint: RemoteEndpoint) -> Self {
        Self { endpoint }
    }
}

#[derive(Debug, Deserialize)]
struct AddedSlot {
    #[serde(default)]
    available_id: Option<Value>,
}

#[async_trait]
impl AvailabilityService for AvailabilitySheetAdapter {
    async fn get_availability(&self, teacher_id: &str) -> PortResult<Vec<AvailabilityRecord>> {
        let reply: StatusEnvelope<Vec<AvailabilityRecord>> = self
            .endpoint
            .get(&[("action", "read"), ("teacher_id", teacher_id)])
            .await?;
        Ok(reply.into_port_result()?.unwrap_or_default())
    }

    async fn add_availability(&self, slot: &NewAvailability) -> PortResult<Option<String>> {
        let reply: StatusEnvelope<AddedSlot> = self
            .endpoint
            .post(&json!({ "action": "add", "data": slot }))
            .await?;
        let added = reply.into_port_result()?;
        Ok(added
            .and_then(|a| a.available_id)
            .map(|id| cell_text(&id))
            .filter(|id| !id.is_empty()))
    }

    async fn update_availability(
        &self,
        available_id: &str,
        update: &AvailabilityUpdate,
    ) -> PortResult<()> {
        let reply: StatusEnvelope<Value> = self
            .endpoint
            .post(&json!({ "action": "update", "available_id": available_id, "data": update }))
            .await?;
        reply.into_port_result().map(|_| ())
    }

    async fn delete_availability(&self, available_id: &str) -> PortResult<()> {
        let reply: StatusEnvelope<Value> = self
            .endpoint
            .post(&json!({ "action": "delete", "available_id": available_id }))
            .await?;
        reply.into_port_result().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutor_portal_core::time::TimeValue;
    use wiremock::matchers::{body_json, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter(server: &MockServer) -> AvailabilitySheetAdapter {
        AvailabilitySheetAdapter::new(RemoteEndpoint::new(reqwest::Client::new(), server.uri()))
    }

    #[tokio::test]
    async fn reads_through_a_query_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "read"))
            .and(query_param("teacher_id", "TCH108"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [{
                    "Available ID": "AV1",
                    "Teacher ID": "TCH108",
                    "Weekday": "Monday",
                    "Start Time": "1899-12-30T03:30:00.000Z",
                    "End Time": 0.4375
                }]
            })))
            .mount(&server)
            .await;

        let rows = adapter(&server).get_availability("TCH108").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].available_id, "AV1");
        assert_eq!(rows[0].end_time, TimeValue::Fraction(0.4375));
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "error", "message": "no sheet"})))
            .mount(&server)
            .await;

        assert!(adapter(&server).get_availability("TCH108").await.is_err());
    }

    #[tokio::test]
    async fn add_returns_the_assigned_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({
                "action": "add",
                "data": {
                    "Teacher ID": "TCH108",
                    "Weekday": "Friday",
                    "Start Time": "09:00 am",
                    "End Time": "10:00 am"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": {"message": "added", "available_id": "AV42"}
            })))
            .mount(&server)
            .await;

        let id = adapter(&server)
            .add_availability(&NewAvailability {
                teacher_id: "TCH108".into(),
                weekday: "Friday".into(),
                start_time: "09:00 am".into(),
                end_time: "10:00 am".into(),
            })
            .await
            .unwrap();
        assert_eq!(id.as_deref(), Some("AV42"));
    }

    #[tokio::test]
    async fn delete_posts_the_slot_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"action": "delete", "available_id": "AV1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        adapter(&server).delete_availability("AV1").await.unwrap();
    }
}
