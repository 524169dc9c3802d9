//! services/portal/src/adapters/http.rs
//!
//! One remote sheet endpoint. Every call is a single attempt: no retry, no
//! timeout. Transport failures, non-success statuses and undecodable bodies
//! all surface as `PortError::Unexpected`.

use super::envelope::RemoteReply;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;
use tutor_portal_core::ports::{PortError, PortResult};

/// The endpoints accept their JSON body as plain text.
const BODY_CONTENT_TYPE: &str = "text/plain;charset=utf-8";

#[derive(Debug, Clone)]
pub struct RemoteEndpoint {
    client: reqwest::Client,
    url: String,
}

impl RemoteEndpoint {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs `{ action, ...params }` and decodes the reply envelope.
    pub async fn post<R: RemoteReply>(&self, body: &Value) -> PortResult<R> {
        let action = body.get("action").and_then(Value::as_str).unwrap_or_default();
        debug!(url = %self.url, action, "remote call");

        let payload = serde_json::to_string(body).map_err(|e| PortError::Unexpected(e.to_string()))?;
        let request = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, BODY_CONTENT_TYPE)
            .body(payload);
        self.send(request).await
    }

    /// GETs with query parameters and decodes the reply envelope.
    pub async fn get<R: RemoteReply>(&self, query: &[(&str, &str)]) -> PortResult<R> {
        debug!(url = %self.url, ?query, "remote read");
        self.send(self.client.get(&self.url).query(query)).await
    }

    async fn send<R: RemoteReply>(&self, request: reqwest::RequestBuilder) -> PortResult<R> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Unexpected(format!("failed to read response body: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Unexpected(format!("remote returned {status}: {body}")));
        }

        serde_json::from_str(&body)
            .map_err(|e| PortError::Unexpected(format!("failed to parse remote response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::envelope::ApiEnvelope;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_plain_text_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", BODY_CONTENT_TYPE))
            .and(body_json(json!({"action": "ping"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": 7})))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = RemoteEndpoint::new(reqwest::Client::new(), server.uri());
        let reply: ApiEnvelope<u32> = endpoint.post(&json!({"action": "ping"})).await.unwrap();
        assert_eq!(reply.data, Some(7));
    }

    #[tokio::test]
    async fn server_errors_are_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let endpoint = RemoteEndpoint::new(reqwest::Client::new(), server.uri());
        let err = endpoint
            .post::<ApiEnvelope<u32>>(&json!({"action": "ping"}))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::Unexpected(ref m) if m.contains("500")));
    }

    #[tokio::test]
    async fn html_bodies_fail_to_parse() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let endpoint = RemoteEndpoint::new(reqwest::Client::new(), server.uri());
        let result = endpoint.post::<ApiEnvelope<u32>>(&json!({"action": "ping"})).await;
        assert!(result.is_err());
    }
}
