//! services/portal/src/adapters/envelope.rs
//!
//! The two response envelopes the sheet endpoints use, normalised behind
//! one `RemoteReply` trait so adapters never branch on the shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tutor_portal_core::ports::{PortError, PortResult};

/// Implemented by every envelope a remote endpoint can answer with.
pub trait RemoteReply: DeserializeOwned + Send {
    type Data;

    fn succeeded(&self) -> bool;

    fn message(&self) -> &str;

    fn into_data(self) -> Option<Self::Data>;

    /// The payload of a successful reply, or the remote's message as an error.
    fn into_port_result(self) -> PortResult<Option<Self::Data>>
    where
        Self: Sized,
    {
        if self.succeeded() {
            Ok(self.into_data())
        } else {
            let message = match self.message() {
                "" => "remote reported failure".to_string(),
                m => m.to_string(),
            };
            Err(PortError::Unexpected(message))
        }
    }
}

//=========================================================================================
// `{ success, message, data }`
//=========================================================================================

#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T: DeserializeOwned + Send> RemoteReply for ApiEnvelope<T> {
    type Data = T;

    fn succeeded(&self) -> bool {
        self.success
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn into_data(self) -> Option<T> {
        self.data
    }
}

//=========================================================================================
// `{ status: "success" | "error", data?, message? }`
//=========================================================================================

#[derive(Debug, Deserialize)]
pub struct StatusEnvelope<T> {
    #[serde(default)]
    pub status: String,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T: DeserializeOwned + Send> RemoteReply for StatusEnvelope<T> {
    type Data = T;

    fn succeeded(&self) -> bool {
        self.status == "success"
    }

    fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn both_shapes_normalise_to_the_same_result() {
        let api: ApiEnvelope<Vec<u32>> =
            serde_json::from_value(json!({"success": true, "message": "", "data": [1, 2]})).unwrap();
        let status: StatusEnvelope<Vec<u32>> =
            serde_json::from_value(json!({"status": "success", "data": [1, 2]})).unwrap();
        assert_eq!(api.into_port_result().unwrap(), Some(vec![1, 2]));
        assert_eq!(status.into_port_result().unwrap(), Some(vec![1, 2]));
    }

    #[test]
    fn failures_carry_the_remote_message() {
        let api: ApiEnvelope<()> =
            serde_json::from_value(json!({"success": false, "message": "Sheet locked", "data": null}))
                .unwrap();
        let err = api.into_port_result().unwrap_err();
        assert_eq!(err.to_string(), "An unexpected error occurred: Sheet locked");

        let status: StatusEnvelope<()> = serde_json::from_value(json!({"status": "error"})).unwrap();
        assert!(status.into_port_result().is_err());
    }

    #[test]
    fn missing_data_is_none() {
        let api: ApiEnvelope<String> = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(api.into_port_result().unwrap(), None);
    }
}
