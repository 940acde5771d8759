//! The wire envelope every Habitica endpoint answers with.
//!
//! ```json
//! { "data": ..., "notifications": [...], "success": true, "message": null }
//! ```
//!
//! Error bodies carry `{ "message": ..., "displayMessage": ... }` and are
//! decoded lazily by the classifier through [`ErrorResponse::decode`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Fault, FaultKind};

/// Payload type for endpoints whose `data` carries nothing the client uses.
///
/// Accepts any JSON value, so `{}`, `[]` and scalars all decode.
pub type Ack = serde::de::IgnoredAny;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseEnvelope<T> {
    pub data: Option<T>,
    pub notifications: Option<Vec<Notification>>,
    pub success: Option<bool>,
    pub message: Option<String>,
}

// Manual impl: the derive would require `T: Default`.
impl<T> Default for ResponseEnvelope<T> {
    fn default() -> Self {
        Self {
            data: None,
            notifications: None,
            success: None,
            message: None,
        }
    }
}

impl<T: DeserializeOwned> ResponseEnvelope<T> {
    /// Decode a success body. An empty body is an empty envelope.
    pub fn decode(path: &str, body: &str) -> Result<Self, Fault> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body).map_err(|e| {
            Fault::new(
                path,
                FaultKind::Payload {
                    message: e.to_string(),
                },
            )
        })
    }
}

/// Server-pushed side-channel event. Forwarded, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub seen: Option<bool>,
    pub data: serde_json::Value,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ErrorResponse {
    pub message: Option<String>,
    pub display_message: Option<String>,
}

impl ErrorResponse {
    /// Decode an error body with the payload JSON pipeline. An absent body
    /// yields the empty instance.
    pub fn decode(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(body)
    }

    pub fn display_message(&self) -> &str {
        self.display_message.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_envelope() {
        let body = r#"{
            "success": true,
            "data": [1, 2, 3],
            "notifications": [{"id": "n1", "type": "LEVEL_UP", "seen": false, "data": {"level": 4}}],
            "message": "ok"
        }"#;
        let env: ResponseEnvelope<Vec<u32>> = ResponseEnvelope::decode("/x", body).unwrap();
        assert_eq!(env.data, Some(vec![1, 2, 3]));
        assert_eq!(env.success, Some(true));
        assert_eq!(env.message.as_deref(), Some("ok"));
        let notes = env.notifications.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind.as_deref(), Some("LEVEL_UP"));
        assert_eq!(notes[0].data["level"], 4);
    }

    #[test]
    fn notifications_keep_unknown_fields_for_forwarding() {
        let body = r#"{"notifications": [{"id": "n1", "type": "GROUP_TASK_NEEDS_WORK", "createdAt": "2024-05-01", "priority": 2}]}"#;
        let env: ResponseEnvelope<Ack> = ResponseEnvelope::decode("/x", body).unwrap();
        let notes = env.notifications.unwrap();
        let note = &notes[0];
        assert_eq!(note.extra["createdAt"], "2024-05-01");
        assert_eq!(note.extra["priority"], 2);

        let forwarded = serde_json::to_value(note).unwrap();
        assert_eq!(forwarded["createdAt"], "2024-05-01");
        assert_eq!(forwarded["type"], "GROUP_TASK_NEEDS_WORK");
    }

    #[test]
    fn missing_and_null_fields_are_none() {
        let env: ResponseEnvelope<String> =
            ResponseEnvelope::decode("/x", r#"{"success": true, "data": null}"#).unwrap();
        assert!(env.data.is_none());
        assert!(env.notifications.is_none());
        assert!(env.message.is_none());
    }

    #[test]
    fn empty_body_is_empty_envelope() {
        let env: ResponseEnvelope<String> = ResponseEnvelope::decode("/x", "  ").unwrap();
        assert_eq!(env, ResponseEnvelope::default());
    }

    #[test]
    fn bad_json_is_payload_fault() {
        let err = ResponseEnvelope::<String>::decode("/user", "<html>").unwrap_err();
        assert_eq!(err.path, "/user");
        assert!(matches!(err.kind, FaultKind::Payload { .. }));
    }

    #[test]
    fn ack_accepts_any_data() {
        for body in [r#"{"data": {}}"#, r#"{"data": []}"#, r#"{"data": "x"}"#] {
            let env: ResponseEnvelope<Ack> = ResponseEnvelope::decode("/x", body).unwrap();
            assert!(env.data.is_some(), "{body}");
        }
    }

    #[test]
    fn error_response_reads_display_message() {
        let res = ErrorResponse::decode(
            r#"{"success":false,"error":"BadRequest","message":"m","displayMessage":"Shown"}"#,
        )
        .unwrap();
        assert_eq!(res.message.as_deref(), Some("m"));
        assert_eq!(res.display_message(), "Shown");
    }

    #[test]
    fn error_response_defaults_when_body_absent() {
        assert_eq!(ErrorResponse::decode("").unwrap(), ErrorResponse::default());
        assert!(ErrorResponse::decode("not json").is_err());
    }
}
