//! Chat service events.
//!
//! Two tagged enums cover the full event vocabulary: [`ClientEvent`] for
//! traffic the client emits and [`ServerEvent`] for traffic it receives.
//! The serde renames below are the wire-level names; changing any of them
//! breaks compatibility with deployed services.

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Events the client emits to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    /// Publish a chat message to the room.
    #[serde(rename = "message")]
    Message(ChatMessage),

    /// Ask for the current user list. No payload; the service answers with
    /// a `user_list` event.
    #[serde(rename = "get_users")]
    GetUsers,
}

impl ClientEvent {
    /// Encode this event as a JSON text frame.
    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// Events the service delivers to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A chat message broadcast to the room.
    #[serde(rename = "response")]
    Response(ChatMessage),

    /// A system status line (join, leave, service announcements).
    #[serde(rename = "status")]
    Status(StatusNotice),

    /// The current set of connected users.
    #[serde(rename = "user_list")]
    UserList(UserList),

    /// A service-reported error.
    #[serde(rename = "error")]
    Error(ServiceError),
}

impl ServerEvent {
    /// Decode a JSON text frame into an event.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(raw).map_err(ProtocolError::Decode)
    }
}

/// Payload of `message` and `response` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body.
    pub message: String,

    /// Sender's display name.
    pub username: String,

    /// Sender-local time string. Opaque to the service; displayed as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Payload of `status` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusNotice {
    /// Status text.
    pub msg: String,

    /// Live user count, when the service includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_count: Option<u64>,
}

/// Payload of `user_list` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserList {
    /// Identifiers of the connected users.
    pub users: Vec<String>,
}

/// Payload of `error` events. Services are not required to provide a
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceError {
    /// Human-readable error description, when provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn message_event_wire_shape() {
        let event = ClientEvent::Message(ChatMessage {
            message: "hello".into(),
            username: "mina".into(),
            timestamp: Some("12:30:05".into()),
        });

        let raw = event.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(
            value,
            json!({
                "event": "message",
                "data": {"message": "hello", "username": "mina", "timestamp": "12:30:05"}
            })
        );
    }

    #[test]
    fn message_without_timestamp_omits_field() {
        let event = ClientEvent::Message(ChatMessage {
            message: "hi".into(),
            username: "mina".into(),
            timestamp: None,
        });

        let raw = event.to_json().unwrap();
        assert!(!raw.contains("timestamp"));
    }

    #[test]
    fn get_users_is_bare_envelope() {
        let raw = ClientEvent::GetUsers.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value, json!({"event": "get_users"}));
    }

    #[test]
    fn response_event_decodes() {
        let raw = r#"{"event":"response","data":{"username":"bora","message":"hey","timestamp":"09:00:00"}}"#;

        let event = ServerEvent::from_json(raw).unwrap();
        assert_eq!(
            event,
            ServerEvent::Response(ChatMessage {
                message: "hey".into(),
                username: "bora".into(),
                timestamp: Some("09:00:00".into()),
            })
        );
    }

    #[test]
    fn status_event_user_count_is_optional() {
        let with_count = r#"{"event":"status","data":{"msg":"User joined","user_count":3}}"#;
        let without = r#"{"event":"status","data":{"msg":"User joined"}}"#;

        assert_eq!(
            ServerEvent::from_json(with_count).unwrap(),
            ServerEvent::Status(StatusNotice { msg: "User joined".into(), user_count: Some(3) })
        );
        assert_eq!(
            ServerEvent::from_json(without).unwrap(),
            ServerEvent::Status(StatusNotice { msg: "User joined".into(), user_count: None })
        );
    }

    #[test]
    fn user_list_event_decodes() {
        let raw = r#"{"event":"user_list","data":{"users":["a","b"]}}"#;

        let event = ServerEvent::from_json(raw).unwrap();
        assert_eq!(
            event,
            ServerEvent::UserList(UserList { users: vec!["a".into(), "b".into()] })
        );
    }

    #[test]
    fn error_event_message_is_optional() {
        let bare = r#"{"event":"error","data":{}}"#;

        let event = ServerEvent::from_json(bare).unwrap();
        assert_eq!(event, ServerEvent::Error(ServiceError { msg: None }));
    }

    #[test]
    fn unknown_event_name_is_rejected() {
        let raw = r#"{"event":"presence","data":{}}"#;
        assert!(ServerEvent::from_json(raw).is_err());
    }

    #[test]
    fn non_event_json_is_rejected() {
        assert!(ServerEvent::from_json("[1,2,3]").is_err());
        assert!(ServerEvent::from_json("not json").is_err());
    }
}
