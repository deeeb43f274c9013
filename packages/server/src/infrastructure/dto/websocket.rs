//! WebSocket event DTOs.
//!
//! Every frame is a JSON text frame of the form
//! `{"event": "<name>", "data": { ... }}`.

use serde::{Deserialize, Serialize};

/// Events a client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinChat(JoinChatPayload),
    SendMessage(SendMessagePayload),
}

/// Events the server sends to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    JoinSuccess(JoinSuccessPayload),
    JoinError(JoinErrorPayload),
    NewMessage(NewMessagePayload),
    DisconnectNotice(DisconnectNoticePayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinChatPayload {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessagePayload {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSuccessPayload {
    /// Canonical (trimmed) display name the client joined as
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinErrorPayload {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessagePayload {
    pub message: String,
    #[serde(default)]
    pub sender: String,
    /// Unix timestamp in milliseconds
    #[serde(default)]
    pub sent_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectNoticePayload {
    pub message: String,
    #[serde(default)]
    pub username: String,
    /// Unix timestamp in milliseconds
    #[serde(default)]
    pub disconnected_at: i64,
}

impl ClientEvent {
    pub fn join_chat(username: impl Into<String>) -> Self {
        Self::JoinChat(JoinChatPayload {
            username: username.into(),
        })
    }

    pub fn send_message(message: impl Into<String>) -> Self {
        Self::SendMessage(SendMessagePayload {
            message: message.into(),
        })
    }
}

impl ServerEvent {
    /// Wire name of the event, as it appears in the `event` field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinSuccess(_) => "join_success",
            Self::JoinError(_) => "join_error",
            Self::NewMessage(_) => "new_message",
            Self::DisconnectNotice(_) => "disconnect_notice",
        }
    }
}
