//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::RegistryError;

/// Reasons a join request is rejected.
///
/// The `Display` text is sent verbatim to the requester in `join_error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("Display name must not be empty")]
    InvalidName,

    #[error("Display name '{0}' is already taken")]
    NameTaken(String),

    #[error("This connection has already joined as '{0}'")]
    AlreadyJoined(String),

    /// The connection closed while the request was being handled
    #[error("Connection is closed")]
    ConnectionClosed,
}

impl From<RegistryError> for JoinError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::NameTaken(name) => Self::NameTaken(name),
            RegistryError::AlreadyJoined(name) => Self::AlreadyJoined(name),
        }
    }
}

/// Reasons a message is not relayed. Never reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("connection has not joined the chat")]
    NotJoined,

    #[error("message body is empty")]
    EmptyBody,

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
}
