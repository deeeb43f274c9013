//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
///
/// Everything except `ConnectionError` and `ConnectionLost` is a local
/// rejection: the request is never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Display name must not be empty")]
    EmptyName,

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Not connected to the server")]
    NotConnected,

    #[error("Join the chat before sending messages")]
    NotJoined,

    #[error("Already joined as '{0}'")]
    AlreadyJoined(String),

    #[error("A join request is already waiting for an answer")]
    JoinPending,

    #[error("Could not list participants: {0}")]
    ParticipantsUnavailable(String),

    /// The channel could not be opened
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established channel was lost
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
