//! ドメイン層のエラー定義

use thiserror::Error;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("display name must not be empty")]
    EmptyDisplayName,

    #[error("message body must not be empty")]
    EmptyMessageBody,

    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// Session registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The connection already owns a participant
    #[error("connection has already joined as '{0}'")]
    AlreadyJoined(String),

    /// Another connection owns the display name
    #[error("display name '{0}' is already taken")]
    NameTaken(String),
}
