//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Participant as listed by `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantDto {
    pub username: String,
    /// RFC 3339, JST
    pub joined_at: String,
}

/// Response body of `GET /api/participants`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantsDto {
    pub count: usize,
    pub participants: Vec<ParticipantDto>,
}
