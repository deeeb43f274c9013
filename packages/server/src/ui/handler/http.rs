//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::ParticipantsDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current participants of the room
pub async fn get_participants(State(state): State<Arc<AppState>>) -> Json<ParticipantsDto> {
    let participants = state.get_participants_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(ParticipantsDto::from(participants))
}
