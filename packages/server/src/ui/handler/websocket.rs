//! WebSocket connection handlers.
//!
//! Each connection is served by two tasks:
//!
//! - a receive loop that decodes `ClientEvent`s and runs the matching use
//!   case, one event at a time in arrival order
//! - a pusher loop that drains the connection's outbound queue into the socket
//!
//! When either task ends the other is aborted and awaited, then the disconnect
//! path runs.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::ConnectionId,
    infrastructure::dto::websocket::{ClientEvent, JoinChatPayload, SendMessagePayload},
    ui::state::AppState,
    usecase::SendMessageError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and writes them to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.open_connection_usecase.execute(tx).await;
    tracing::info!("Connection '{}' opened", connection_id);

    let state_clone = state.clone();
    let connection_id_clone = connection_id.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => dispatch(&state_clone, &connection_id_clone, event).await,
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring malformed frame from '{}': {}",
                            connection_id_clone,
                            e
                        );
                    }
                },
                Message::Binary(data) => {
                    tracing::debug!(
                        "Ignoring {} byte binary frame from '{}'",
                        data.len(),
                        connection_id_clone
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol layer
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other and wait for it, so
    // that no event is still being dispatched when the disconnect path runs
    tokio::select! {
        _ = &mut recv_task => {
            send_task.abort();
            let _ = send_task.await;
        }
        _ = &mut send_task => {
            recv_task.abort();
            let _ = recv_task.await;
        }
    };

    match state
        .disconnect_participant_usecase
        .execute(connection_id.clone())
        .await
    {
        Some(outcome) => {
            tracing::info!(
                "'{}' left the chat ({} connection(s) notified)",
                outcome.participant.display_name,
                outcome.notified.len()
            );
        }
        None => {
            tracing::info!("Connection '{}' closed without joining", connection_id);
        }
    }
}

async fn dispatch(state: &AppState, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::JoinChat(JoinChatPayload { username }) => {
            match state
                .join_chat_usecase
                .execute(connection_id.clone(), &username)
                .await
            {
                Ok(participant) => {
                    tracing::info!(
                        "Connection '{}' joined as '{}'",
                        connection_id,
                        participant.display_name
                    );
                }
                Err(e) => {
                    tracing::info!("Join rejected for '{}': {}", connection_id, e);
                }
            }
        }
        ClientEvent::SendMessage(SendMessagePayload { message }) => {
            match state
                .send_message_usecase
                .execute(connection_id.clone(), &message)
                .await
            {
                Ok(_) => {}
                // 未参加・空メッセージは黙って破棄する
                Err(e @ (SendMessageError::NotJoined | SendMessageError::EmptyBody)) => {
                    tracing::debug!("Dropped message from '{}': {}", connection_id, e);
                }
                Err(e) => {
                    tracing::warn!("Failed to relay message from '{}': {}", connection_id, e);
                }
            }
        }
    }
}
