//! WebSocket client session management.
//!
//! One session lasts from opening the channel to losing it. Typed lines and
//! server frames are handled by a single loop, so the local state machine has
//! exactly one owner.

use std::time::Duration;

use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use yoriai_server::infrastructure::dto::{
    http::ParticipantsDto,
    websocket::{ClientEvent, ServerEvent},
};
use yoriai_shared::time::get_jst_timestamp;

use crate::{
    domain::{
        ChatSession, Command, ConnectionState, SessionUpdate, parse_command, participants_url,
    },
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::redisplay_prompt};

const HTTP_TIMEOUT_SECS: u64 = 5;

/// What to do with one line of user input
#[derive(Debug, PartialEq, Eq)]
enum InputAction {
    Exit,
    Show(String),
    ListUsers,
    Send {
        event: ClientEvent,
        echo: Option<String>,
    },
}

/// Run one WebSocket client session
///
/// `username` holds the last accepted display name. The session joins with it
/// as soon as the channel opens and updates it when the server accepts a name.
///
/// # Returns
///
/// * `Ok(())` - the user left (`/exit`, Ctrl+C or Ctrl+D)
/// * `Err(ClientError::ConnectionError)` - the channel could not be opened
/// * `Err(ClientError::ConnectionLost)` - the channel was lost after opening
pub async fn run_client_session(
    url: &str,
    username: &mut String,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();
    let mut session = ChatSession::new();
    session.on_channel_open();

    match session.request_join(username.as_str()) {
        Ok(event) => send_event(&mut write, &event).await?,
        Err(_) => print!("{}", MessageFormatter::format_name_request()),
    }
    redisplay_prompt();

    loop {
        tokio::select! {
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // 入力が閉じられた（Ctrl+C / Ctrl+D）
                    write.close().await.ok();
                    return Ok(());
                };

                match handle_input(&mut session, &line, get_jst_timestamp()) {
                    InputAction::Exit => {
                        write.close().await.ok();
                        return Ok(());
                    }
                    InputAction::Show(text) => print!("{}", text),
                    InputAction::ListUsers => match fetch_participants(url).await {
                        Ok(participants) => print!(
                            "{}",
                            MessageFormatter::format_participants(&participants, session.username())
                        ),
                        Err(e) => print!("{}", MessageFormatter::format_error(&e)),
                    },
                    InputAction::Send { event, echo } => {
                        send_event(&mut write, &event).await?;
                        if let Some(echo) = echo {
                            print!("{}", echo);
                        }
                    }
                }
                redisplay_prompt();
            }
            message = read.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => {
                            if let Some(output) = apply_server_event(&mut session, &event, username) {
                                print!("{}", output);
                            }
                            if *session.state() == ConnectionState::Disconnected {
                                return Err(ClientError::ConnectionLost(
                                    "Removed from the chat by the server".to_string(),
                                ));
                            }
                        }
                        Err(_) => print!("{}", MessageFormatter::format_raw_message(&text)),
                    },
                    Some(Ok(Message::Binary(data))) => {
                        print!("{}", MessageFormatter::format_binary_message(data.len()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        session.on_channel_closed();
                        return Err(ClientError::ConnectionLost(
                            "Server closed the connection".to_string(),
                        ));
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        session.on_channel_closed();
                        return Err(ClientError::ConnectionLost(e.to_string()));
                    }
                    // Ping/pong is handled by tungstenite
                    Some(Ok(_)) => continue,
                }
                redisplay_prompt();
            }
        }
    }
}

async fn send_event<S>(write: &mut S, event: &ClientEvent) -> Result<(), ClientError>
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    let json = serde_json::to_string(event)
        .map_err(|e| ClientError::ConnectionLost(format!("Failed to encode request: {}", e)))?;

    write.send(Message::Text(json.into())).await.map_err(|e| {
        tracing::warn!("Failed to send message: {}", e);
        ClientError::ConnectionLost(e.to_string())
    })
}

/// Fetch the participant list from the server's HTTP API.
async fn fetch_participants(ws_url: &str) -> Result<ParticipantsDto, ClientError> {
    let url = participants_url(ws_url).ok_or_else(|| {
        ClientError::ParticipantsUnavailable(format!("no HTTP endpoint for {}", ws_url))
    })?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .map_err(|e| ClientError::ParticipantsUnavailable(e.to_string()))?;

    client
        .get(&url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| ClientError::ParticipantsUnavailable(e.to_string()))?
        .json::<ParticipantsDto>()
        .await
        .map_err(|e| ClientError::ParticipantsUnavailable(e.to_string()))
}

/// Decide what a typed line means in the current state.
///
/// While no name has been accepted and no join is pending, a line is a new
/// display name. Otherwise it is a chat message.
fn handle_input(session: &mut ChatSession, line: &str, now: i64) -> InputAction {
    match parse_command(line) {
        Some(Command::Exit) => return InputAction::Exit,
        Some(Command::Status) => {
            return InputAction::Show(MessageFormatter::format_status(session.state()));
        }
        Some(Command::Users) => return InputAction::ListUsers,
        None => {}
    }

    if session.wants_name() {
        return match session.request_join(line) {
            Ok(event) => InputAction::Send { event, echo: None },
            Err(e) => InputAction::Show(MessageFormatter::format_error(&e)),
        };
    }

    match session.request_send(line) {
        Ok(event) => {
            let echo = match &event {
                ClientEvent::SendMessage(payload) => {
                    Some(MessageFormatter::format_own_message(&payload.message, now))
                }
                ClientEvent::JoinChat(_) => None,
            };
            InputAction::Send { event, echo }
        }
        Err(e) => InputAction::Show(MessageFormatter::format_error(&e)),
    }
}

/// Feed a server event to the state machine and render it.
fn apply_server_event(
    session: &mut ChatSession,
    event: &ServerEvent,
    username: &mut String,
) -> Option<String> {
    match session.on_server_event(event) {
        SessionUpdate::Joined(name) => {
            let output = MessageFormatter::format_join_success(&name);
            *username = name;
            Some(output)
        }
        SessionUpdate::JoinRejected(message) => Some(MessageFormatter::format_join_error(&message)),
        SessionUpdate::Notice | SessionUpdate::Removed => match event {
            ServerEvent::NewMessage(payload) => Some(MessageFormatter::format_chat_message(
                &payload.sender,
                &payload.message,
                payload.sent_at,
            )),
            ServerEvent::DisconnectNotice(payload) => Some(
                MessageFormatter::format_disconnect_notice(&payload.message, payload.disconnected_at),
            ),
            _ => None,
        },
        SessionUpdate::Ignored => {
            tracing::debug!("Ignoring unexpected {}", event.name());
            None
        }
    }
}
