//! Domain logic for client-side operations.
//!
//! This module contains the client's connection state machine and the
//! reconnection policy. Nothing here touches the network or the terminal,
//! which keeps it easy to test.

use std::fmt;

use yoriai_server::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use crate::error::ClientError;

/// Local view of the connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Channel is open; `pending` holds the name of an unanswered join request
    AwaitingJoin { pending: Option<String> },
    Joined { username: String },
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::AwaitingJoin { pending: None } => write!(f, "connected, not joined"),
            Self::AwaitingJoin {
                pending: Some(name),
            } => write!(f, "connected, joining as '{}'", name),
            Self::Joined { username } => write!(f, "joined as '{}'", username),
        }
    }
}

/// What a server event meant for this client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Our join request was accepted under this name
    Joined(String),
    /// Our join request was refused; another name may be tried
    JoinRejected(String),
    /// Something to show the user (a relayed message or someone else leaving)
    Notice,
    /// The server reported our own disconnection
    Removed,
    /// A join answer nobody asked for
    Ignored,
}

/// Local commands, handled by the client and never sent to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Status,
    /// List the participants of the room over the HTTP API
    Users,
}

/// Parse a line typed by the user as a local command.
pub fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "/exit" | "/quit" => Some(Command::Exit),
        "/status" => Some(Command::Status),
        "/users" => Some(Command::Users),
        _ => None,
    }
}

/// HTTP endpoint listing the participants of the server behind `ws_url`.
///
/// `ws://host:port/ws` maps to `http://host:port/api/participants` and
/// `wss://` maps to `https://`. Returns `None` for any other scheme.
pub fn participants_url(ws_url: &str) -> Option<String> {
    let (scheme, rest) = if let Some(rest) = ws_url.strip_prefix("ws://") {
        ("http", rest)
    } else if let Some(rest) = ws_url.strip_prefix("wss://") {
        ("https", rest)
    } else {
        return None;
    };

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if authority.is_empty() {
        return None;
    }
    Some(format!("{}://{}/api/participants", scheme, authority))
}

/// Client side of one chat session.
///
/// Every request goes through a guard that checks the current state, so an
/// illegal request is rejected locally and never reaches the server.
#[derive(Debug)]
pub struct ChatSession {
    state: ConnectionState,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Name we joined under, if any
    pub fn username(&self) -> Option<&str> {
        match &self.state {
            ConnectionState::Joined { username } => Some(username),
            _ => None,
        }
    }

    /// Whether a typed line should be taken as a display name
    pub fn wants_name(&self) -> bool {
        matches!(self.state, ConnectionState::AwaitingJoin { pending: None })
    }

    pub fn on_channel_open(&mut self) {
        self.state = ConnectionState::AwaitingJoin { pending: None };
    }

    pub fn on_channel_closed(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    /// Build a `join_chat` request for `raw_name`.
    ///
    /// The name is trimmed. On success the session waits for the answer and
    /// further join requests are refused until it arrives.
    pub fn request_join(&mut self, raw_name: &str) -> Result<ClientEvent, ClientError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(ClientError::EmptyName);
        }

        match &self.state {
            ConnectionState::Disconnected => Err(ClientError::NotConnected),
            ConnectionState::Joined { username } => {
                Err(ClientError::AlreadyJoined(username.clone()))
            }
            ConnectionState::AwaitingJoin { pending: Some(_) } => Err(ClientError::JoinPending),
            ConnectionState::AwaitingJoin { pending: None } => {
                self.state = ConnectionState::AwaitingJoin {
                    pending: Some(name.to_string()),
                };
                Ok(ClientEvent::join_chat(name))
            }
        }
    }

    /// Build a `send_message` request. Only legal once joined.
    pub fn request_send(&self, raw_message: &str) -> Result<ClientEvent, ClientError> {
        match &self.state {
            ConnectionState::Disconnected => return Err(ClientError::NotConnected),
            ConnectionState::AwaitingJoin { .. } => return Err(ClientError::NotJoined),
            ConnectionState::Joined { .. } => {}
        }

        let message = raw_message.trim();
        if message.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        Ok(ClientEvent::send_message(message))
    }

    /// Apply an event received from the server.
    pub fn on_server_event(&mut self, event: &ServerEvent) -> SessionUpdate {
        match event {
            ServerEvent::JoinSuccess(payload) => match &self.state {
                ConnectionState::AwaitingJoin {
                    pending: Some(requested),
                } => {
                    // 古いサーバーは username を返さないので要求した名前を使う
                    let username = if payload.username.is_empty() {
                        requested.clone()
                    } else {
                        payload.username.clone()
                    };
                    self.state = ConnectionState::Joined {
                        username: username.clone(),
                    };
                    SessionUpdate::Joined(username)
                }
                _ => SessionUpdate::Ignored,
            },
            ServerEvent::JoinError(payload) => match &self.state {
                ConnectionState::AwaitingJoin { .. } => {
                    self.state = ConnectionState::AwaitingJoin { pending: None };
                    SessionUpdate::JoinRejected(payload.message.clone())
                }
                _ => SessionUpdate::Ignored,
            },
            ServerEvent::NewMessage(_) => SessionUpdate::Notice,
            ServerEvent::DisconnectNotice(payload) => {
                if self.username() == Some(payload.username.as_str()) {
                    self.state = ConnectionState::Disconnected;
                    SessionUpdate::Removed
                } else {
                    SessionUpdate::Notice
                }
            }
        }
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// Only transport failures are worth a reconnection attempt.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    !matches!(
        error,
        ClientError::ConnectionError(_) | ClientError::ConnectionLost(_)
    )
}

/// Reconnection attempts already spent when `error` ended a session.
///
/// Losing a session that had connected starts a new series of attempts, so
/// every transport loss gets the full retry budget.
pub fn reconnect_attempts_after(error: &ClientError, previous_attempts: u32) -> u32 {
    match error {
        ClientError::ConnectionLost(_) => 0,
        _ => previous_attempts,
    }
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The number of reconnection attempts made so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}
