//! UseCase 層
//!
//! One struct per coordinator operation. Use cases depend only on the domain
//! traits (`SessionRepository`, `MessagePusher`) and a `Clock`, and encode
//! outgoing events with the WebSocket DTOs.

mod disconnect_participant;
mod error;
mod get_participants;
mod join_chat;
mod open_connection;
mod send_message;

pub use disconnect_participant::{DisconnectOutcome, DisconnectParticipantUseCase};
pub use error::{JoinError, SendMessageError};
pub use get_participants::GetParticipantsUseCase;
pub use join_chat::JoinChatUseCase;
pub use open_connection::OpenConnectionUseCase;
pub use send_message::SendMessageUseCase;
