//! ドメイン層
//!
//! Value objects, entities (including the session registry) and the traits the
//! use cases depend on. Nothing here knows about WebSocket or HTTP.

pub mod entity;
pub mod error;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Participant, SessionRegistry};
pub use error::{RegistryError, ValueObjectError};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use repository::SessionRepository;
pub use value_object::{ConnectionId, DisplayName, MessageBody, Timestamp};
