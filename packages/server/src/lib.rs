//! Session coordinator for a single-room WebSocket chat.
//!
//! The coordinator owns the set of active participants, validates join
//! requests, relays chat messages to everyone but their author and announces
//! departures to the rest of the room.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
