//! Utilities shared by the yoriai server and client.

pub mod logger;
pub mod time;
