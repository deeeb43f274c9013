//! UI 層（axum による WebSocket / HTTP の入口）

pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
