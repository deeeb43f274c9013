//! Data Transfer Objects (DTOs)
//!
//! - `websocket`: WebSocket event DTOs
//! - `http`: HTTP API response DTOs
//! - `conversion`: domain → DTO conversions

pub mod conversion;
pub mod http;
pub mod websocket;
