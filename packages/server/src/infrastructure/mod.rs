//! Infrastructure 層
//!
//! - `repository`: セッションレジストリの保存先
//! - `message_pusher`: クライアントへのメッセージ送信
//! - `dto`: WebSocket / HTTP のワイヤーフォーマット

pub mod dto;
pub mod message_pusher;
pub mod repository;
