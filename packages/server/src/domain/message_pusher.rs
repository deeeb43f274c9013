//! MessagePusher trait 定義
//!
//! クライアントへのメッセージ送信の抽象化。
//! UseCase 層はこの trait に依存し、WebSocket などの具体的な実装には依存しない。
//!
//! The pusher tracks every open connection of the room, joined or not; this
//! set is the broadcast audience.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::value_object::ConnectionId;

/// Outbound queue of one connection. Frames are delivered in push order.
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// Start delivering frames to a newly opened connection.
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Stop delivering frames to a closed connection. No-op if unknown.
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// Every currently open connection.
    async fn connection_ids(&self) -> Vec<ConnectionId>;

    /// Whether the connection is still open.
    async fn is_connected(&self, connection_id: &ConnectionId) -> bool;

    /// Push one frame to one connection.
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// Push one frame to each target. Individual failures are tolerated.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
