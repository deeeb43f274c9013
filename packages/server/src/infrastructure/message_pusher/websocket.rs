//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の受け付けは UI 層（`ui/handler/websocket.rs`）で行われます。
//! UI 層が sender を生成して登録し、この実装はそれを使って送信するだけです。
//! 各接続のキューは FIFO なので、同じ送信者からのメッセージは送信順に届きます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel};

pub struct WebSocketMessagePusher {
    /// Key: connection id / Value: 送信キュー
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(HashMap::new())))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(connection_id).is_some() {
            tracing::debug!(
                "Connection '{}' unregistered from MessagePusher",
                connection_id
            );
        }
    }

    async fn connection_ids(&self) -> Vec<ConnectionId> {
        let clients = self.clients.lock().await;
        clients.keys().cloned().collect()
    }

    async fn is_connected(&self, connection_id: &ConnectionId) -> bool {
        let clients = self.clients.lock().await;
        clients.contains_key(connection_id)
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;
        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.to_string()))?;

        sender
            .send(content.to_string())
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to connection '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            match clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => {
                    if let Err(e) = sender.send(content.to_string()) {
                        tracing::warn!("Failed to push message to connection '{}': {}", target, e);
                    }
                }
                None => {
                    tracing::debug!("Connection '{}' gone during broadcast, skipping", target);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(id("c1"), tx).await;

        // when (操作):
        let result = pusher.push_to(&id("c1"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_unknown_connection() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();

        // when (操作):
        let result = pusher.push_to(&id("nobody"), "Hello").await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn test_push_to_closed_receiver() {
        // テスト項目: 受信側が閉じた接続への送信は PushFailed になる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(id("c1"), tx).await;
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&id("c1"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_only_reaches_targets() {
        // テスト項目: ブロードキャストは対象の接続にだけ届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(id("c1"), tx1).await;
        pusher.register_client(id("c2"), tx2).await;

        // when (操作):
        let result = pusher.broadcast(vec![id("c2"), id("gone")], "Broadcast").await;

        // then (期待する結果): 存在しない接続は無視される
        assert!(result.is_ok());
        assert_eq!(rx2.recv().await, Some("Broadcast".to_string()));
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_preserves_order() {
        // テスト項目: 同じ接続へのメッセージは送信順に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(id("c1"), tx).await;

        // when (操作):
        for i in 0..10 {
            pusher
                .broadcast(vec![id("c1")], &format!("m{i}"))
                .await
                .unwrap();
        }

        // then (期待する結果):
        for i in 0..10 {
            assert_eq!(rx.recv().await, Some(format!("m{i}")));
        }
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除した接続は接続一覧から消える
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(id("c1"), tx).await;

        // when (操作):
        pusher.unregister_client(&id("c1")).await;
        pusher.unregister_client(&id("c1")).await;

        // then (期待する結果):
        assert!(pusher.connection_ids().await.is_empty());
        assert!(!pusher.is_connected(&id("c1")).await);
    }

    #[tokio::test]
    async fn test_is_connected() {
        // テスト項目: 登録中の接続だけが接続中と判定される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.register_client(id("c1"), tx).await;

        // when (操作) / then (期待する結果):
        assert!(pusher.is_connected(&id("c1")).await);
        assert!(!pusher.is_connected(&id("c2")).await);
    }
}
