//! UseCase: 接続の受け付け
//!
//! Every upgraded WebSocket gets a fresh `ConnectionId` and its outbound queue
//! is registered with the pusher. The connection is not a participant until it
//! joins.

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

pub struct OpenConnectionUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl OpenConnectionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を登録し、割り当てた ConnectionId を返す
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        connection_id
    }
}
