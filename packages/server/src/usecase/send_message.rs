//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 送信者以外へのブロードキャスト、未参加・空メッセージの破棄
//!
//! ### なぜこのテストが必要か
//! - 送信者に自分のメッセージが送り返されないこと（エコー抑制）を保証する
//! - 未参加の接続や空のメッセージは誰にも届かないことを確認
//! - 同じ送信者のメッセージが送信順に届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数人が参加している状態での送信
//! - 異常系：未参加の接続からの送信、空白のみのメッセージ
//! - エッジケース：送信者しかいない部屋での送信

use std::sync::Arc;

use yoriai_shared::time::Clock;

use crate::{
    domain::{
        ChatMessage, ConnectionId, MessageBody, MessagePusher, SessionRepository, Timestamp,
    },
    infrastructure::dto::websocket::ServerEvent,
};

use super::error::SendMessageError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - ブロードキャスト対象（送信者は含まない）
    /// * `Err(SendMessageError)` - 送信されなかった理由。クライアントには通知しない
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_body: &str,
    ) -> Result<Vec<ConnectionId>, SendMessageError> {
        let sender = self
            .repository
            .find_participant(&connection_id)
            .await
            .ok_or(SendMessageError::NotJoined)?;
        let body = MessageBody::new(raw_body).map_err(|_| SendMessageError::EmptyBody)?;

        let message = ChatMessage::new(&sender, body, Timestamp::new(self.clock.now_millis()));
        let json = serde_json::to_string(&ServerEvent::from(&message))
            .map_err(|e| SendMessageError::Encode(e.to_string()))?;

        let targets = self.get_broadcast_targets(&connection_id).await;
        self.message_pusher
            .broadcast(targets.clone(), &json)
            .await
            .map_err(|e| SendMessageError::BroadcastFailed(e.to_string()))?;

        tracing::debug!(
            "Relayed message from '{}' to {} connection(s)",
            message.sender_name,
            targets.len()
        );

        Ok(targets)
    }

    /// 送信者以外の全ての接続
    async fn get_broadcast_targets(&self, sender: &ConnectionId) -> Vec<ConnectionId> {
        self.message_pusher
            .connection_ids()
            .await
            .into_iter()
            .filter(|id| id != sender)
            .collect()
    }
}
