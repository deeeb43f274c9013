//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断処理（レジストリからの削除、退出通知のブロードキャスト）
//!
//! ### なぜこのテストが必要か
//! - 切断した参加者の名前が解放され、再び使えることを保証する
//! - 退出通知が残りの参加者にだけ、1 回だけ届くことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）、未参加の接続の切断
//! - 冪等性：同じ接続の 2 回目の切断

use std::sync::Arc;

use yoriai_shared::time::Clock;

use crate::{
    domain::{ConnectionId, MessagePusher, Participant, SessionRepository, Timestamp},
    infrastructure::dto::websocket::ServerEvent,
};

/// Result of removing a registered participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// The participant that left
    pub participant: Participant,
    /// Connections the presence notice was sent to
    pub notified: Vec<ConnectionId>,
}

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
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

    /// 切断を実行
    ///
    /// The connection's outbound queue is always released. If the connection
    /// had joined, its participant is removed and the remaining connections
    /// receive a `disconnect_notice`.
    ///
    /// # Returns
    ///
    /// * `Some(DisconnectOutcome)` - 参加者が削除され、通知が送られた
    /// * `None` - 参加していない接続、または切断済みの接続（何もしない）
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<DisconnectOutcome> {
        // 1. 切断した接続自身には何も送らない
        self.message_pusher.unregister_client(&connection_id).await;

        // 2. Repository から参加者を削除（未登録なら終了）
        let participant = self
            .repository
            .unregister_participant(&connection_id)
            .await?;

        // 3. 残りの接続に退出を通知
        let notice =
            ServerEvent::disconnect_notice(&participant, Timestamp::new(self.clock.now_millis()));
        let notify_targets = self.get_notify_targets(&connection_id).await;
        match serde_json::to_string(&notice) {
            Ok(json) => {
                if let Err(e) = self
                    .message_pusher
                    .broadcast(notify_targets.clone(), &json)
                    .await
                {
                    tracing::warn!("Failed to broadcast disconnect notice: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to encode disconnect notice: {}", e),
        }

        Some(DisconnectOutcome {
            participant,
            notified: notify_targets,
        })
    }

    /// 通知対象（切断した接続以外の全ての接続）
    async fn get_notify_targets(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        self.message_pusher
            .connection_ids()
            .await
            .into_iter()
            .filter(|id| id != exclude)
            .collect()
    }
}
