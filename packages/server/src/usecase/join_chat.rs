//! UseCase: 参加（名前の取得）処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 名前の検証、重複チェック、登録、要求元への応答
//!
//! ### なぜこのテストが必要か
//! - 同じ名前のセッションは同時に 1 つまでであることを保証する
//! - 結果は要求元にだけ届き、他の参加者には何も送られないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新しい名前での参加（前後の空白は除去される）
//! - 異常系：空の名前、使用中の名前、同じ接続からの 2 回目の参加
//! - 競合：切断処理の後に届いた参加要求

use std::sync::Arc;

use yoriai_shared::time::Clock;

use crate::{
    domain::{ConnectionId, DisplayName, MessagePusher, Participant, SessionRepository, Timestamp},
    infrastructure::dto::websocket::ServerEvent,
};

use super::error::JoinError;

/// 参加のユースケース
pub struct JoinChatUseCase {
    repository: Arc<dyn SessionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl JoinChatUseCase {
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

    /// 参加を実行し、結果を要求元の接続にだけ送信する
    ///
    /// # Returns
    ///
    /// * `Ok(Participant)` - 登録された参加者（正規化された表示名を持つ）
    /// * `Err(JoinError)` - 参加失敗（`join_error` として要求元に通知済み）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
    ) -> Result<Participant, JoinError> {
        let outcome = self.register(connection_id.clone(), raw_name).await;

        let reply = match &outcome {
            Ok(participant) => ServerEvent::join_success(participant),
            // 閉じた接続には応答しない
            Err(JoinError::ConnectionClosed) => return outcome,
            Err(error) => ServerEvent::join_error(error),
        };
        self.reply(&connection_id, &reply).await;

        outcome
    }

    async fn register(
        &self,
        connection_id: ConnectionId,
        raw_name: &str,
    ) -> Result<Participant, JoinError> {
        let display_name = DisplayName::new(raw_name).map_err(|_| JoinError::InvalidName)?;
        let participant = Participant::new(
            connection_id,
            display_name,
            Timestamp::new(self.clock.now_millis()),
        );

        // 重複チェックと登録は Repository 内で 1 回のロックで行われる
        self.repository
            .register_participant(participant.clone())
            .await?;

        // 切断処理は送信キューを先に解放するので、登録後に確認すれば
        // 切断と入れ違いになった参加者を取り残さない
        if !self.message_pusher.is_connected(&participant.id).await {
            self.repository.unregister_participant(&participant.id).await;
            return Err(JoinError::ConnectionClosed);
        }

        Ok(participant)
    }

    async fn reply(&self, connection_id: &ConnectionId, event: &ServerEvent) {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode {}: {}", event.name(), e);
                return;
            }
        };

        if let Err(e) = self.message_pusher.push_to(connection_id, &json).await {
            tracing::warn!(
                "Failed to send {} to connection '{}': {}",
                event.name(),
                connection_id,
                e
            );
        }
    }
}
