//! Repository trait 定義
//!
//! ドメイン層が必要とするセッションレジストリへのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ConnectionId, Participant, RegistryError};

/// Session Repository trait
///
/// Each method is one atomic step against the registry: an implementation
/// must never let another call observe or interleave with a half-applied
/// registration or removal.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// 参加者を登録（名前の重複チェックと挿入を一度に行う）
    async fn register_participant(&self, participant: Participant) -> Result<(), RegistryError>;

    /// 参加者を削除し、削除した参加者を返す
    async fn unregister_participant(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// 接続 ID から参加者を取得
    async fn find_participant(&self, connection_id: &ConnectionId) -> Option<Participant>;

    /// 参加者一覧を取得（参加時刻順）
    async fn get_participants(&self) -> Vec<Participant>;

    /// 参加者数を取得
    async fn count_participants(&self) -> usize;
}
