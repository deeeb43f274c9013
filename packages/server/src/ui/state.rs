//! Server state shared by the handlers.

use std::sync::Arc;

use crate::usecase::{
    DisconnectParticipantUseCase, GetParticipantsUseCase, JoinChatUseCase, OpenConnectionUseCase,
    SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// 接続の受け付け
    pub open_connection_usecase: Arc<OpenConnectionUseCase>,
    /// 参加
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    /// メッセージ送信
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// 切断
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// 参加者一覧
    pub get_participants_usecase: Arc<GetParticipantsUseCase>,
}
