//! Conversion logic from domain entities to DTOs.

use yoriai_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::{ChatMessage, Participant, Timestamp},
    infrastructure::dto::{
        http::{ParticipantDto, ParticipantsDto},
        websocket::{
            DisconnectNoticePayload, JoinErrorPayload, JoinSuccessPayload, NewMessagePayload,
            ServerEvent,
        },
    },
};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&ChatMessage> for ServerEvent {
    fn from(message: &ChatMessage) -> Self {
        Self::NewMessage(NewMessagePayload {
            message: message.body.as_str().to_string(),
            sender: message.sender_name.as_str().to_string(),
            sent_at: message.sent_at.value(),
        })
    }
}

impl ServerEvent {
    pub fn join_success(participant: &Participant) -> Self {
        Self::JoinSuccess(JoinSuccessPayload {
            username: participant.display_name.as_str().to_string(),
        })
    }

    pub fn join_error(reason: impl ToString) -> Self {
        Self::JoinError(JoinErrorPayload {
            message: reason.to_string(),
        })
    }

    /// Presence notice announcing that `participant` left the room.
    pub fn disconnect_notice(participant: &Participant, disconnected_at: Timestamp) -> Self {
        let name = participant.display_name.as_str();
        Self::DisconnectNotice(DisconnectNoticePayload {
            message: format!("{} left the chat", name),
            username: name.to_string(),
            disconnected_at: disconnected_at.value(),
        })
    }
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Participant> for ParticipantDto {
    fn from(participant: &Participant) -> Self {
        Self {
            username: participant.display_name.as_str().to_string(),
            joined_at: timestamp_to_jst_rfc3339(participant.joined_at.value()),
        }
    }
}

impl From<Vec<Participant>> for ParticipantsDto {
    fn from(participants: Vec<Participant>) -> Self {
        Self {
            count: participants.len(),
            participants: participants.iter().map(ParticipantDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, MessageBody};

    fn alice() -> Participant {
        Participant::new(
            ConnectionId::new("c1".to_string()).unwrap(),
            DisplayName::new("Alice").unwrap(),
            Timestamp::new(0),
        )
    }

    #[test]
    fn test_chat_message_to_new_message() {
        // テスト項目: ChatMessage が new_message イベントに変換される
        // given (前提条件):
        let message = ChatMessage::new(&alice(), MessageBody::new("hi").unwrap(), Timestamp::new(2000));

        // when (操作):
        let event = ServerEvent::from(&message);

        // then (期待する結果):
        assert_eq!(
            event,
            ServerEvent::NewMessage(NewMessagePayload {
                message: "hi".to_string(),
                sender: "Alice".to_string(),
                sent_at: 2000,
            })
        );
    }

    #[test]
    fn test_disconnect_notice_message() {
        // テスト項目: 退出通知に「<name> left the chat」が含まれる
        // when (操作):
        let event = ServerEvent::disconnect_notice(&alice(), Timestamp::new(3000));

        // then (期待する結果):
        assert_eq!(
            event,
            ServerEvent::DisconnectNotice(DisconnectNoticePayload {
                message: "Alice left the chat".to_string(),
                username: "Alice".to_string(),
                disconnected_at: 3000,
            })
        );
    }

    #[test]
    fn test_participants_to_dto() {
        // テスト項目: 参加者一覧が HTTP DTO に変換される
        // when (操作):
        let dto = ParticipantsDto::from(vec![alice()]);

        // then (期待する結果):
        assert_eq!(dto.count, 1);
        assert_eq!(dto.participants[0].username, "Alice");
        assert_eq!(dto.participants[0].joined_at, "1970-01-01T09:00:00+09:00");
    }
}
