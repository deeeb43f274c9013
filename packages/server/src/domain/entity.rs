//! Entities
//!
//! `SessionRegistry` is the single piece of mutable room state. It keeps two
//! indexes that must always agree with each other:
//!
//! - `participants`: connection → participant
//! - `names`: display name → connection
//!
//! All mutation goes through [`SessionRegistry::register`] and
//! [`SessionRegistry::unregister`], which update both indexes together.

use std::collections::HashMap;

use super::{
    error::RegistryError,
    value_object::{ConnectionId, DisplayName, MessageBody, Timestamp},
};

/// A connection that has successfully claimed a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            id,
            display_name,
            joined_at,
        }
    }
}

/// A message in flight. Lives only for the duration of one broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_id: ConnectionId,
    pub sender_name: DisplayName,
    pub body: MessageBody,
    pub sent_at: Timestamp,
}

impl ChatMessage {
    pub fn new(sender: &Participant, body: MessageBody, sent_at: Timestamp) -> Self {
        Self {
            sender_id: sender.id.clone(),
            sender_name: sender.display_name.clone(),
            body,
            sent_at,
        }
    }
}

/// Active participants of the room, indexed both ways.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    participants: HashMap<ConnectionId, Participant>,
    names: HashMap<DisplayName, ConnectionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the participant's display name for its connection.
    ///
    /// Fails with `AlreadyJoined` when the connection is already registered
    /// (whatever name it asks for) and with `NameTaken` when another
    /// connection holds the name. On failure the registry is unchanged.
    pub fn register(&mut self, participant: Participant) -> Result<(), RegistryError> {
        if let Some(existing) = self.participants.get(&participant.id) {
            return Err(RegistryError::AlreadyJoined(
                existing.display_name.as_str().to_string(),
            ));
        }
        if self.names.contains_key(&participant.display_name) {
            return Err(RegistryError::NameTaken(
                participant.display_name.into_string(),
            ));
        }

        self.names
            .insert(participant.display_name.clone(), participant.id.clone());
        self.participants.insert(participant.id.clone(), participant);
        Ok(())
    }

    /// Remove the connection's participant, releasing its name.
    ///
    /// Returns `None` when the connection was not registered.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        let participant = self.participants.remove(connection_id)?;
        self.names.remove(&participant.display_name);
        Some(participant)
    }

    pub fn get(&self, connection_id: &ConnectionId) -> Option<&Participant> {
        self.participants.get(connection_id)
    }

    #[cfg(test)]
    pub fn find_by_name(&self, display_name: &DisplayName) -> Option<&Participant> {
        self.names
            .get(display_name)
            .and_then(|id| self.participants.get(id))
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants ordered by join time, then display name.
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self.participants.values().cloned().collect();
        participants.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, name: &str, joined_at: i64) -> Participant {
        Participant::new(
            ConnectionId::new(id.to_string()).unwrap(),
            DisplayName::new(name).unwrap(),
            Timestamp::new(joined_at),
        )
    }

    fn assert_indexes_agree(registry: &SessionRegistry) {
        assert_eq!(registry.participants.len(), registry.names.len());
        for (id, p) in &registry.participants {
            assert_eq!(&p.id, id);
            assert_eq!(registry.names.get(&p.display_name), Some(id));
        }
    }

    #[test]
    fn test_register_success() {
        // テスト項目: 参加者を登録すると両方のインデックスに反映される
        // given (前提条件):
        let mut registry = SessionRegistry::new();

        // when (操作):
        let result = registry.register(participant("c1", "Alice", 1000));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.len(), 1);
        let by_name = registry
            .find_by_name(&DisplayName::new("Alice").unwrap())
            .unwrap();
        assert_eq!(by_name.id.as_str(), "c1");
        assert_indexes_agree(&registry);
    }

    #[test]
    fn test_register_name_taken_by_other_connection() {
        // テスト項目: 他の接続が使用中の名前は登録できず、件数は 1 のまま
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.register(participant("c1", "Alice", 1000)).unwrap();

        // when (操作):
        let result = registry.register(participant("c2", "Alice", 2000));

        // then (期待する結果):
        assert_eq!(result, Err(RegistryError::NameTaken("Alice".to_string())));
        assert_eq!(registry.len(), 1);
        assert!(registry.get(&ConnectionId::new("c2".to_string()).unwrap()).is_none());
        assert_indexes_agree(&registry);
    }

    #[test]
    fn test_register_same_connection_twice() {
        // テスト項目: 登録済みの接続からの再登録は AlreadyJoined になる
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.register(participant("c1", "Alice", 1000)).unwrap();

        // when (操作): 同じ名前・別の名前のどちらでも
        let same_name = registry.register(participant("c1", "Alice", 2000));
        let other_name = registry.register(participant("c1", "Bob", 2000));

        // then (期待する結果):
        assert_eq!(
            same_name,
            Err(RegistryError::AlreadyJoined("Alice".to_string()))
        );
        assert_eq!(
            other_name,
            Err(RegistryError::AlreadyJoined("Alice".to_string()))
        );
        assert_eq!(registry.len(), 1);
        assert!(registry
            .find_by_name(&DisplayName::new("Bob").unwrap())
            .is_none());
        assert_indexes_agree(&registry);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        // テスト項目: 大文字小文字が異なる名前は別の名前として登録できる
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.register(participant("c1", "Alice", 1000)).unwrap();

        // when (操作):
        let result = registry.register(participant("c2", "alice", 2000));

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unregister_releases_name() {
        // テスト項目: 登録解除すると名前が解放され、再利用できる
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.register(participant("c1", "Alice", 1000)).unwrap();

        // when (操作):
        let removed = registry.unregister(&ConnectionId::new("c1".to_string()).unwrap());

        // then (期待する結果):
        assert_eq!(removed.map(|p| p.display_name.into_string()), Some("Alice".to_string()));
        assert!(registry.is_empty());
        assert_indexes_agree(&registry);
        assert!(registry.register(participant("c2", "Alice", 2000)).is_ok());
    }

    #[test]
    fn test_unregister_is_idempotent() {
        // テスト項目: 2 回目の登録解除は None を返し、何も変更しない
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.register(participant("c1", "Alice", 1000)).unwrap();
        registry.register(participant("c2", "Bob", 1000)).unwrap();
        let c1 = ConnectionId::new("c1".to_string()).unwrap();
        registry.unregister(&c1);

        // when (操作):
        let second = registry.unregister(&c1);

        // then (期待する結果):
        assert!(second.is_none());
        assert_eq!(registry.len(), 1);
        assert_indexes_agree(&registry);
    }

    #[test]
    fn test_participants_sorted_by_join_time_then_name() {
        // テスト項目: 参加者一覧は参加時刻、次に名前の順で並ぶ
        // given (前提条件):
        let mut registry = SessionRegistry::new();
        registry.register(participant("c1", "charlie", 3000)).unwrap();
        registry.register(participant("c2", "bob", 1000)).unwrap();
        registry.register(participant("c3", "alice", 1000)).unwrap();

        // when (操作):
        let names: Vec<String> = registry
            .participants()
            .into_iter()
            .map(|p| p.display_name.into_string())
            .collect();

        // then (期待する結果):
        assert_eq!(names, vec!["alice", "bob", "charlie"]);
    }

    #[test]
    fn test_chat_message_copies_sender_identity() {
        // テスト項目: ChatMessage は送信者の ID と名前を保持する
        // given (前提条件):
        let sender = participant("c1", "Alice", 1000);

        // when (操作):
        let message = ChatMessage::new(
            &sender,
            MessageBody::new("hi").unwrap(),
            Timestamp::new(2000),
        );

        // then (期待する結果):
        assert_eq!(message.sender_id, sender.id);
        assert_eq!(message.sender_name.as_str(), "Alice");
        assert_eq!(message.body.as_str(), "hi");
        assert_eq!(message.sent_at.value(), 2000);
    }
}
