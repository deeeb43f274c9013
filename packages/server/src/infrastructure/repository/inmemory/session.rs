//! InMemory Session Repository 実装
//!
//! `SessionRegistry` を `tokio::sync::Mutex` で保護し、1 回のロック内で
//! 検索と更新を完結させる。これにより同じ名前を 2 つの接続が同時に
//! 取得することはない。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, Participant, RegistryError, SessionRegistry, SessionRepository};

/// インメモリ Session Repository 実装
pub struct InMemorySessionRepository {
    registry: Arc<Mutex<SessionRegistry>>,
}

impl InMemorySessionRepository {
    pub fn new(registry: Arc<Mutex<SessionRegistry>>) -> Self {
        Self { registry }
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new(Arc::new(Mutex::new(SessionRegistry::new())))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn register_participant(&self, participant: Participant) -> Result<(), RegistryError> {
        let mut registry = self.registry.lock().await;
        registry.register(participant)
    }

    async fn unregister_participant(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let mut registry = self.registry.lock().await;
        registry.unregister(connection_id)
    }

    async fn find_participant(&self, connection_id: &ConnectionId) -> Option<Participant> {
        let registry = self.registry.lock().await;
        registry.get(connection_id).cloned()
    }

    async fn get_participants(&self) -> Vec<Participant> {
        let registry = self.registry.lock().await;
        registry.participants()
    }

    async fn count_participants(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.len()
    }
}
