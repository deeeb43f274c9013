//! UseCase: 参加者一覧の取得

use std::sync::Arc;

use crate::domain::{Participant, SessionRepository};

pub struct GetParticipantsUseCase {
    repository: Arc<dyn SessionRepository>,
}

impl GetParticipantsUseCase {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    /// Snapshot of the registry, ordered by join time then display name.
    pub async fn execute(&self) -> Vec<Participant> {
        self.repository.get_participants().await
    }
}
