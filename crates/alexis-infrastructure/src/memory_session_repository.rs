//! In-memory session repository.
//!
//! Used by tests and as a fallback when no storage directory is
//! available. Nothing survives process exit.

use alexis_core::error::Result;
use alexis_core::interview::{InterviewSession, SessionRepository};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A `SessionRepository` backed by a process-local map.
#[derive(Default)]
pub struct MemorySessionRepository {
    sessions: RwLock<HashMap<String, InterviewSession>>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn save(&self, session: &InterviewSession) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .await
            .insert(id.clone(), session.clone());
        Ok(id)
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<InterviewSession>> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<(String, InterviewSession)>> {
        let sessions = self.sessions.read().await;
        let mut all: Vec<_> = sessions
            .iter()
            .map(|(id, session)| (id.clone(), session.clone()))
            .collect();
        all.sort_by(|a, b| b.1.date.cmp(&a.1.date));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alexis_core::interview::{
        Difficulty, InterviewConfig, InterviewSummary, InterviewType, InterviewerPersona,
    };

    fn session() -> InterviewSession {
        InterviewSession::assemble(
            InterviewConfig {
                interview_type: InterviewType::Behavioral,
                difficulty: Difficulty::Easy,
                persona: InterviewerPersona::Friendly,
                role: "Designer".to_string(),
            },
            vec![],
            InterviewSummary::no_answers(),
            0,
            chrono::Utc::now(),
        )
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let repo = MemorySessionRepository::new();
        let id = repo.save(&session()).await.unwrap();
        let found = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.session_type, "Behavioral - Designer");
    }

    #[tokio::test]
    async fn find_unknown_id_is_none() {
        let repo = MemorySessionRepository::new();
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_returns_every_saved_session() {
        let repo = MemorySessionRepository::new();
        repo.save(&session()).await.unwrap();
        repo.save(&session()).await.unwrap();
        assert_eq!(repo.list_all().await.unwrap().len(), 2);
    }
}
