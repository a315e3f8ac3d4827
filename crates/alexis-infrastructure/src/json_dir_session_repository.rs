//! Directory-backed session repository.
//!
//! Stores one JSON file per completed session under the sessions
//! directory (`~/.config/alexis/sessions/` by default). Writes go
//! through a temp file plus atomic rename so a crash mid-save never
//! leaves a truncated session on disk.

use crate::paths::AlexisPaths;
use alexis_core::error::{AlexisError, Result};
use alexis_core::interview::{InterviewSession, SessionRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

/// A `SessionRepository` that keeps each session as `<id>.json`.
pub struct JsonDirSessionRepository {
    dir: PathBuf,
}

impl JsonDirSessionRepository {
    /// Creates a repository rooted at the default sessions directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: AlexisPaths::sessions_dir()?,
        })
    }

    /// Creates a repository rooted at a custom directory (for testing).
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn read_session(path: &Path) -> Result<InterviewSession> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl SessionRepository for JsonDirSessionRepository {
    async fn save(&self, session: &InterviewSession) -> Result<String> {
        fs::create_dir_all(&self.dir).await?;

        let id = Uuid::new_v4().to_string();
        let path = self.session_path(&id);
        let tmp_path = self.dir.join(format!(".{id}.json.tmp"));

        let json = serde_json::to_string_pretty(session)?;
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &path).await?;

        Ok(id)
    }

    async fn find_by_id(&self, session_id: &str) -> Result<Option<InterviewSession>> {
        let path = self.session_path(session_id);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Self::read_session(&path).await?))
    }

    async fn list_all(&self) -> Result<Vec<(String, InterviewSession)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut sessions = Vec::new();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| AlexisError::data_access(format!("Failed to read sessions dir: {e}")))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            // A corrupt file should not hide the rest of the history.
            match Self::read_session(&path).await {
                Ok(session) => sessions.push((id.to_string(), session)),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable session file"),
            }
        }

        sessions.sort_by(|a, b| b.1.date.cmp(&a.1.date));
        Ok(sessions)
    }
}
