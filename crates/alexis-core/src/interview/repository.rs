//! Session repository trait.
//!
//! Defines the interface for session persistence, decoupling the engine
//! from the specific storage mechanism (in-memory, JSON directory,
//! remote API). Implementations are constructed once per process and
//! injected by reference; nothing reaches storage via ambient globals.

use super::session::InterviewSession;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for completed interview sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a completed session and returns its opaque identifier.
    async fn save(&self, session: &InterviewSession) -> Result<String>;

    /// Finds a stored session by its identifier.
    ///
    /// Returns `Ok(None)` when no session has that identifier.
    async fn find_by_id(&self, session_id: &str) -> Result<Option<InterviewSession>>;

    /// Lists all stored sessions with their identifiers, newest first.
    async fn list_all(&self) -> Result<Vec<(String, InterviewSession)>>;
}
