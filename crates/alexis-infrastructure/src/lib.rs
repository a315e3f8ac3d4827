//! Infrastructure layer for Alexis.
//!
//! Concrete storage and configuration plumbing behind the core traits:
//! path resolution, secrets loading, and the session repositories.

pub mod json_dir_session_repository;
pub mod memory_session_repository;
pub mod paths;
pub mod secret_storage;

pub use crate::json_dir_session_repository::JsonDirSessionRepository;
pub use crate::memory_session_repository::MemorySessionRepository;
pub use crate::paths::AlexisPaths;
pub use crate::secret_storage::{resolve_gemini_config, GeminiConfig, SecretConfig, SecretStorage};
