//! Error types for the Alexis interview engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the interview engine and its collaborators.
///
/// This provides typed, structured error variants with constructor helpers
/// so call sites stay terse. Every oracle/transport failure is converted
/// into one of these variants at the point of call; raw transport errors
/// never reach the user.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AlexisError {
    /// An external oracle (question, scoring, summary) failed.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// Speech synthesis or recognition engine failure.
    #[error("Speech error: {0}")]
    Speech(String),

    /// Camera/microphone permission was denied by the user or platform.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Data access error (repository/storage layer).
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// Entity not found with type information.
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Configuration error (missing API key, bad settings).
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations).
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Internal error (should not happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AlexisError {
    /// Creates an Oracle error.
    pub fn oracle(message: impl Into<String>) -> Self {
        Self::Oracle(message.into())
    }

    /// Creates a Speech error.
    pub fn speech(message: impl Into<String>) -> Self {
        Self::Speech(message.into())
    }

    /// Creates a PermissionDenied error.
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied(message.into())
    }

    /// Creates a DataAccess error.
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a NotFound error.
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an Oracle error.
    pub fn is_oracle(&self) -> bool {
        matches!(self, Self::Oracle(_))
    }

    /// Check if this is a PermissionDenied error.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// A short, actionable message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(_) => {
                "Microphone access was denied. Please enable it in your settings to continue."
                    .to_string()
            }
            Self::Oracle(_) => {
                "The interview assistant could not be reached. Please check your connection and restart."
                    .to_string()
            }
            Self::Speech(msg) => format!("A speech service problem occurred: {}.", msg),
            other => format!("An unexpected error occurred: {}.", other),
        }
    }
}

impl From<std::io::Error> for AlexisError {
    fn from(e: std::io::Error) -> Self {
        AlexisError::Io {
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for AlexisError {
    fn from(e: serde_json::Error) -> Self {
        AlexisError::Serialization {
            format: "JSON".to_string(),
            message: e.to_string(),
        }
    }
}

/// Convenient Result alias used across the engine.
pub type Result<T> = std::result::Result<T, AlexisError>;
