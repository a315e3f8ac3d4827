//! Secret configuration file storage.
//!
//! Loads API credentials from `~/.config/alexis/secret.json`, with an
//! environment-variable fallback for headless and CI use.

use crate::paths::AlexisPaths;
use alexis_core::error::{AlexisError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Gemini API credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    /// Optional model override; the client default applies when absent.
    pub model_name: Option<String>,
}

/// The on-disk shape of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    pub gemini: Option<GeminiConfig>,
}

/// Read-only storage for the secrets file.
///
/// Responsibilities:
/// - Load secret.json from the config directory
/// - Parse JSON into the `SecretConfig` model
///
/// Does NOT:
/// - Write or modify secret files
/// - Validate API keys
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a storage pointing at the default path
    /// (`~/.config/alexis/secret.json`).
    pub fn new() -> Result<Self> {
        Ok(Self {
            path: AlexisPaths::secret_file()?,
        })
    }

    /// Creates a storage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and parses the secrets file.
    pub fn load(&self) -> Result<SecretConfig> {
        if !self.path.exists() {
            return Err(AlexisError::not_found(
                "secret file",
                self.path.display().to_string(),
            ));
        }
        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Returns the path this storage reads from.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

/// Resolves Gemini credentials: `secret.json` first, environment second.
///
/// Environment variables: `GEMINI_API_KEY` for the key,
/// `ALEXIS_MODEL_NAME` for the optional model override. An empty key in
/// the secrets file is treated as absent.
pub fn resolve_gemini_config() -> Result<GeminiConfig> {
    if let Ok(storage) = SecretStorage::new() {
        if let Ok(config) = storage.load() {
            if let Some(gemini) = config.gemini {
                if !gemini.api_key.is_empty() {
                    return Ok(gemini);
                }
            }
        }
    }

    let api_key = env::var("GEMINI_API_KEY").map_err(|_| {
        AlexisError::config(
            "No Gemini API key found. Add it to secret.json or set GEMINI_API_KEY.",
        )
    })?;
    Ok(GeminiConfig {
        api_key,
        model_name: env::var("ALEXIS_MODEL_NAME").ok(),
    })
}
