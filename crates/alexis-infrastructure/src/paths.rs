//! Unified path management for Alexis configuration and data files.
//!
//! All configuration, secrets, and stored sessions live under the
//! platform config directory (e.g. `~/.config/alexis/` on Linux).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/alexis/
//! ├── secret.json     # API keys
//! └── sessions/       # One JSON file per completed session
//! ```

use alexis_core::error::{AlexisError, Result};
use std::path::PathBuf;

/// Unified path management for Alexis.
pub struct AlexisPaths;

impl AlexisPaths {
    /// Returns the Alexis configuration directory
    /// (e.g. `~/.config/alexis/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("alexis"))
            .ok_or_else(|| AlexisError::config("Cannot determine the configuration directory"))
    }

    /// Returns the path to the secrets file.
    ///
    /// The file should have restrictive permissions (e.g. 600); it is
    /// read, never written, by this crate.
    pub fn secret_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the directory where completed sessions are stored.
    pub fn sessions_dir() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("sessions"))
    }
}
