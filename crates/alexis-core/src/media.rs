//! Media devices collaborator.
//!
//! Supplies camera/microphone permission for the session. The live video
//! stream itself is a frontend concern; the engine only needs the
//! permission gate, and denial is fatal before `listening` can start.

use crate::error::Result;
use async_trait::async_trait;

/// Requests camera/microphone access from the platform.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Resolves when access is granted; returns
    /// [`AlexisError::PermissionDenied`] when the user or platform
    /// refuses.
    ///
    /// [`AlexisError::PermissionDenied`]: crate::error::AlexisError::PermissionDenied
    async fn request_access(&self) -> Result<()>;
}

/// A media gate that always grants access. Used by frontends that manage
/// devices themselves (or have none, like the terminal).
pub struct AlwaysGranted;

#[async_trait]
impl MediaDevices for AlwaysGranted {
    async fn request_access(&self) -> Result<()> {
        Ok(())
    }
}
