//! Speech Output Controller abstraction.

use crate::error::Result;
use async_trait::async_trait;

/// Drives text-to-speech playback of interview questions.
///
/// Implementations must keep at most one utterance active: `speak` cancels
/// any in-flight utterance before starting a new one, and there is no
/// queueing. The future resolves exactly once, when audio playback ends;
/// that resolution is the only resume signal the session engine receives
/// from this component.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Speaks `text`, resolving when playback completes.
    async fn speak(&self, text: &str) -> Result<()>;

    /// Cancels any in-flight utterance immediately. Safe to call when
    /// nothing is playing.
    fn cancel(&self);
}
