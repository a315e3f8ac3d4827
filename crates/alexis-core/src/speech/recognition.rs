//! Speech recognition engine abstraction and its event model.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Recognition locale used for all capture sessions.
pub const RECOGNITION_LANG: &str = "en-US";

/// Classified recognition failures, mirroring the platform error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecognitionErrorKind {
    /// Expected during programmatic phase transitions; never reported
    /// upward.
    Aborted,
    /// No speech was detected before the engine gave up.
    NoSpeech,
    /// Transient transport failure between the engine and its service.
    Network,
    /// Microphone permission denied by the user.
    NotAllowed,
    /// Recognition service refused access.
    ServiceNotAllowed,
    /// Anything else, with the engine's own error string.
    #[serde(untagged)]
    Other(String),
}

/// Events emitted by a recognition engine during one capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    /// Capture actually began; retry counters reset on this event.
    Started,
    /// A recognized chunk. `transcript` is the full accumulated text for
    /// the session so far (the engine re-concatenates all result chunks
    /// on every event); `is_final` marks that the batch contained a final
    /// result.
    Result { transcript: String, is_final: bool },
    /// Capture stopped, cleanly or after an error.
    Ended,
    /// A classified failure. `Ended` still follows.
    Error { kind: RecognitionErrorKind },
}

/// A live stream of recognition events for one capture session.
pub type RecognitionStream = mpsc::Receiver<RecognitionEvent>;

/// Drives continuous speech-to-text capture.
///
/// Engines run in continuous mode with interim results enabled and the
/// fixed [`RECOGNITION_LANG`] locale. Each `start` opens a fresh event
/// stream; the engine closes the stream after emitting `Ended`.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Begins a capture session and returns its event stream.
    async fn start(&self) -> Result<RecognitionStream>;

    /// Requests a clean stop; the engine emits any pending final result,
    /// then `Ended`.
    fn stop(&self);

    /// Aborts immediately. The engine emits `Error { Aborted }` (ignored
    /// upstream) and closes the stream.
    fn abort(&self);
}
