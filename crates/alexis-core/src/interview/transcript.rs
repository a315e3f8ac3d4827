//! Transcript entries accumulated over a session.

use super::feedback::InterviewFeedback;
use serde::{Deserialize, Serialize};

/// Sentinel answer used when the candidate stops cleanly without speaking.
pub const EMPTY_ANSWER: &str = "No answer provided.";

/// Sentinel answer used when no-speech retries are exhausted.
pub const NO_SPEECH_ANSWER: &str = "I did not provide an answer.";

/// One answered question in chronological order.
///
/// Appended exactly once per question by the session engine and never
/// mutated after append. Index order is question order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub question: String,
    pub answer: String,
    pub feedback: InterviewFeedback,
    /// Candidate-authored free-text note, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Seconds spent answering, if captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}
