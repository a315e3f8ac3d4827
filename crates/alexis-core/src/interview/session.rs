//! The session-level aggregate assembled at interview completion.

use super::config::InterviewConfig;
use super::summary::InterviewSummary;
use super::transcript::TranscriptEntry;
use serde::{Deserialize, Serialize};

/// A completed interview session.
///
/// Created once at session completion and treated as append-only /
/// immutable thereafter; handed to the persistence collaborator as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    /// ISO-8601 timestamp of session completion.
    pub date: String,
    /// Derived label, `"{type} - {role}"`.
    #[serde(rename = "type")]
    pub session_type: String,
    /// Total answering time in minutes, rounded. Thinking and transition
    /// time is excluded.
    pub duration: u64,
    /// Rounded mean of all per-answer scores; 0 for an empty transcript.
    pub average_score: u8,
    pub config: InterviewConfig,
    pub transcript: Vec<TranscriptEntry>,
    pub summary: InterviewSummary,
}

impl InterviewSession {
    /// Assembles the final session aggregate from the parts the engine
    /// accumulated.
    ///
    /// `answer_seconds` is the sum of per-answer capture durations, not
    /// wall-clock session length.
    pub fn assemble(
        config: InterviewConfig,
        transcript: Vec<TranscriptEntry>,
        summary: InterviewSummary,
        answer_seconds: u64,
        completed_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            date: completed_at.to_rfc3339(),
            session_type: config.session_label(),
            duration: minutes_rounded(answer_seconds),
            average_score: average_score(&transcript),
            config,
            transcript,
            summary,
        }
    }
}

/// Rounded mean of `feedback.score` across all entries; 0 when empty.
/// Never NaN.
pub fn average_score(transcript: &[TranscriptEntry]) -> u8 {
    if transcript.is_empty() {
        return 0;
    }
    let total: u64 = transcript.iter().map(|t| t.feedback.score as u64).sum();
    ((total as f64 / transcript.len() as f64).round()) as u8
}

fn minutes_rounded(seconds: u64) -> u64 {
    ((seconds as f64) / 60.0).round() as u64
}
