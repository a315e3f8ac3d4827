//! End-of-session summary and badge evaluation.

use super::transcript::TranscriptEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::Display;

/// Session-level achievement tags computed from transcript statistics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum Badge {
    #[serde(rename = "Good Communicator")]
    #[strum(serialize = "Good Communicator")]
    GoodCommunicator,
    #[serde(rename = "Time Manager")]
    #[strum(serialize = "Time Manager")]
    TimeManager,
}

/// Holistic end-of-session report produced by the summarization oracle,
/// plus locally computed badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSummary {
    pub overall_summary: String,
    pub actionable_tips: Vec<String>,
    pub encouragement: String,
    pub simulated_facial_expression_analysis: String,
    pub simulated_body_language_analysis: String,
    pub simulated_audio_analysis: String,
    #[serde(default)]
    pub badges_earned: Vec<Badge>,
}

impl InterviewSummary {
    /// The canned summary used when the candidate ended the session
    /// without answering any questions. No oracle call is made.
    pub fn no_answers() -> Self {
        Self {
            overall_summary: "You did not answer any questions during this session. \
                              Complete an interview to get detailed feedback."
                .to_string(),
            actionable_tips: vec![
                "Try answering at least one question in your next practice session.".to_string(),
                "Ensure your microphone is set up and working correctly.".to_string(),
            ],
            encouragement: "Every attempt is a step forward. Keep practicing!".to_string(),
            simulated_facial_expression_analysis: "Analysis requires completed answers."
                .to_string(),
            simulated_body_language_analysis: "Analysis requires completed answers.".to_string(),
            simulated_audio_analysis: "Analysis requires completed answers.".to_string(),
            badges_earned: Vec::new(),
        }
    }
}

/// Evaluates badges over a full transcript. Pure function, no oracle calls.
///
/// Any single qualifying entry awards the badge for the whole session;
/// each badge is awarded at most once.
pub fn evaluate_badges(transcript: &[TranscriptEntry]) -> BTreeSet<Badge> {
    let mut badges = BTreeSet::new();

    for entry in transcript {
        let duration = entry.duration.unwrap_or(0);

        // Time Manager: a complete answer delivered within 20-60 seconds.
        if (20..=60).contains(&duration) {
            badges.insert(Badge::TimeManager);
        }

        // Good Communicator: speaks for more than 30 seconds with minimal
        // filler words.
        if duration > 30 && entry.feedback.filler_words <= 5 {
            badges.insert(Badge::GoodCommunicator);
        }
    }

    badges
}
