//! Feedback & Summary Aggregator.
//!
//! Converts raw answers into scored feedback and, at session end, reduces
//! all per-answer feedback into a holistic summary plus badge awards.
//! Scoring failures degrade to a zero-score fallback so the session can
//! always complete; summarization failure is fatal to the report because
//! there is no neutral equivalent to substitute.

use super::feedback::InterviewFeedback;
use super::summary::{evaluate_badges, InterviewSummary};
use super::transcript::TranscriptEntry;
use crate::error::Result;
use crate::oracle::{FeedbackOracle, SummaryOracle};
use std::sync::Arc;
use tracing::warn;

pub struct FeedbackAggregator {
    feedback_oracle: Arc<dyn FeedbackOracle>,
    summary_oracle: Arc<dyn SummaryOracle>,
}

impl FeedbackAggregator {
    pub fn new(
        feedback_oracle: Arc<dyn FeedbackOracle>,
        summary_oracle: Arc<dyn SummaryOracle>,
    ) -> Self {
        Self {
            feedback_oracle,
            summary_oracle,
        }
    }

    /// Scores one answer. Never fails: an oracle error is replaced with
    /// the zero-score fallback so the transcript entry is never left
    /// feedback-less.
    pub async fn score_answer(&self, question: &str, answer: &str) -> InterviewFeedback {
        match self.feedback_oracle.evaluate_answer(question, answer).await {
            Ok(feedback) => feedback,
            Err(e) => {
                warn!(error = %e, "scoring oracle failed, substituting fallback feedback");
                InterviewFeedback::fallback(answer)
            }
        }
    }

    /// Produces the end-of-session summary with badges merged in.
    ///
    /// An empty transcript skips the oracle entirely and returns the
    /// canned no-answers summary. Oracle failure propagates: a report
    /// without a real summary is surfaced as an error rather than
    /// silently degraded.
    pub async fn summarize_session(&self, transcript: &[TranscriptEntry]) -> Result<InterviewSummary> {
        if transcript.is_empty() {
            return Ok(InterviewSummary::no_answers());
        }

        let feedback: Vec<InterviewFeedback> =
            transcript.iter().map(|t| t.feedback.clone()).collect();
        let mut summary = self.summary_oracle.summarize(&feedback).await?;
        summary.badges_earned = evaluate_badges(transcript).into_iter().collect();
        Ok(summary)
    }
}
