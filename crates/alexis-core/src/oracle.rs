//! Oracle traits for the external generative collaborators.
//!
//! The engine treats question generation, answer scoring, and session
//! summarization as black-box request/response oracles. Transport and
//! prompt content live behind these traits (see `alexis-interaction` for
//! the Gemini-backed implementations); every failure is surfaced as an
//! [`AlexisError::Oracle`] and categorized by the caller.
//!
//! [`AlexisError::Oracle`]: crate::error::AlexisError::Oracle

use crate::error::Result;
use crate::interview::{InterviewConfig, InterviewFeedback, InterviewSummary, TranscriptEntry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Distilled candidate background used to tailor questions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateContext {
    /// One-paragraph resume summary.
    pub summary: String,
    /// Key skills pulled from the resume.
    pub skills: Vec<String>,
}

/// Generates the next interview question.
#[async_trait]
pub trait QuestionOracle: Send + Sync {
    /// Produces question `question_number` (1-based) given the session
    /// config, the answers so far, and the candidate's background.
    ///
    /// Difficulty adapts to prior answer quality; the oracle must not
    /// repeat questions already in the history.
    async fn next_question(
        &self,
        config: &InterviewConfig,
        history: &[TranscriptEntry],
        candidate: &CandidateContext,
        question_number: usize,
    ) -> Result<String>;
}

/// Scores a single answer.
#[async_trait]
pub trait FeedbackOracle: Send + Sync {
    /// Evaluates `answer` against `question`, returning structured
    /// feedback with all numeric fields coerced into 0-100.
    async fn evaluate_answer(&self, question: &str, answer: &str) -> Result<InterviewFeedback>;
}

/// Reduces a full session's feedback into a holistic summary.
#[async_trait]
pub trait SummaryOracle: Send + Sync {
    /// Summarizes the session. Badges are computed locally by the caller
    /// and merged afterwards; the oracle never sees them.
    async fn summarize(&self, feedback: &[InterviewFeedback]) -> Result<InterviewSummary>;
}
