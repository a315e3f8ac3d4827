//! Interview domain module.
//!
//! Contains the session data model, the feedback/summary aggregation
//! logic, and the repository interface for completed sessions.
//!
//! # Module Structure
//!
//! - `config`: immutable per-session parameters (`InterviewConfig`)
//! - `feedback`: per-answer scoring model (`InterviewFeedback`)
//! - `transcript`: chronological answer log (`TranscriptEntry`)
//! - `summary`: end-of-session report and badges (`InterviewSummary`)
//! - `session`: the completed-session aggregate (`InterviewSession`)
//! - `aggregator`: scoring/summarization orchestration (`FeedbackAggregator`)
//! - `repository`: persistence trait (`SessionRepository`)

mod aggregator;
mod config;
mod feedback;
mod repository;
mod session;
mod summary;
mod transcript;

pub use aggregator::FeedbackAggregator;
pub use config::{
    Difficulty, InterviewConfig, InterviewPlan, InterviewType, InterviewerPersona,
    DEFAULT_QUESTION_COUNT,
};
pub use feedback::{clamp_score, AnswerEvaluation, GrammarCorrection, InterviewFeedback};
pub use repository::SessionRepository;
pub use session::{average_score, InterviewSession};
pub use summary::{evaluate_badges, Badge, InterviewSummary};
pub use transcript::{TranscriptEntry, EMPTY_ANSWER, NO_SPEECH_ANSWER};
