//! Per-session interview configuration.
//!
//! `InterviewConfig` is created once at session setup and never mutated
//! while the session runs.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Default number of questions in a practice session.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// The category of interview being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum InterviewType {
    Behavioral,
    Technical,
    #[serde(rename = "Role-Specific")]
    #[strum(serialize = "Role-Specific")]
    RoleSpecific,
}

/// Question difficulty requested for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// The interviewer's conversational persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum InterviewerPersona {
    Neutral,
    Friendly,
    Strict,
}

/// Immutable per-session parameters chosen by the candidate at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewConfig {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub difficulty: Difficulty,
    pub persona: InterviewerPersona,
    /// Free-text target job title (e.g. "Software Engineer").
    pub role: String,
}

impl InterviewConfig {
    /// The session-level label derived from the config, e.g.
    /// `"Behavioral - Software Engineer"`.
    pub fn session_label(&self) -> String {
        format!("{} - {}", self.interview_type, self.role)
    }
}

/// How many questions a session will ask before wrapping up.
///
/// The practice flow uses [`DEFAULT_QUESTION_COUNT`]; recruiter-authored
/// assessments supply their own count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewPlan {
    pub question_count: usize,
}

impl Default for InterviewPlan {
    fn default() -> Self {
        Self {
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}
