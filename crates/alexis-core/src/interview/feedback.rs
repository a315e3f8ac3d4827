//! Per-answer feedback produced by the scoring oracle.

use serde::{Deserialize, Serialize};

/// Short text judgments for the four evaluation axes.
///
/// These are one-sentence judgments, not numeric scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvaluation {
    pub clarity: String,
    pub relevance: String,
    pub structure: String,
    pub confidence: String,
}

/// Grammar assessment for a single answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarCorrection {
    pub has_errors: bool,
    pub explanation: String,
}

/// Structured feedback for one answered question.
///
/// Produced once per answer by the scoring oracle and never mutated.
/// When the oracle fails, [`InterviewFeedback::fallback`] is substituted
/// so a transcript entry is never left feedback-less.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFeedback {
    /// Overall score for the answer, 0-100.
    pub score: u8,
    /// Quality score for transcript display and difficulty adaptation, 0-100.
    pub response_quality: u8,
    pub evaluation: AnswerEvaluation,
    pub grammar_correction: GrammarCorrection,
    /// A rewritten, professional version of the candidate's response.
    pub professional_rewrite: String,
    /// 1-2 actionable tips for improvement.
    pub tips: Vec<String>,
    /// The interviewer's conversational reply, spoken back to the candidate.
    pub alexis_response: String,
    pub word_count: u32,
    /// Count of filler words ("um", "uh", "like", "you know", "so").
    pub filler_words: u32,
    /// Whether the answer used a concrete example.
    pub has_example: bool,
}

impl InterviewFeedback {
    /// The neutral, zero-score feedback substituted when the scoring
    /// oracle fails. Keeps the session able to complete.
    pub fn fallback(answer: &str) -> Self {
        Self {
            score: 0,
            response_quality: 0,
            evaluation: AnswerEvaluation {
                clarity: "N/A".to_string(),
                relevance: "N/A".to_string(),
                structure: "N/A".to_string(),
                confidence: "N/A".to_string(),
            },
            grammar_correction: GrammarCorrection {
                has_errors: false,
                explanation: "Error analyzing.".to_string(),
            },
            professional_rewrite: answer.to_string(),
            tips: Vec::new(),
            alexis_response: "Sorry, I couldn't process that.".to_string(),
            word_count: 0,
            filler_words: 0,
            has_example: false,
        }
    }
}

/// Clamps an oracle-provided numeric score into the 0-100 range.
///
/// Oracles occasionally return out-of-range or fractional values; all
/// numeric feedback fields are coerced on ingest.
pub fn clamp_score(raw: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}
