//! Phases and observable events of the session engine.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// One discrete step of the session state machine.
///
/// At most one of `Asking`/`Listening`/`Analyzing` is ever active; the
/// `Error` pseudo-state is entered just before a fatal failure is
/// returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    GeneratingQuestion,
    Asking,
    Listening,
    ReAsking,
    Analyzing,
    Transitioning,
    GeneratingSummary,
    Finished,
    Error,
}

/// Events published to the frontend while a session runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    PhaseChanged {
        phase: Phase,
    },
    /// The next question is ready to be asked. `number` is 1-based.
    QuestionReady {
        number: usize,
        total: usize,
        text: String,
    },
    /// Transient status worth showing (e.g. retry notices).
    Status {
        message: String,
    },
    /// A user-visible failure. Non-fatal errors leave the session
    /// running; fatal ones precede engine termination.
    ErrorReported {
        message: String,
        fatal: bool,
    },
    /// An answer finished analysis and was appended to the transcript.
    AnswerRecorded {
        question_number: usize,
        score: u8,
        /// The interviewer's conversational reply for this answer.
        response: String,
    },
    /// The completed session was handed to the persistence collaborator.
    SessionStored {
        session_id: String,
    },
    Finished,
}
