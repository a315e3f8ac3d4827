//! Core domain and orchestration logic for Alexis, the AI mock-interview
//! practice engine.
//!
//! The centerpiece is [`engine::InterviewEngine`], a single owned state
//! machine that coordinates four collaborating subsystems: speech output
//! (question playback), speech input (answer capture with silence and
//! retry handling), the generative oracles (question generation, answer
//! scoring, summarization), and session aggregation into a final report.
//!
//! Everything platform- or transport-specific sits behind traits:
//! [`speech::SpeechSynthesizer`], [`speech::SpeechRecognizer`],
//! [`oracle::QuestionOracle`] and friends, [`media::MediaDevices`], and
//! [`interview::SessionRepository`]. Implementations are injected at
//! construction; nothing is reached through ambient global state.

pub mod engine;
pub mod error;
pub mod interview;
pub mod media;
pub mod oracle;
pub mod speech;

// Re-export common error type
pub use error::{AlexisError, Result};
