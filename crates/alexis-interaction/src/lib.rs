//! Generative-AI integrations for Alexis.
//!
//! Provides the Gemini-backed implementations of the core oracle traits:
//! question generation, answer scoring, and session summarization.

pub mod gemini;

pub use gemini::GeminiClient;
