//! Speech I/O abstractions.
//!
//! Browser-style speech synthesis/recognition are platform capabilities;
//! they live behind the [`SpeechSynthesizer`] and [`SpeechRecognizer`]
//! traits so a local engine or a cloud transcription API can be
//! substituted without touching the session state machine. The
//! engine-agnostic capture protocol (silence timeout, transcript
//! accumulation, elapsed tick) lives in [`capture`].

mod capture;
mod recognition;
mod synthesis;
mod voice;

pub use capture::{AnswerCapture, CaptureOutcome, SILENCE_TIMEOUT};
pub use recognition::{
    RecognitionErrorKind, RecognitionEvent, RecognitionStream, SpeechRecognizer, RECOGNITION_LANG,
};
pub use synthesis::SpeechSynthesizer;
pub use voice::{select_voice, Voice, VoiceChoice, VoiceSettings, IDEAL_VOICE};
