//! Voice selection policy for question playback.
//!
//! Platform voice lists load asynchronously and may be empty at first
//! call; selection degrades gracefully to the platform default rather
//! than blocking.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// The exact voice name used when the platform offers it.
pub const IDEAL_VOICE: &str = "Zephyr";

/// Known high-quality voices, in priority order.
static PREFERRED_VOICES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "Google US English",
        "Google UK English Female",
        "Microsoft Zira - English (United States)",
        "Microsoft Hazel - English (United Kingdom)",
        "Samantha",
    ]
});

/// A synthesis voice as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 locale tag, e.g. "en-US".
    pub lang: String,
}

/// Pitch/rate applied to an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub pitch: f32,
    pub rate: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            pitch: 1.0,
            rate: 1.0,
        }
    }
}

/// The outcome of voice selection for one utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceChoice {
    /// `None` means the platform default voice, with default settings.
    pub voice: Option<Voice>,
    pub settings: VoiceSettings,
}

/// Selects the interviewer voice from the platform's voice list.
///
/// Priority order:
/// 1. the exact [`IDEAL_VOICE`] name;
/// 2. the first match from the preferred high-quality list;
/// 3. the first `en-` voice whose name suggests a female voice;
/// 4. the platform default (no explicit voice).
///
/// Pitch is nudged slightly only when an explicit voice was found.
pub fn select_voice(available: &[Voice]) -> VoiceChoice {
    let chosen = available
        .iter()
        .find(|v| v.name == IDEAL_VOICE)
        .or_else(|| {
            available
                .iter()
                .find(|v| PREFERRED_VOICES.contains(&v.name.as_str()))
        })
        .or_else(|| {
            available
                .iter()
                .find(|v| v.lang.starts_with("en-") && v.name.to_lowercase().contains("female"))
        });

    match chosen {
        Some(voice) => VoiceChoice {
            voice: Some(voice.clone()),
            settings: VoiceSettings {
                pitch: 1.05,
                rate: 1.0,
            },
        },
        None => VoiceChoice {
            voice: None,
            settings: VoiceSettings::default(),
        },
    }
}
