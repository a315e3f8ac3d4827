//! Session engine module.
//!
//! - `event`: phases and frontend-observable events
//! - `machine`: the `InterviewEngine` state machine and its handle

mod event;
mod machine;

#[cfg(test)]
mod machine_test;

pub use event::{EngineEvent, Phase};
pub use machine::{
    EngineDeps, EngineHandle, InterviewEngine, MAX_NETWORK_RETRIES, MAX_NO_SPEECH_RETRIES,
    NETWORK_RETRY_DELAY, RE_ASK_PAUSE, RE_ASK_PHRASE, TRANSITION_DELAY,
};
