//! The Interview Session Orchestrator.
//!
//! A single owned state machine that drives one interview session end to
//! end: question generation, speech playback, answer capture with bounded
//! retry, per-answer scoring, and final summary/persistence. All state
//! transitions happen inside `run`'s event loop; the frontend observes
//! phases and events through the [`EngineHandle`] and the event stream.

use super::event::{EngineEvent, Phase};
use crate::error::{AlexisError, Result};
use crate::interview::{
    FeedbackAggregator, InterviewConfig, InterviewPlan, InterviewSession, SessionRepository,
    TranscriptEntry, EMPTY_ANSWER, NO_SPEECH_ANSWER,
};
use crate::media::MediaDevices;
use crate::oracle::{CandidateContext, QuestionOracle};
use crate::speech::{AnswerCapture, CaptureOutcome, RecognitionErrorKind, SpeechSynthesizer};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// No-speech errors re-ask the same question at most this many times.
pub const MAX_NO_SPEECH_RETRIES: u32 = 2;

/// Transient network errors restart capture at most this many times.
pub const MAX_NETWORK_RETRIES: u32 = 3;

/// Fixed back-off before a network-triggered capture restart.
pub const NETWORK_RETRY_DELAY: Duration = Duration::from_millis(1500);

/// Cosmetic pause after an answer is saved, before the next question.
pub const TRANSITION_DELAY: Duration = Duration::from_millis(1500);

/// Short pause between the re-ask apology and listening again.
pub const RE_ASK_PAUSE: Duration = Duration::from_millis(500);

/// Spoken when the candidate wasn't heard and the question is re-asked.
pub const RE_ASK_PHRASE: &str = "I'm sorry, I didn't catch that. Let's try again.";

/// External collaborators injected into the engine.
pub struct EngineDeps {
    pub question_oracle: Arc<dyn QuestionOracle>,
    pub aggregator: FeedbackAggregator,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub capture: AnswerCapture,
    pub media: Arc<dyn MediaDevices>,
    pub repository: Arc<dyn SessionRepository>,
}

/// Frontend-facing control surface for a running session.
#[derive(Clone)]
pub struct EngineHandle {
    end: CancellationToken,
    phase_rx: watch::Receiver<Phase>,
    notes: Arc<Mutex<Option<String>>>,
}

impl EngineHandle {
    /// Forces the session into summary generation with whatever
    /// transcript has accumulated. Safe in every state; invoking it twice
    /// has no additional effect.
    pub fn end_interview(&self) {
        self.end.cancel();
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        *self.phase_rx.borrow()
    }

    /// A watch on phase transitions.
    pub fn phase_watch(&self) -> watch::Receiver<Phase> {
        self.phase_rx.clone()
    }

    /// Attaches a candidate note to the question currently in flight.
    pub fn set_notes(&self, notes: impl Into<String>) {
        if let Ok(mut slot) = self.notes.lock() {
            *slot = Some(notes.into());
        }
    }
}

enum QuestionFlow {
    /// The answer was recorded; continue with the next question.
    Completed,
    /// The session was ended by the user mid-question.
    Ended,
}

/// The session state machine. Construct with [`InterviewEngine::new`],
/// then drive to completion with [`InterviewEngine::run`].
pub struct InterviewEngine {
    config: InterviewConfig,
    plan: InterviewPlan,
    candidate: CandidateContext,
    deps: EngineDeps,
    transcript: Vec<TranscriptEntry>,
    answer_seconds: u64,
    phase_tx: watch::Sender<Phase>,
    events: mpsc::UnboundedSender<EngineEvent>,
    end: CancellationToken,
    notes: Arc<Mutex<Option<String>>>,
}

impl InterviewEngine {
    pub fn new(
        config: InterviewConfig,
        plan: InterviewPlan,
        candidate: CandidateContext,
        deps: EngineDeps,
    ) -> (Self, EngineHandle, mpsc::UnboundedReceiver<EngineEvent>) {
        let (phase_tx, phase_rx) = watch::channel(Phase::GeneratingQuestion);
        let (events, events_rx) = mpsc::unbounded_channel();
        let end = CancellationToken::new();
        let notes = Arc::new(Mutex::new(None));

        let handle = EngineHandle {
            end: end.clone(),
            phase_rx,
            notes: Arc::clone(&notes),
        };

        let engine = Self {
            config,
            plan,
            candidate,
            deps,
            transcript: Vec::new(),
            answer_seconds: 0,
            phase_tx,
            events,
            end,
            notes,
        };

        (engine, handle, events_rx)
    }

    /// Runs the session to completion and returns the assembled
    /// [`InterviewSession`].
    ///
    /// Fatal conditions (permission denial, question-oracle failure,
    /// summarization failure) surface as errors after the `Error`
    /// pseudo-state is published. An early end via the handle is not an
    /// error: the summary is generated over the partial transcript.
    pub async fn run(mut self) -> Result<InterviewSession> {
        if let Err(e) = self.deps.media.request_access().await {
            let e = match e {
                AlexisError::PermissionDenied(_) => e,
                other => AlexisError::permission_denied(other.to_string()),
            };
            return Err(self.fail(e));
        }

        while self.transcript.len() < self.plan.question_count && !self.end.is_cancelled() {
            match self.run_question().await {
                Ok(QuestionFlow::Completed) => {}
                Ok(QuestionFlow::Ended) => break,
                Err(e) => return Err(self.fail(e)),
            }
        }

        self.finish().await
    }

    async fn run_question(&mut self) -> Result<QuestionFlow> {
        self.set_phase(Phase::GeneratingQuestion);
        let question_number = self.transcript.len() + 1;

        let question = tokio::select! {
            _ = self.end.cancelled() => return Ok(QuestionFlow::Ended),
            result = self.deps.question_oracle.next_question(
                &self.config,
                &self.transcript,
                &self.candidate,
                question_number,
            ) => result.map_err(|e| {
                AlexisError::oracle(format!("failed to generate question: {}", e))
            })?,
        };

        self.emit(EngineEvent::QuestionReady {
            number: question_number,
            total: self.plan.question_count,
            text: question.clone(),
        });

        self.set_phase(Phase::Asking);
        tokio::select! {
            _ = self.end.cancelled() => {
                self.deps.synthesizer.cancel();
                return Ok(QuestionFlow::Ended);
            }
            result = self.deps.synthesizer.speak(&question) => {
                if let Err(e) = result {
                    // The question is still visible through QuestionReady;
                    // a playback failure does not block the answer.
                    warn!(error = %e, "question playback failed");
                }
            }
        }

        self.listen_for_answer(&question).await
    }

    /// The `listening` phase with its bounded retry protocol.
    async fn listen_for_answer(&mut self, question: &str) -> Result<QuestionFlow> {
        let mut no_speech_retries = 0u32;
        let mut network_retries = 0u32;

        loop {
            self.set_phase(Phase::Listening);
            let outcome = tokio::select! {
                _ = self.end.cancelled() => {
                    self.deps.capture.abort();
                    return Ok(QuestionFlow::Ended);
                }
                outcome = self.deps.capture.capture() => outcome?,
            };

            match outcome {
                CaptureOutcome::Completed {
                    transcript,
                    duration,
                } => {
                    return self.record_answer(question, &transcript, duration).await;
                }
                CaptureOutcome::Failed {
                    kind: RecognitionErrorKind::NoSpeech,
                    ..
                } => {
                    if no_speech_retries < MAX_NO_SPEECH_RETRIES {
                        no_speech_retries += 1;
                        debug!(no_speech_retries, "no speech detected, re-asking");
                        self.set_phase(Phase::ReAsking);
                        tokio::select! {
                            _ = self.end.cancelled() => {
                                self.deps.synthesizer.cancel();
                                return Ok(QuestionFlow::Ended);
                            }
                            result = self.deps.synthesizer.speak(RE_ASK_PHRASE) => {
                                if let Err(e) = result {
                                    warn!(error = %e, "re-ask playback failed");
                                }
                            }
                        }
                        tokio::time::sleep(RE_ASK_PAUSE).await;
                    } else {
                        // Retries exhausted: a sentinel answer keeps the
                        // session moving without user intervention.
                        return self.record_answer(question, NO_SPEECH_ANSWER, 0).await;
                    }
                }
                CaptureOutcome::Failed {
                    kind: RecognitionErrorKind::Network,
                    partial,
                    duration,
                } => {
                    if network_retries < MAX_NETWORK_RETRIES {
                        network_retries += 1;
                        self.emit(EngineEvent::Status {
                            message: format!(
                                "Network issue. Retrying... ({}/{})",
                                network_retries, MAX_NETWORK_RETRIES
                            ),
                        });
                        tokio::select! {
                            _ = self.end.cancelled() => return Ok(QuestionFlow::Ended),
                            _ = tokio::time::sleep(NETWORK_RETRY_DELAY) => {}
                        }
                    } else {
                        self.emit(EngineEvent::ErrorReported {
                            message: "A network error occurred with the speech service. \
                                      Please check your connection."
                                .to_string(),
                            fatal: false,
                        });
                        return self.record_answer(question, &partial, duration).await;
                    }
                }
                CaptureOutcome::Failed {
                    kind: RecognitionErrorKind::NotAllowed | RecognitionErrorKind::ServiceNotAllowed,
                    ..
                } => {
                    return Err(AlexisError::permission_denied(
                        "microphone access was denied during capture",
                    ));
                }
                CaptureOutcome::Failed {
                    kind,
                    partial,
                    duration,
                } => {
                    self.emit(EngineEvent::ErrorReported {
                        message: format!("An unexpected error occurred: {:?}.", kind),
                        fatal: false,
                    });
                    return self.record_answer(question, &partial, duration).await;
                }
            }
        }
    }

    /// The `analyzing` and `transitioning` phases for one answer.
    async fn record_answer(
        &mut self,
        question: &str,
        raw_answer: &str,
        duration: u64,
    ) -> Result<QuestionFlow> {
        self.set_phase(Phase::Analyzing);

        let trimmed = raw_answer.trim();
        let answer = if trimmed.is_empty() {
            EMPTY_ANSWER.to_string()
        } else {
            trimmed.to_string()
        };

        // Fallback feedback is substituted inside the aggregator, so the
        // entry below always carries feedback.
        let feedback = self.deps.aggregator.score_answer(question, &answer).await;
        let notes = self.notes.lock().ok().and_then(|mut slot| slot.take());

        self.emit(EngineEvent::AnswerRecorded {
            question_number: self.transcript.len() + 1,
            score: feedback.score,
            response: feedback.alexis_response.clone(),
        });

        self.transcript.push(TranscriptEntry {
            question: question.to_string(),
            answer,
            feedback,
            notes,
            duration: Some(duration),
        });
        self.answer_seconds += duration;

        self.set_phase(Phase::Transitioning);
        tokio::select! {
            _ = self.end.cancelled() => return Ok(QuestionFlow::Ended),
            _ = tokio::time::sleep(TRANSITION_DELAY) => {}
        }

        Ok(QuestionFlow::Completed)
    }

    /// The `generating_summary` phase. Always entered exactly once, both
    /// on natural exhaustion and on early end.
    async fn finish(mut self) -> Result<InterviewSession> {
        self.set_phase(Phase::GeneratingSummary);

        // No dangling audio may survive into summary generation.
        self.deps.synthesizer.cancel();
        self.deps.capture.abort();

        let summary = match self.deps.aggregator.summarize_session(&self.transcript).await {
            Ok(summary) => summary,
            Err(e) => return Err(self.fail(e)),
        };

        let session = InterviewSession::assemble(
            self.config.clone(),
            std::mem::take(&mut self.transcript),
            summary,
            self.answer_seconds,
            chrono::Utc::now(),
        );

        // Fire-and-forget persistence: a storage failure must not keep
        // the candidate from seeing their report.
        match self.deps.repository.save(&session).await {
            Ok(session_id) => {
                self.emit(EngineEvent::SessionStored { session_id });
            }
            Err(e) => {
                warn!(error = %e, "failed to persist interview session");
            }
        }

        self.set_phase(Phase::Finished);
        self.emit(EngineEvent::Finished);
        Ok(session)
    }

    fn set_phase(&self, phase: Phase) {
        debug!(%phase, "phase transition");
        self.phase_tx.send_replace(phase);
        self.emit(EngineEvent::PhaseChanged { phase });
    }

    /// Publishes the `Error` pseudo-state and the user-visible message,
    /// then hands the error back for propagation.
    fn fail(&self, e: AlexisError) -> AlexisError {
        self.set_phase(Phase::Error);
        self.emit(EngineEvent::ErrorReported {
            message: e.user_message(),
            fatal: true,
        });
        e
    }

    fn emit(&self, event: EngineEvent) {
        // The frontend may have dropped its receiver; the session still
        // runs to completion.
        let _ = self.events.send(event);
    }
}
