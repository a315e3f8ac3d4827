//! Engine behavior tests over fully scripted collaborators.

use super::event::{EngineEvent, Phase};
use super::machine::{EngineDeps, InterviewEngine};
use crate::error::{AlexisError, Result};
use crate::interview::{
    Difficulty, FeedbackAggregator, InterviewConfig, InterviewFeedback, InterviewPlan,
    InterviewSession, InterviewSummary, InterviewType, InterviewerPersona, SessionRepository,
    TranscriptEntry, NO_SPEECH_ANSWER,
};
use crate::media::{AlwaysGranted, MediaDevices};
use crate::oracle::{CandidateContext, FeedbackOracle, QuestionOracle, SummaryOracle};
use crate::speech::{
    AnswerCapture, RecognitionErrorKind, RecognitionEvent, RecognitionStream, SpeechRecognizer,
    SpeechSynthesizer,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// ---- Scripted collaborators -------------------------------------------------

struct ScriptedQuestionOracle {
    calls: AtomicUsize,
    fail: bool,
}

impl ScriptedQuestionOracle {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }
}

#[async_trait]
impl QuestionOracle for ScriptedQuestionOracle {
    async fn next_question(
        &self,
        _config: &InterviewConfig,
        _history: &[TranscriptEntry],
        _candidate: &CandidateContext,
        question_number: usize,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AlexisError::oracle("question model unavailable"));
        }
        Ok(format!("Question {}?", question_number))
    }
}

struct ScriptedFeedbackOracle {
    /// Scores handed out in order; recycled if exhausted.
    scores: Mutex<Vec<u8>>,
    fail: bool,
}

impl ScriptedFeedbackOracle {
    fn with_scores(scores: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            scores: Mutex::new(scores),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            scores: Mutex::new(Vec::new()),
            fail: true,
        })
    }
}

#[async_trait]
impl FeedbackOracle for ScriptedFeedbackOracle {
    async fn evaluate_answer(&self, _question: &str, answer: &str) -> Result<InterviewFeedback> {
        if self.fail {
            return Err(AlexisError::oracle("scoring model unavailable"));
        }
        let mut feedback = InterviewFeedback::fallback(answer);
        let mut scores = self.scores.lock().unwrap();
        feedback.score = if scores.is_empty() { 50 } else { scores.remove(0) };
        feedback.alexis_response = "Thanks for that answer.".to_string();
        Ok(feedback)
    }
}

struct ScriptedSummaryOracle {
    fail: bool,
}

#[async_trait]
impl SummaryOracle for ScriptedSummaryOracle {
    async fn summarize(&self, _feedback: &[InterviewFeedback]) -> Result<InterviewSummary> {
        if self.fail {
            return Err(AlexisError::oracle("summary model unavailable"));
        }
        let mut summary = InterviewSummary::no_answers();
        summary.overall_summary = "A solid practice session.".to_string();
        Ok(summary)
    }
}

struct InstantSynthesizer {
    cancelled: AtomicBool,
}

impl InstantSynthesizer {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            cancelled: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for InstantSynthesizer {
    async fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// A recognizer scripted per capture attempt. Each `start` pops the next
/// attempt script and replays it; with no scripts left the stream stays
/// open (emitting only `Started`) until `stop`/`abort`.
struct AttemptRecognizer {
    attempts: Mutex<Vec<Vec<RecognitionEvent>>>,
    starts: AtomicUsize,
    aborted: AtomicBool,
    open_stop: Mutex<Option<mpsc::UnboundedSender<()>>>,
}

impl AttemptRecognizer {
    fn new(attempts: Vec<Vec<RecognitionEvent>>) -> Arc<Self> {
        Arc::new(Self {
            attempts: Mutex::new(attempts),
            starts: AtomicUsize::new(0),
            aborted: AtomicBool::new(false),
            open_stop: Mutex::new(None),
        })
    }

    fn spoken(answer: &str) -> Vec<RecognitionEvent> {
        vec![
            RecognitionEvent::Started,
            RecognitionEvent::Result {
                transcript: answer.to_string(),
                is_final: true,
            },
            RecognitionEvent::Ended,
        ]
    }

    fn erroring(kind: RecognitionErrorKind) -> Vec<RecognitionEvent> {
        vec![
            RecognitionEvent::Started,
            RecognitionEvent::Error { kind },
            RecognitionEvent::Ended,
        ]
    }
}

#[async_trait]
impl SpeechRecognizer for AttemptRecognizer {
    async fn start(&self) -> Result<RecognitionStream> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let script = {
            let mut attempts = self.attempts.lock().unwrap();
            if attempts.is_empty() {
                None
            } else {
                Some(attempts.remove(0))
            }
        };
        let (tx, rx) = mpsc::channel(16);
        match script {
            Some(events) => {
                tokio::spawn(async move {
                    for event in events {
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                });
            }
            None => {
                let (stop_tx, mut stop_rx) = mpsc::unbounded_channel();
                *self.open_stop.lock().unwrap() = Some(stop_tx);
                tokio::spawn(async move {
                    let _ = tx.send(RecognitionEvent::Started).await;
                    let _ = stop_rx.recv().await;
                    let _ = tx.send(RecognitionEvent::Ended).await;
                });
            }
        }
        Ok(rx)
    }

    fn stop(&self) {
        if let Some(tx) = self.open_stop.lock().unwrap().as_ref() {
            let _ = tx.send(());
        }
    }

    fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
        self.stop();
    }
}

struct CountingRepository {
    saves: AtomicUsize,
}

impl CountingRepository {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            saves: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SessionRepository for CountingRepository {
    async fn save(&self, _session: &InterviewSession) -> Result<String> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(format!("session-{}", self.saves.load(Ordering::SeqCst)))
    }

    async fn find_by_id(&self, _session_id: &str) -> Result<Option<InterviewSession>> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<(String, InterviewSession)>> {
        Ok(Vec::new())
    }
}

struct DenyingMedia;

#[async_trait]
impl MediaDevices for DenyingMedia {
    async fn request_access(&self) -> Result<()> {
        Err(AlexisError::permission_denied("camera/microphone denied"))
    }
}

// ---- Harness ----------------------------------------------------------------

fn config() -> InterviewConfig {
    InterviewConfig {
        interview_type: InterviewType::Behavioral,
        difficulty: Difficulty::Medium,
        persona: InterviewerPersona::Friendly,
        role: "Data Analyst".to_string(),
    }
}

struct Harness {
    question_oracle: Arc<ScriptedQuestionOracle>,
    feedback_oracle: Arc<ScriptedFeedbackOracle>,
    summary_fail: bool,
    recognizer: Arc<AttemptRecognizer>,
    synthesizer: Arc<InstantSynthesizer>,
    repository: Arc<CountingRepository>,
    media: Arc<dyn MediaDevices>,
    question_count: usize,
}

impl Harness {
    fn new(recognizer: Arc<AttemptRecognizer>) -> Self {
        Self {
            question_oracle: ScriptedQuestionOracle::new(),
            feedback_oracle: ScriptedFeedbackOracle::with_scores(Vec::new()),
            summary_fail: false,
            recognizer,
            synthesizer: InstantSynthesizer::new(),
            repository: CountingRepository::new(),
            media: Arc::new(AlwaysGranted),
            question_count: 2,
        }
    }

    fn build(
        &self,
    ) -> (
        InterviewEngine,
        super::machine::EngineHandle,
        mpsc::UnboundedReceiver<EngineEvent>,
    ) {
        let aggregator = FeedbackAggregator::new(
            self.feedback_oracle.clone(),
            Arc::new(ScriptedSummaryOracle {
                fail: self.summary_fail,
            }),
        );
        let deps = EngineDeps {
            question_oracle: self.question_oracle.clone(),
            aggregator,
            synthesizer: self.synthesizer.clone(),
            capture: AnswerCapture::new(self.recognizer.clone()),
            media: self.media.clone(),
            repository: self.repository.clone(),
        };
        InterviewEngine::new(
            config(),
            InterviewPlan {
                question_count: self.question_count,
            },
            CandidateContext::default(),
            deps,
        )
    }
}

fn drain(events: &mut mpsc::UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut collected = Vec::new();
    while let Ok(event) = events.try_recv() {
        collected.push(event);
    }
    collected
}

fn phases(events: &[EngineEvent]) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            EngineEvent::PhaseChanged { phase } => Some(*phase),
            _ => None,
        })
        .collect()
}

// ---- Tests ------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn two_answered_questions_average_to_seventy() {
    let recognizer = AttemptRecognizer::new(vec![
        AttemptRecognizer::spoken("I restructured our reporting pipeline."),
        AttemptRecognizer::spoken("I mentored two junior analysts."),
    ]);
    let mut harness = Harness::new(recognizer);
    harness.feedback_oracle = ScriptedFeedbackOracle::with_scores(vec![80, 60]);

    let (engine, _handle, mut events) = harness.build();
    let session = engine.run().await.unwrap();

    assert_eq!(session.average_score, 70);
    assert_eq!(session.transcript.len(), 2);
    assert_eq!(session.session_type, "Behavioral - Data Analyst");

    let seen = drain(&mut events);
    assert!(phases(&seen).contains(&Phase::Finished));
    assert!(seen
        .iter()
        .any(|e| matches!(e, EngineEvent::SessionStored { .. })));
}

#[tokio::test(start_paused = true)]
async fn transcript_never_exceeds_question_count() {
    let recognizer = AttemptRecognizer::new(vec![
        AttemptRecognizer::spoken("one"),
        AttemptRecognizer::spoken("two"),
        AttemptRecognizer::spoken("three"),
    ]);
    let harness = Harness::new(recognizer);

    let (engine, _handle, _events) = harness.build();
    let session = engine.run().await.unwrap();

    assert_eq!(session.transcript.len(), 2);
    assert_eq!(
        harness.question_oracle.calls.load(Ordering::SeqCst),
        2,
        "no question should be generated beyond the plan"
    );
}

#[tokio::test(start_paused = true)]
async fn no_speech_exhaustion_submits_sentinel_and_proceeds() {
    let recognizer = AttemptRecognizer::new(vec![
        AttemptRecognizer::erroring(RecognitionErrorKind::NoSpeech),
        AttemptRecognizer::erroring(RecognitionErrorKind::NoSpeech),
        AttemptRecognizer::erroring(RecognitionErrorKind::NoSpeech),
        AttemptRecognizer::spoken("an actual answer"),
    ]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 2;

    let (engine, _handle, mut events) = harness.build();
    let session = engine.run().await.unwrap();

    // Question 1 fell back to the sentinel after two re-asks; question 2
    // was answered normally without user intervention.
    assert_eq!(session.transcript.len(), 2);
    assert_eq!(session.transcript[0].answer, NO_SPEECH_ANSWER);
    assert_eq!(session.transcript[0].duration, Some(0));
    assert_eq!(session.transcript[1].answer, "an actual answer");

    let seen = phases(&drain(&mut events));
    let re_asks = seen.iter().filter(|p| **p == Phase::ReAsking).count();
    assert_eq!(re_asks, 2, "exactly two re-asks before giving up");
}

#[tokio::test(start_paused = true)]
async fn network_retries_are_bounded_at_three() {
    let recognizer = AttemptRecognizer::new(vec![
        AttemptRecognizer::erroring(RecognitionErrorKind::Network),
        AttemptRecognizer::erroring(RecognitionErrorKind::Network),
        AttemptRecognizer::erroring(RecognitionErrorKind::Network),
        AttemptRecognizer::erroring(RecognitionErrorKind::Network),
        AttemptRecognizer::spoken("unreachable"),
    ]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 1;

    let (engine, _handle, mut events) = harness.build();
    let session = engine.run().await.unwrap();

    // 1 initial attempt + 3 retries; the 4th error surfaces instead of
    // scheduling another retry, and the question oracle is never asked
    // for a second question.
    assert_eq!(harness.recognizer.starts.load(Ordering::SeqCst), 4);
    assert_eq!(session.transcript.len(), 1);

    let seen = drain(&mut events);
    let retries = seen
        .iter()
        .filter(|e| matches!(e, EngineEvent::Status { message } if message.contains("Retrying")))
        .count();
    assert_eq!(retries, 3);
    assert!(seen.iter().any(|e| matches!(
        e,
        EngineEvent::ErrorReported { message, fatal: false } if message.contains("network error")
    )));
}

#[tokio::test(start_paused = true)]
async fn scoring_failure_substitutes_fallback_and_session_finishes() {
    let recognizer = AttemptRecognizer::new(vec![AttemptRecognizer::spoken("my answer")]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 1;
    harness.feedback_oracle = ScriptedFeedbackOracle::failing();

    let (engine, _handle, _events) = harness.build();
    let session = engine.run().await.unwrap();

    let feedback = &session.transcript[0].feedback;
    assert_eq!(feedback.score, 0);
    assert!(feedback.alexis_response.contains("Sorry"));
}

#[tokio::test(start_paused = true)]
async fn question_oracle_failure_is_fatal() {
    let recognizer = AttemptRecognizer::new(vec![]);
    let mut harness = Harness::new(recognizer);
    harness.question_oracle = ScriptedQuestionOracle::failing();

    let (engine, handle, mut events) = harness.build();
    let err = engine.run().await.unwrap_err();

    assert!(err.is_oracle());
    assert_eq!(handle.phase(), Phase::Error);
    let seen = drain(&mut events);
    assert!(seen
        .iter()
        .any(|e| matches!(e, EngineEvent::ErrorReported { fatal: true, .. })));
    assert_eq!(harness.repository.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn summary_failure_is_fatal_to_the_report() {
    let recognizer = AttemptRecognizer::new(vec![AttemptRecognizer::spoken("answered")]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 1;
    harness.summary_fail = true;

    let (engine, _handle, _events) = harness.build();
    let err = engine.run().await.unwrap_err();

    assert!(err.is_oracle());
    assert_eq!(harness.repository.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn permission_denial_halts_before_any_question() {
    let recognizer = AttemptRecognizer::new(vec![]);
    let mut harness = Harness::new(recognizer);
    harness.media = Arc::new(DenyingMedia);

    let (engine, _handle, mut events) = harness.build();
    let err = engine.run().await.unwrap_err();

    assert!(err.is_permission_denied());
    assert_eq!(harness.question_oracle.calls.load(Ordering::SeqCst), 0);
    let seen = drain(&mut events);
    assert!(seen.iter().any(|e| matches!(
        e,
        EngineEvent::ErrorReported { message, fatal: true } if message.contains("enable it")
    )));
}

#[tokio::test(start_paused = true)]
async fn early_end_during_listening_summarizes_partial_transcript() {
    // First question answered, second capture never produces speech; the
    // user ends the interview mid-listening.
    let recognizer = AttemptRecognizer::new(vec![AttemptRecognizer::spoken("only answer")]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 5;
    harness.feedback_oracle = ScriptedFeedbackOracle::with_scores(vec![90]);

    let (engine, handle, _events) = harness.build();
    let task = tokio::spawn(engine.run());

    // Wait until the second question's listening phase is live.
    let mut phase_rx = handle.phase_watch();
    loop {
        if *phase_rx.borrow() == Phase::Listening
            && harness.recognizer.starts.load(Ordering::SeqCst) == 2
        {
            break;
        }
        if phase_rx.changed().await.is_err() {
            panic!("engine ended before reaching second listening phase");
        }
    }

    handle.end_interview();
    // Idempotent: a second end must not duplicate summary/persistence.
    handle.end_interview();

    let session = task.await.unwrap().unwrap();
    assert_eq!(session.transcript.len(), 1);
    assert_eq!(session.average_score, 90);
    assert_eq!(harness.repository.saves.load(Ordering::SeqCst), 1);
    assert!(
        harness.recognizer.aborted.load(Ordering::SeqCst),
        "recognition must be aborted before summary generation"
    );
}

#[tokio::test(start_paused = true)]
async fn ending_with_no_answers_yields_canned_summary() {
    let recognizer = AttemptRecognizer::new(vec![]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 5;

    let (engine, handle, _events) = harness.build();
    let task = tokio::spawn(engine.run());

    let mut phase_rx = handle.phase_watch();
    while *phase_rx.borrow() != Phase::Listening {
        if phase_rx.changed().await.is_err() {
            panic!("engine ended prematurely");
        }
    }
    handle.end_interview();

    let session = task.await.unwrap().unwrap();
    assert!(session.transcript.is_empty());
    assert_eq!(session.average_score, 0);
    assert!(session
        .summary
        .overall_summary
        .contains("did not answer any questions"));
    assert_eq!(harness.repository.saves.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn notes_are_attached_to_the_current_answer() {
    let recognizer = AttemptRecognizer::new(vec![AttemptRecognizer::spoken("noted answer")]);
    let mut harness = Harness::new(recognizer);
    harness.question_count = 1;

    let (engine, handle, _events) = harness.build();
    handle.set_notes("mention the Q3 migration");
    let session = engine.run().await.unwrap();

    assert_eq!(
        session.transcript[0].notes.as_deref(),
        Some("mention the Q3 migration")
    );
}
