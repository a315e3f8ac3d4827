//! Speech Input Controller.
//!
//! Wraps a [`SpeechRecognizer`] engine and owns the answer-capture
//! protocol: transcript accumulation, the 1 Hz elapsed-time tick, and the
//! silence timeout that bounds how long we wait after the candidate
//! appears to have finished speaking. Retry policy lives one level up in
//! the session engine; this controller reports a single outcome per
//! capture attempt.

use crate::error::Result;
use crate::speech::recognition::{RecognitionErrorKind, RecognitionEvent, SpeechRecognizer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval, sleep_until, Instant};
use tracing::debug;

/// Bounded wait after the last final result before auto-stopping capture.
pub const SILENCE_TIMEOUT: Duration = Duration::from_secs(5);

/// The result of one capture attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Capture stopped cleanly; the transcript (possibly empty) and the
    /// elapsed answer duration in seconds.
    Completed { transcript: String, duration: u64 },
    /// The engine reported a non-recoverable event for this attempt.
    /// `partial` holds whatever transcript had accumulated.
    Failed {
        kind: RecognitionErrorKind,
        partial: String,
        duration: u64,
    },
}

/// Aborts the recognizer if a capture future is dropped mid-flight, so a
/// cancelled phase never leaves a live recognition session behind.
struct AbortGuard {
    recognizer: Arc<dyn SpeechRecognizer>,
    armed: bool,
}

impl Drop for AbortGuard {
    fn drop(&mut self) {
        if self.armed {
            self.recognizer.abort();
        }
    }
}

/// One reusable answer-capture controller per session.
pub struct AnswerCapture {
    recognizer: Arc<dyn SpeechRecognizer>,
    elapsed_tx: watch::Sender<u64>,
    transcript_tx: watch::Sender<String>,
}

impl AnswerCapture {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        let (elapsed_tx, _) = watch::channel(0);
        let (transcript_tx, _) = watch::channel(String::new());
        Self {
            recognizer,
            elapsed_tx,
            transcript_tx,
        }
    }

    /// Subscribe to the 1 Hz elapsed-seconds tick for UI display.
    pub fn subscribe_elapsed(&self) -> watch::Receiver<u64> {
        self.elapsed_tx.subscribe()
    }

    /// Subscribe to the live interim transcript for UI display.
    pub fn subscribe_transcript(&self) -> watch::Receiver<String> {
        self.transcript_tx.subscribe()
    }

    /// Aborts any live recognition session.
    pub fn abort(&self) {
        self.recognizer.abort();
    }

    /// Runs one capture attempt to completion.
    ///
    /// The accumulated transcript resets when the engine signals
    /// `Started`. A final result chunk arms the silence timeout; any
    /// further result re-arms it. `aborted` errors are swallowed as
    /// normal phase-transition noise. A duplicate end signal cannot
    /// double-report: the method returns exactly one outcome.
    pub async fn capture(&self) -> Result<CaptureOutcome> {
        let mut stream = self.recognizer.start().await?;

        let mut guard = AbortGuard {
            recognizer: Arc::clone(&self.recognizer),
            armed: true,
        };

        let mut transcript = String::new();
        let mut elapsed: u64 = 0;
        let mut failure: Option<RecognitionErrorKind> = None;

        self.elapsed_tx.send_replace(0);
        let mut tick = interval(Duration::from_secs(1));
        tick.tick().await; // first tick completes immediately

        // The silence deadline is armed only after a final result chunk.
        let mut silence_deadline: Option<Instant> = None;
        let far_future = || Instant::now() + Duration::from_secs(86_400);

        let outcome = loop {
            let deadline = silence_deadline.unwrap_or_else(far_future);
            tokio::select! {
                event = stream.recv() => match event {
                    Some(RecognitionEvent::Started) => {
                        transcript.clear();
                        elapsed = 0;
                        self.elapsed_tx.send_replace(0);
                        self.transcript_tx.send_replace(String::new());
                        tick.reset();
                    }
                    Some(RecognitionEvent::Result { transcript: text, is_final }) => {
                        transcript = text;
                        self.transcript_tx.send_replace(transcript.clone());
                        // A final chunk arms the auto-stop; any further
                        // result postpones it.
                        if is_final || silence_deadline.is_some() {
                            silence_deadline = Some(Instant::now() + SILENCE_TIMEOUT);
                        }
                    }
                    Some(RecognitionEvent::Error { kind }) => {
                        match kind {
                            RecognitionErrorKind::Aborted => {
                                debug!("recognition aborted, normal phase transition");
                            }
                            other => failure = Some(other),
                        }
                    }
                    Some(RecognitionEvent::Ended) | None => {
                        break match failure.take() {
                            Some(kind) => CaptureOutcome::Failed {
                                kind,
                                partial: transcript.clone(),
                                duration: elapsed,
                            },
                            None => CaptureOutcome::Completed {
                                transcript: transcript.clone(),
                                duration: elapsed,
                            },
                        };
                    }
                },
                _ = tick.tick() => {
                    elapsed += 1;
                    self.elapsed_tx.send_replace(elapsed);
                }
                _ = sleep_until(deadline), if silence_deadline.is_some() => {
                    debug!(elapsed, "silence timeout reached, stopping capture");
                    silence_deadline = None;
                    self.recognizer.stop();
                }
            }
        };

        guard.armed = false;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::speech::recognition::RecognitionStream;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    /// Scripted recognizer: forwards a pre-built event sequence and
    /// reacts to `stop` by emitting `Ended`.
    struct ScriptedRecognizer {
        events: Mutex<Vec<(Duration, RecognitionEvent)>>,
        stop_tx: Mutex<Option<mpsc::UnboundedSender<()>>>,
        aborted: Mutex<bool>,
    }

    impl ScriptedRecognizer {
        fn new(events: Vec<(Duration, RecognitionEvent)>) -> Self {
            Self {
                events: Mutex::new(events),
                stop_tx: Mutex::new(None),
                aborted: Mutex::new(false),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        async fn start(&self) -> Result<RecognitionStream> {
            let (tx, rx) = mpsc::channel(16);
            let (stop_tx, mut stop_rx) = mpsc::unbounded_channel();
            *self.stop_tx.lock().unwrap() = Some(stop_tx);
            let events = std::mem::take(&mut *self.events.lock().unwrap());
            tokio::spawn(async move {
                for (delay, event) in events {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                        _ = stop_rx.recv() => {
                            let _ = tx.send(RecognitionEvent::Ended).await;
                            return;
                        }
                    }
                }
                // Keep the stream open until stopped.
                let _ = stop_rx.recv().await;
                let _ = tx.send(RecognitionEvent::Ended).await;
            });
            Ok(rx)
        }

        fn stop(&self) {
            if let Some(tx) = self.stop_tx.lock().unwrap().as_ref() {
                let _ = tx.send(());
            }
        }

        fn abort(&self) {
            *self.aborted.lock().unwrap() = true;
            self.stop();
        }
    }

    fn started() -> (Duration, RecognitionEvent) {
        (Duration::ZERO, RecognitionEvent::Started)
    }

    fn result(secs: u64, text: &str, is_final: bool) -> (Duration, RecognitionEvent) {
        (
            Duration::from_secs(secs),
            RecognitionEvent::Result {
                transcript: text.to_string(),
                is_final,
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn silence_timeout_stops_capture_after_final_result() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![
            started(),
            result(2, "I led a project", true),
        ]));
        let capture = AnswerCapture::new(recognizer);

        let outcome = capture.capture().await.unwrap();
        match outcome {
            CaptureOutcome::Completed {
                transcript,
                duration,
            } => {
                assert_eq!(transcript, "I led a project");
                // 2s of speech + 5s silence window.
                assert_eq!(duration, 7);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn interim_results_accumulate_without_arming_timeout() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![
            started(),
            result(1, "I", false),
            result(1, "I led", false),
            result(1, "I led a team", true),
        ]));
        let capture = AnswerCapture::new(recognizer);

        let outcome = capture.capture().await.unwrap();
        match outcome {
            CaptureOutcome::Completed { transcript, .. } => {
                assert_eq!(transcript, "I led a team");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn no_speech_error_is_reported_with_zero_duration() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![
            started(),
            (
                Duration::ZERO,
                RecognitionEvent::Error {
                    kind: RecognitionErrorKind::NoSpeech,
                },
            ),
            (Duration::ZERO, RecognitionEvent::Ended),
        ]));
        let capture = AnswerCapture::new(recognizer);

        let outcome = capture.capture().await.unwrap();
        assert_eq!(
            outcome,
            CaptureOutcome::Failed {
                kind: RecognitionErrorKind::NoSpeech,
                partial: String::new(),
                duration: 0,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_error_is_swallowed_and_clean_stop_reported() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![
            started(),
            result(1, "partial answer", true),
            (
                Duration::ZERO,
                RecognitionEvent::Error {
                    kind: RecognitionErrorKind::Aborted,
                },
            ),
            (Duration::ZERO, RecognitionEvent::Ended),
        ]));
        let capture = AnswerCapture::new(recognizer);

        let outcome = capture.capture().await.unwrap();
        match outcome {
            CaptureOutcome::Completed { transcript, .. } => {
                assert_eq!(transcript, "partial answer");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_tick_is_published_every_second() {
        let recognizer = Arc::new(ScriptedRecognizer::new(vec![
            started(),
            result(3, "spoken", true),
        ]));
        let capture = AnswerCapture::new(recognizer);
        let elapsed = capture.subscribe_elapsed();

        capture.capture().await.unwrap();
        assert!(*elapsed.borrow() >= 3);
    }
}
