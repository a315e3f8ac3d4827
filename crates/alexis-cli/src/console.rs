//! Terminal-backed speech engines.
//!
//! The terminal has no audio, so "speech" is text: the synthesizer
//! prints the interviewer's lines, and the recognizer reads one typed
//! answer per capture attempt. Both honor the same contracts the audio
//! engines do, so the session engine cannot tell the difference.

use alexis_core::error::{AlexisError, Result};
use alexis_core::speech::{
    RecognitionErrorKind, RecognitionEvent, RecognitionStream, SpeechRecognizer, SpeechSynthesizer,
};
use async_trait::async_trait;
use colored::Colorize;
use std::sync::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Prints the interviewer's speech to the terminal.
pub struct ConsoleSynthesizer;

#[async_trait]
impl SpeechSynthesizer for ConsoleSynthesizer {
    async fn speak(&self, text: &str) -> Result<()> {
        println!();
        println!("{} {}", "Alexis:".cyan().bold(), text);
        Ok(())
    }

    fn cancel(&self) {
        // Printing is instantaneous; there is never an utterance in flight.
    }
}

/// Reads one typed line per capture attempt.
///
/// An empty line is reported as a no-speech failure so the engine's
/// re-ask protocol applies in the terminal too. `abort` cancels the
/// pending read and emits the `Aborted` error the engine ignores.
pub struct ConsoleRecognizer {
    cancel: Mutex<Option<CancellationToken>>,
}

impl ConsoleRecognizer {
    pub fn new() -> Self {
        Self {
            cancel: Mutex::new(None),
        }
    }
}

impl Default for ConsoleRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for ConsoleRecognizer {
    async fn start(&self) -> Result<RecognitionStream> {
        let (tx, rx) = mpsc::channel(16);
        let cancel = CancellationToken::new();
        if let Ok(mut slot) = self.cancel.lock() {
            *slot = Some(cancel.clone());
        } else {
            return Err(AlexisError::speech("recognizer state poisoned"));
        }

        tokio::spawn(async move {
            let _ = tx.send(RecognitionEvent::Started).await;
            print!("{} ", "You:".green().bold());
            use std::io::Write;
            let _ = std::io::stdout().flush();

            let mut line = String::new();
            let mut reader = BufReader::new(tokio::io::stdin());
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = tx
                        .send(RecognitionEvent::Error {
                            kind: RecognitionErrorKind::Aborted,
                        })
                        .await;
                }
                read = reader.read_line(&mut line) => {
                    let answer = line.trim().to_string();
                    match read {
                        Ok(_) if answer.is_empty() => {
                            let _ = tx
                                .send(RecognitionEvent::Error {
                                    kind: RecognitionErrorKind::NoSpeech,
                                })
                                .await;
                        }
                        Ok(_) => {
                            let _ = tx
                                .send(RecognitionEvent::Result {
                                    transcript: answer,
                                    is_final: true,
                                })
                                .await;
                        }
                        Err(_) => {
                            let _ = tx
                                .send(RecognitionEvent::Error {
                                    kind: RecognitionErrorKind::Other("stdin read failed".into()),
                                })
                                .await;
                        }
                    }
                }
            }
            let _ = tx.send(RecognitionEvent::Ended).await;
        });

        Ok(rx)
    }

    fn stop(&self) {
        // A typed answer is already final; stop and abort both just end
        // the pending read.
        self.abort();
    }

    fn abort(&self) {
        if let Ok(slot) = self.cancel.lock() {
            if let Some(cancel) = slot.as_ref() {
                cancel.cancel();
            }
        }
    }
}
