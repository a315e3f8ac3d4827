//! The `practice` command: a full interview session in the terminal.

use crate::console::{ConsoleRecognizer, ConsoleSynthesizer};
use alexis_core::engine::{EngineDeps, EngineEvent, InterviewEngine};
use alexis_core::interview::{
    Difficulty, FeedbackAggregator, InterviewConfig, InterviewPlan, InterviewType,
    InterviewerPersona,
};
use alexis_core::media::AlwaysGranted;
use alexis_core::oracle::CandidateContext;
use alexis_core::speech::AnswerCapture;
use alexis_infrastructure::{resolve_gemini_config, JsonDirSessionRepository};
use alexis_interaction::GeminiClient;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::sync::Arc;

pub struct PracticeArgs {
    pub role: String,
    pub interview_type: String,
    pub difficulty: String,
    pub persona: String,
    pub questions: usize,
    pub resume: String,
    pub skills: String,
}

pub async fn run(args: PracticeArgs) -> Result<()> {
    let config = InterviewConfig {
        interview_type: args
            .interview_type
            .parse::<InterviewType>()
            .map_err(|_| anyhow!("unknown interview type: {}", args.interview_type))?,
        difficulty: args
            .difficulty
            .parse::<Difficulty>()
            .map_err(|_| anyhow!("unknown difficulty: {}", args.difficulty))?,
        persona: args
            .persona
            .parse::<InterviewerPersona>()
            .map_err(|_| anyhow!("unknown persona: {}", args.persona))?,
        role: args.role,
    };
    let plan = InterviewPlan {
        question_count: args.questions.max(1),
    };
    let candidate = CandidateContext {
        summary: args.resume,
        skills: args
            .skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };

    let gemini = resolve_gemini_config().context("could not resolve Gemini credentials")?;
    let mut client = GeminiClient::new(gemini.api_key);
    if let Some(model) = gemini.model_name {
        client = client.with_model(model);
    }
    let client = Arc::new(client);

    let deps = EngineDeps {
        question_oracle: client.clone(),
        aggregator: FeedbackAggregator::new(client.clone(), client.clone()),
        synthesizer: Arc::new(ConsoleSynthesizer),
        capture: AnswerCapture::new(Arc::new(ConsoleRecognizer::new())),
        media: Arc::new(AlwaysGranted),
        repository: Arc::new(JsonDirSessionRepository::new()?),
    };

    let (engine, handle, mut events) = InterviewEngine::new(config, plan, candidate, deps);

    // Ctrl-C ends the interview early; the summary covers whatever was
    // answered so far.
    let interrupt_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{}", "Ending the interview early...".yellow());
            interrupt_handle.end_interview();
        }
    });

    println!(
        "{}",
        format!(
            "Starting a {} question mock interview. Press Ctrl-C to finish early.",
            args.questions.max(1)
        )
        .bold()
    );

    let runner = tokio::spawn(engine.run());

    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::QuestionReady { number, total, .. } => {
                println!();
                println!("{}", format!("--- Question {number} of {total} ---").bold());
            }
            EngineEvent::AnswerRecorded {
                score, response, ..
            } => {
                println!("{} {}", "Alexis:".cyan().bold(), response);
                println!("{} {}", "Score:".bold(), format!("{score}/100").magenta());
            }
            EngineEvent::Status { message } => {
                println!("{}", message.yellow());
            }
            EngineEvent::ErrorReported { message, fatal } => {
                if fatal {
                    eprintln!("{} {}", "Error:".red().bold(), message);
                } else {
                    println!("{}", message.yellow());
                }
            }
            EngineEvent::SessionStored { session_id } => {
                println!(
                    "{}",
                    format!("Session saved as {session_id} (see `alexis sessions show`).").dimmed()
                );
            }
            EngineEvent::PhaseChanged { .. } | EngineEvent::Finished => {}
        }
    }

    let session = runner
        .await
        .context("session task panicked")?
        .map_err(|e| anyhow!(e.user_message()))?;

    println!();
    println!("{}", "=== Interview Report ===".bold());
    println!(
        "{} {}  {} {} min  {} {}/100",
        "Session:".bold(),
        session.session_type,
        "Answer time:".bold(),
        session.duration,
        "Average score:".bold(),
        session.average_score
    );
    println!();
    println!("{}", session.summary.overall_summary);
    if !session.summary.actionable_tips.is_empty() {
        println!();
        println!("{}", "Tips:".bold());
        for tip in &session.summary.actionable_tips {
            println!("  - {tip}");
        }
    }
    if !session.summary.badges_earned.is_empty() {
        println!();
        let badges: Vec<String> = session
            .summary
            .badges_earned
            .iter()
            .map(|b| b.to_string())
            .collect();
        println!("{} {}", "Badges:".bold(), badges.join(", ").green());
    }
    println!();
    println!("{}", session.summary.encouragement.cyan());

    Ok(())
}
