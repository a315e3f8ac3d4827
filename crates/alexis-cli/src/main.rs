use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "alexis")]
#[command(about = "Alexis - AI mock-interview practice in your terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a mock interview session
    Practice {
        /// Target job title, e.g. "Software Engineer"
        #[arg(long, default_value = "Software Engineer")]
        role: String,

        /// Interview type: Behavioral, Technical, or Role-Specific
        #[arg(long = "type", default_value = "Behavioral")]
        interview_type: String,

        /// Question difficulty: Easy, Medium, or Hard
        #[arg(long, default_value = "Medium")]
        difficulty: String,

        /// Interviewer persona: Neutral, Friendly, or Strict
        #[arg(long, default_value = "Friendly")]
        persona: String,

        /// Number of questions to ask
        #[arg(long, default_value_t = alexis_core::interview::DEFAULT_QUESTION_COUNT)]
        questions: usize,

        /// One-paragraph resume summary used to tailor questions
        #[arg(long, default_value = "")]
        resume: String,

        /// Comma-separated key skills from the resume
        #[arg(long, default_value = "")]
        skills: String,
    },
    /// Browse stored interview sessions
    Sessions {
        #[command(subcommand)]
        action: SessionsAction,
    },
}

#[derive(Subcommand)]
enum SessionsAction {
    /// List all stored sessions, newest first
    List,
    /// Show the full report for one session
    Show {
        /// The session identifier (see `sessions list`)
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Practice {
            role,
            interview_type,
            difficulty,
            persona,
            questions,
            resume,
            skills,
        } => {
            commands::practice::run(commands::practice::PracticeArgs {
                role,
                interview_type,
                difficulty,
                persona,
                questions,
                resume,
                skills,
            })
            .await?
        }
        Commands::Sessions { action } => match action {
            SessionsAction::List => commands::sessions::list().await?,
            SessionsAction::Show { id } => commands::sessions::show(&id).await?,
        },
    }

    Ok(())
}
