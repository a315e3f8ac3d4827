//! The `sessions` command: browse stored interview history.

use alexis_core::interview::SessionRepository;
use alexis_infrastructure::JsonDirSessionRepository;
use anyhow::{anyhow, Result};
use colored::Colorize;

pub async fn list() -> Result<()> {
    let repo = JsonDirSessionRepository::new()?;
    let sessions = repo.list_all().await?;

    if sessions.is_empty() {
        println!("No stored sessions yet. Run `alexis practice` to start one.");
        return Ok(());
    }

    for (id, session) in sessions {
        println!(
            "{}  {}  {}  {} min  {}/100",
            id.dimmed(),
            session.date,
            session.session_type.bold(),
            session.duration,
            session.average_score
        );
    }
    Ok(())
}

pub async fn show(id: &str) -> Result<()> {
    let repo = JsonDirSessionRepository::new()?;
    let session = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| anyhow!("no session with id {id}"))?;

    println!(
        "{}  {}  {} min  average {}/100",
        session.session_type.bold(),
        session.date,
        session.duration,
        session.average_score
    );
    println!();

    for (index, entry) in session.transcript.iter().enumerate() {
        println!(
            "{} {}",
            format!("Q{}:", index + 1).bold(),
            entry.question
        );
        println!("{} {}", "A:".bold(), entry.answer);
        println!(
            "   score {}/100, quality {}/100, {} filler words",
            entry.feedback.score, entry.feedback.response_quality, entry.feedback.filler_words
        );
        if let Some(notes) = &entry.notes {
            println!("   {} {}", "notes:".dimmed(), notes);
        }
        println!();
    }

    println!("{}", "Summary".bold());
    println!("{}", session.summary.overall_summary);
    if !session.summary.actionable_tips.is_empty() {
        println!();
        for tip in &session.summary.actionable_tips {
            println!("  - {tip}");
        }
    }
    if !session.summary.badges_earned.is_empty() {
        let badges: Vec<String> = session
            .summary
            .badges_earned
            .iter()
            .map(|b| b.to_string())
            .collect();
        println!();
        println!("{} {}", "Badges:".bold(), badges.join(", ").green());
    }

    Ok(())
}
