//! Listing and re-exporting cached resumes.

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{TimeZone, Utc};
use colored::Colorize;

use skillsense::export;
use skillsense::recent::RecentResumes;

const PREVIEW_CHARS: usize = 60;

pub fn run(
    recent: &RecentResumes,
    limit: usize,
    export_id: Option<i64>,
    output: Option<PathBuf>,
) -> Result<()> {
    let entries = recent.load_all();

    if let Some(id) = export_id {
        let Some(entry) = entries.iter().find(|entry| entry.id == id) else {
            bail!("No cached resume with id {id}");
        };
        let target = output.unwrap_or_else(|| PathBuf::from(export::IMPROVED_RESUME_FILE));
        let written = export::write_text(&entry.text, &target)?;
        println!("Saved to {}", written.display());
        return Ok(());
    }

    if entries.is_empty() {
        println!("No saved resumes yet.");
        println!("{}", format!("cache: {}", recent.path().display()).dimmed());
        return Ok(());
    }

    for entry in entries.iter().take(limit) {
        let when = Utc
            .timestamp_millis_opt(entry.id)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown time".to_string());
        println!(
            "{:>13}  {}  {}",
            entry.id,
            when.dimmed(),
            preview(&entry.text)
        );
    }
    Ok(())
}

/// First non-empty line, shortened to a listing-friendly width.
fn preview(text: &str) -> String {
    let line = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("(empty)");
    if line.chars().count() > PREVIEW_CHARS {
        let cut: String = line.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
