//! Resume analysis: upload a PDF (or score plain text) and render the
//! report.

use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use skillsense::errors::AppError;
use skillsense::export;
use skillsense::normalize::AnalysisResult;
use skillsense::recent::RecentResumes;
use skillsense::session::{AnalysisState, SessionStore};

/// Detail sections rendered beneath the summary, in display order.
const DETAIL_SECTIONS: [(&str, &str); 3] = [
    ("strengths", "Strengths"),
    ("improvements", "Areas to improve"),
    ("suggestions", "Suggestions"),
];

/// Scores at or above this read as ATS-ready.
const GOOD_SCORE: u8 = 80;

pub async fn run(
    store: &SessionStore,
    recent: &RecentResumes,
    file: &Path,
    export_to: Option<Option<PathBuf>>,
    json: bool,
) -> Result<()> {
    let is_pdf = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    let submitted = if is_pdf {
        store.analyze_resume_file(file).await
    } else {
        // Plain text becomes the session's resume document, then goes
        // through the chat-based scoring path.
        match std::fs::read_to_string(file) {
            Ok(text) => {
                store.update_resume(text.as_str());
                store.analyze_resume_text(&text).await
            }
            Err(error) => Err(AppError::Validation(format!(
                "Could not read {}: {error}",
                file.display()
            ))),
        }
    };
    if let Err(error) = submitted {
        eprintln!("{}", error.to_string().red());
        return Ok(());
    }

    match store.analysis() {
        AnalysisState::Ready(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render_report(&result);
            }
            if let Some(improved) = result.improved_resume.as_deref() {
                recent.save(improved);
                if let Some(target) = super::export_target(export_to, export::IMPROVED_RESUME_FILE)
                {
                    let written = export::write_text(improved, &target)?;
                    println!("\nImproved resume written to {}", written.display());
                }
            }
        }
        AnalysisState::Failed(message) => eprintln!("{}", message.red()),
        AnalysisState::Idle | AnalysisState::Pending => {}
    }
    Ok(())
}

/// Renders the analysis: score first, color keyed to the 80 threshold, then
/// summary and detail sections.
fn render_report(result: &AnalysisResult) {
    let score_line = format!("ATS Compatibility Score: {}%", result.score);
    if result.score >= GOOD_SCORE {
        println!("{}", score_line.green().bold());
        println!(
            "{}",
            "Excellent! Your resume is already optimized for ATS systems.".green()
        );
    } else {
        println!("{}", score_line.yellow().bold());
        println!(
            "{}",
            "Your resume could perform better in ATS scans.".yellow()
        );
    }

    if let Some(summary) = result.details.get("summary") {
        println!("\n{}\n{summary}", "Summary".bold());
    } else if !result.reply.is_empty() {
        println!("\n{}", result.reply);
    }
    for (key, title) in DETAIL_SECTIONS {
        if let Some(body) = result.details.get(key) {
            println!("\n{}\n{body}", title.bold());
        }
    }
    if result.improved_resume.is_some() {
        println!(
            "\n{}",
            "An improved version of your resume was generated alongside this report.".cyan()
        );
    }
}
