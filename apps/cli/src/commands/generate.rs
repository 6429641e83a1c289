//! Resume generation.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use skillsense::export;
use skillsense::recent::RecentResumes;
use skillsense::session::SessionStore;

pub async fn run(
    store: &SessionStore,
    recent: &RecentResumes,
    prompt: &str,
    export_to: Option<Option<PathBuf>>,
) -> Result<()> {
    store.generate_resume(prompt).await;

    if let Some(message) = store.generation_error() {
        eprintln!("{}", message.red());
        return Ok(());
    }

    let document = store.document();
    println!("{}", document.content);
    recent.save(&document.content);

    if let Some(target) = super::export_target(export_to, export::GENERATED_RESUME_FILE) {
        let written = export::write_text(&document.content, &target)?;
        println!("\n{} {}", "Saved to".dimmed(), written.display());
    }
    Ok(())
}
