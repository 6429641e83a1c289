mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillsense::api_client::ApiClient;
use skillsense::config::Config;
use skillsense::prompts::DEFAULT_GENERATION_PROMPT;
use skillsense::recent::RecentResumes;
use skillsense::session::SessionStore;

#[derive(Parser)]
#[command(name = "skillsense", version, about = "AI career assistant: chat, resume analysis, and resume generation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat interactively with the career assistant
    Chat,
    /// Analyze a resume for ATS compatibility
    Analyze {
        /// Resume file; `.pdf` uploads as-is, anything else is scored as
        /// plain text
        file: PathBuf,
        /// Write the improved resume to PATH (default: Improved_Resume.txt)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
        /// Print the full analysis result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a resume draft
    Generate {
        /// Generation prompt
        #[arg(long, default_value = DEFAULT_GENERATION_PROMPT)]
        prompt: String,
        /// Write the generated resume to PATH (default: SkillSense_Resume.txt)
        #[arg(long, value_name = "PATH", num_args = 0..=1)]
        export: Option<Option<PathBuf>>,
    },
    /// List or re-export recently saved resumes
    Recent {
        /// Show at most this many entries
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Re-export the cached entry with this id instead of listing
        #[arg(long, value_name = "ID")]
        export: Option<i64>,
        /// Output path for --export
        #[arg(long, value_name = "PATH", requires = "export")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let client = ApiClient::new(&config.api_base_url, config.request_timeout);
    let store = SessionStore::new(Arc::new(client));
    let recent = RecentResumes::new(
        config
            .recent_file
            .clone()
            .unwrap_or_else(RecentResumes::default_path),
    );
    info!(
        backend = %config.api_base_url,
        session = %store.id(),
        "skillsense v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match cli.command {
        Commands::Chat => commands::chat::run(&store).await,
        Commands::Analyze { file, export, json } => {
            commands::analyze::run(&store, &recent, &file, export, json).await
        }
        Commands::Generate { prompt, export } => {
            commands::generate::run(&store, &recent, &prompt, export).await
        }
        Commands::Recent {
            limit,
            export,
            output,
        } => commands::recent::run(&recent, limit, export, output),
    }
}
