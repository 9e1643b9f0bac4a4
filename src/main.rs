//! Gapline - command-line front end
//!
//! Opens a file, applies scripted edit commands from `--script` or stdin,
//! and writes the document back when input ends.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gapline::commands;
use gapline_core::{AppConfig, APP_NAME, VERSION};
use gapline_editor::EditorState;

#[derive(Parser, Debug)]
#[command(name = "gapline")]
#[command(about = "Gap buffer text editing engine")]
#[command(version)]
struct Cli {
    /// File to edit (created on save if missing)
    file: PathBuf,

    /// Display width, which is also the line capacity
    #[arg(long)]
    width: Option<usize>,

    /// Number of visible lines
    #[arg(long)]
    height: Option<usize>,

    /// Configuration file (defaults to the per-user config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read script steps from a file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Do not write the document back when input ends
    #[arg(long)]
    no_save: bool,
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // An explicit config file must load; the per-user one falls back to defaults
    let (config, config_error) = match &cli.config {
        Some(path) => (
            AppConfig::load_from(path)
                .await
                .with_context(|| format!("failed to load config {:?}", path))?,
            None,
        ),
        None => match AppConfig::load().await {
            Ok(config) => (config, None),
            Err(e) => (AppConfig::default(), Some(e)),
        },
    };
    let config = config.with_display(cli.width, cli.height);

    init_logging(&config.logging.level)?;
    info!("{} v{} starting...", APP_NAME, VERSION);
    if let Some(e) = config_error {
        warn!("Using default configuration: {}", e.user_message());
    }

    let capacity = config.display.line_capacity()?;
    let mut state = EditorState::open(cli.file.clone(), capacity, config.display.visible_lines()).await?;

    let script = match &cli.script {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read script {:?}", path))?,
        None => {
            let mut script = String::new();
            tokio::io::stdin().read_to_string(&mut script).await?;
            script
        }
    };
    let steps = commands::parse_script(&script)?;
    info!("Running {} script steps", steps.len());

    let mut stdout = std::io::stdout().lock();
    commands::run_script(&mut state, &steps, &mut stdout).await?;

    if cli.no_save {
        info!("Leaving {:?} untouched", cli.file);
        Ok(())
    } else {
        commands::finish(&mut state).await
    }
}

/// Log to stderr so `show` output on stdout stays clean
fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level `{}`", level))?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
