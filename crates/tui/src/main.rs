mod renderer;
mod scene;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use utopia_core::PageConfig;

/// Terminal preview of the scroll-driven profile page.
#[derive(Debug, Parser)]
#[command(name = "utopia", version)]
struct Args {
    /// Page configuration (JSON). Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken over by the preview).
    #[arg(long)]
    log: Option<PathBuf>,

    /// CSS pixels represented by one terminal column.
    #[arg(long, default_value_t = 8.0)]
    px_per_col: f64,

    /// CSS pixels represented by one terminal row.
    #[arg(long, default_value_t = 16.0)]
    px_per_row: f64,

    /// Simulate a failing network: the QR code never loads.
    #[arg(long)]
    offline: bool,
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            PageConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PageConfig::default(),
    };

    anyhow::ensure!(
        args.px_per_col > 0.0 && args.px_per_row > 0.0,
        "--px-per-col and --px-per-row must be positive"
    );

    renderer::run_tui(
        config,
        renderer::Options {
            px_per_col: args.px_per_col,
            px_per_row: args.px_per_row,
            offline: args.offline,
        },
    )
}
