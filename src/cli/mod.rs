//! Command-line interface for yt-manager.
//!
//! Provides commands for initialising a library, downloading channels,
//! playlists and single tracks, and re-pulling previously downloaded folders.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{Extractor, YtDlpAdapter};
use crate::config::{self, ResolvedConfig};
use crate::core::Orchestrator;
use crate::domain::{BatchReport, Source, TrackState};
use crate::library::{find_library_root, init_library};

/// yt-manager - Organize YouTube channels and playlists into a music library
#[derive(Parser, Debug)]
#[command(name = "yt-manager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a folder for yt-manager
    Init {
        /// Path to folder managed by yt-manager (default: current directory)
        path: Option<PathBuf>,
    },

    /// Pull a channel or playlist folder again
    Pull {
        /// Path to channel or playlist folder (default: current directory)
        path: Option<PathBuf>,
    },

    /// Download a channel, playlist or single track
    Download {
        /// URL (or id) of a channel, playlist or single track
        url: String,

        /// Treat the URL as a single video
        #[arg(long)]
        track: bool,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Init { path } => init(path).await,
            Commands::Pull { path } => pull(path).await,
            Commands::Download { url, track } => download(&url, track).await,
            Commands::Config => show_config().await,
        }
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to determine current directory")
}

/// Discover the library root above the current directory and load its config
fn load_library() -> Result<ResolvedConfig> {
    let root = find_library_root(&current_dir()?)?;
    Ok(config::load(&root)?)
}

async fn init(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => current_dir()?,
    };
    let marker = init_library(&path).await?;
    eprintln!("Initialized library at {}", marker.display());
    Ok(())
}

async fn pull(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => current_dir()?,
    };
    let config = load_library()?;
    let orchestrator = Orchestrator::from_config(&config);

    let report = orchestrator.pull(&path).await?;
    print_report(&report);
    Ok(())
}

async fn download(url: &str, single: bool) -> Result<()> {
    let config = load_library()?;
    let orchestrator = Orchestrator::from_config(&config);

    if single {
        let outcome = orchestrator.download_single(url).await?;
        let mut report = BatchReport::default();
        report.record(outcome);
        print_report(&report);
        return Ok(());
    }

    let source = Source::classify(url);
    eprintln!("Downloading {}", source);
    let report = orchestrator.download_source(&source).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BatchReport) {
    for outcome in &report.outcomes {
        let marker = match outcome.state {
            TrackState::Materialized => "+",
            TrackState::Skipped => "=",
        };
        println!("{} {}", marker, outcome.link.display());
    }
    eprintln!(
        "\n{} track(s): {} downloaded, {} already present",
        report.total(),
        report.downloaded(),
        report.skipped()
    );
}

/// Show the resolved configuration (for debugging)
async fn show_config() -> Result<()> {
    let config = load_library()?;

    println!("Library root: {}", config.root.display());
    println!(
        "Config file:  {}",
        config
            .config_file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Filters:");
    println!(
        "  Restricted keywords: {}",
        config.filters.restricted_keywords.join(", ")
    );
    println!(
        "  Duration:            [{}, {}) seconds",
        config.filters.min_duration, config.filters.max_duration
    );
    println!();
    println!("Backends:");

    let ytdlp = YtDlpAdapter::with_binary_path(config.ytdlp_binary.clone());
    let status = match ytdlp.health_check().await {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("unavailable ({})", e),
    };
    println!("  yt-dlp:  {} [{}]", config.ytdlp_binary, status);
    println!(
        "  ytmusic: {}",
        if config.ytmusic_enabled { "enabled" } else { "disabled" }
    );

    Ok(())
}
