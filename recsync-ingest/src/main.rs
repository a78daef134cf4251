//! recsync-ingest - Recording reconciliation tool
//!
//! Fetches the session schedule from the board, matches recordings in the
//! watch directory to sessions by capture time, moves matched files into the
//! recordings area and publishes them to the video host.
//!
//! Runs one pass and exits, or repeats every `--poll-interval` seconds.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use recsync_common::config::load_config;
use recsync_ingest::clients::{KalturaClient, MondayClient, SmtpNotifier};
use recsync_ingest::config::{CliOverrides, IngestConfig};
use recsync_ingest::services::LocalRecordingStore;
use recsync_ingest::{logging, IngestOrchestrator, Publication, RunMode};

/// Command-line arguments for recsync-ingest
#[derive(Parser, Debug)]
#[command(name = "recsync-ingest")]
#[command(about = "Match capture recordings to scheduled sessions and publish them")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "RECSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Root folder holding the watch, processing and recordings directories
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Board to read sessions from
    #[arg(long)]
    board_id: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Match and report only; no moves, uploads or emails
    #[arg(long)]
    dry_run: bool,

    /// Repeat the pass every N seconds until interrupted
    #[arg(long, value_name = "SECS")]
    poll_interval: Option<u64>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_folder: self.root_folder.clone(),
            board_id: self.board_id,
            log_level: self.log_level.clone(),
            dry_run: self.dry_run,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = logging::init_tracing(&logging::startup_log_level(args.log_level.as_deref()));

    let toml_config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let config = IngestConfig::resolve(&args.overrides(), &toml_config)
        .context("Invalid configuration")?;

    logging::apply_log_level(&filter, &config.log_level);

    info!(
        "Starting recsync-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Watch directory: {}", config.layout.watch.display());
    info!("Processing directory: {}", config.layout.processing.display());
    info!("Recordings directory: {}", config.layout.recordings.display());

    config
        .layout
        .ensure_exists()
        .context("Failed to create working directories")?;

    let board = Arc::new(MondayClient::new(config.board.clone()).context("Board client setup failed")?);
    let store = Arc::new(LocalRecordingStore::new(
        &config.layout,
        config.matching.extension.clone(),
    ));

    let mode = if config.dry_run {
        info!("Dry run: files will not be moved or published");
        RunMode::DryRun
    } else {
        let publisher_config = config
            .publisher
            .clone()
            .context("Publisher settings are required for a live run")?;
        let default_owner = publisher_config.default_owner.clone();
        let publisher = KalturaClient::new(publisher_config).context("Publisher client setup failed")?;
        RunMode::Live(Publication {
            publisher: Arc::new(publisher),
            notifier: Arc::new(SmtpNotifier::new(config.smtp.clone())),
            default_owner,
        })
    };

    let orchestrator = IngestOrchestrator::new(config.pass_settings(), board, store, mode)
        .context("Invalid filename prefix")?;

    let Some(interval_secs) = args.poll_interval else {
        orchestrator.run_pass().await.context("Ingest pass aborted")?;
        return Ok(());
    };

    info!("Polling every {}s (Ctrl-C to stop)", interval_secs);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    orchestrator
        .run_until(Duration::from_secs(interval_secs.max(1)), shutdown)
        .await;

    Ok(())
}
