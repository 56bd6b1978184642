//! edgeshare server entry point.
//!
//! Loads the layout, builds the primary adapter and the orchestrator, and runs
//! the control loop until Ctrl-C.
//!
//! # Usage
//!
//! ```text
//! edgeshare-server [OPTIONS]
//!
//! Options:
//!   --config    <PATH>   Config file [default: platform config dir]
//!   --name      <NAME>   Overrides `[server] name`
//!   --log-level <LEVEL>  Overrides `[server] log_level` when RUST_LOG is unset
//!   --init-config        Writes a default config file and exits
//! ```
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load + validate config       -- fatal on any layout inconsistency
//!  └─ HeadlessScreen -> PrimaryClientAdapter
//!  └─ ScreenOrchestrator::new()
//!  └─ control_loop::run()          (Tokio task, owns the orchestrator)
//!       ▲
//!       └─ ctrl-c -> ServerEvent::Shutdown
//! ```
//!
//! The headless screen stands in for an OS input backend; secondaries connect
//! through [`ChannelTransport`](edgeshare_server::infrastructure::transport::channel::ChannelTransport)
//! once a network listener hands their reports to the loop.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use edgeshare_server::application::control_loop::{self, ServerEvent};
use edgeshare_server::application::orchestrator::ScreenOrchestrator;
use edgeshare_server::application::primary_client::PrimaryClientAdapter;
use edgeshare_server::infrastructure::platform::headless::HeadlessScreen;
use edgeshare_server::infrastructure::storage::config::{self, AppConfig};

/// Capacity of the control loop's event queue.
const EVENT_QUEUE_CAPACITY: usize = 1024;

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Command-line arguments for the edgeshare server.
#[derive(Debug, Parser)]
#[command(
    name = "edgeshare-server",
    about = "Shares one keyboard and mouse across the screens of several machines",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, env = "EDGESHARE_CONFIG")]
    config: Option<PathBuf>,

    /// Name of the primary screen.
    #[arg(long, env = "EDGESHARE_NAME")]
    name: Option<String>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,

    /// Write a default config file to the config path and exit.
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_config_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => config::load_config().context("loading config")?,
        };
        if let Some(name) = &self.name {
            cfg.server.name = name.clone();
        }
        if let Some(level) = &self.log_level {
            cfg.server.log_level = level.clone();
        }
        Ok(cfg)
    }

    /// Writes `AppConfig::default()` to the config path.  An existing file is
    /// never overwritten.
    fn write_default_config(&self) -> anyhow::Result<PathBuf> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => config::config_file_path()?,
        };
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        let written = match &self.config {
            Some(path) => config::save_config_to(path, &AppConfig::default()),
            None => config::save_config(&AppConfig::default()),
        };
        written.with_context(|| format!("writing default config to {}", path.display()))?;
        Ok(path)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.init_config {
        let path = cli.write_default_config()?;
        println!("wrote default config to {}", path.display());
        return Ok(());
    }
    let cfg = cli.load_config()?;

    // `RUST_LOG` wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.server.log_level)),
        )
        .init();

    let orchestrator = build_orchestrator(&cfg)?;
    info!(
        screen = %cfg.server.name,
        secondaries = cfg.screens.len(),
        links = cfg.links.len(),
        "edgeshare server starting"
    );

    let (handle, events) = control_loop::channel(EVENT_QUEUE_CAPACITY);
    let task = tokio::spawn(control_loop::run(orchestrator, events));

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let shutdown = handle.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                if shutdown.send(ServerEvent::Shutdown).await.is_err() {
                    error!("control loop already stopped");
                }
            }
            Err(e) => error!("failed to listen for Ctrl-C signal: {e}"),
        }
    });

    info!("edgeshare server ready.  Press Ctrl-C to exit.");
    // `handle` lives until the task joins, so only an explicit shutdown
    // stops the loop.
    let orchestrator = task.await.context("control loop panicked")?;

    for client in orchestrator.registry().all() {
        info!(
            screen = %client.name,
            connection_id = %client.connection_id,
            state = ?client.connection_state,
            "secondary at shutdown"
        );
    }
    info!("edgeshare server stopped");
    Ok(())
}

/// Validates `cfg` and builds an orchestrator driving a headless primary.
fn build_orchestrator(cfg: &AppConfig) -> anyhow::Result<ScreenOrchestrator> {
    let layout = cfg.build_layout().context("invalid configuration")?;
    let screen = HeadlessScreen::new(&cfg.server.name, cfg.primary_shape(), cfg.server.jump_zone)?;
    let primary = PrimaryClientAdapter::new(&cfg.server.name, Box::new(screen));

    let mut orchestrator = ScreenOrchestrator::new(primary, layout, cfg.orchestrator_config())?;
    let options = cfg.options_list();
    if !options.is_empty() {
        orchestrator.set_options(options);
    }
    Ok(orchestrator)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
