//! Network Guard
//!
//! Watches target groups and runs a command when one goes down, another when
//! it comes back.
//!
//! # Architecture Overview
//!
//! ```text
//!   config file ──▶ GuardConfig ──▶ TargetGroup × N
//!                                        │
//!                                        ▼
//!                               ┌────────────────┐
//!                               │   Supervisor   │
//!                               └───────┬────────┘
//!                     one task per group │
//!                                        ▼
//!   ┌──────────────────────────────────────────────────────────┐
//!   │ HealthMachine                                            │
//!   │   Racer ──▶ Probe × endpoints (HEAD, time-boxed)         │
//!   │   HealthState (Up ⇄ Down, hysteresis)                    │
//!   │   on edge ──▶ CommandRunner (post_down / post_up)        │
//!   │   StatusHandle ──▶ diagnostics endpoint, metrics         │
//!   └──────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use netguard::config::load_config;
use netguard::lifecycle::{signals, startup, Shutdown};
use netguard::observability::{logging, metrics};

/// Time allowed for machines to finish an in-flight cycle after shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "netguard", version)]
#[command(about = "Run commands when monitored network targets go down or come back", long_about = None)]
struct Cli {
    /// Config location
    #[arg(short, long, default_value = "netguard.toml")]
    config: PathBuf,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)
        .map_err(|e| format!("read config {}: {}", cli.config.display(), e))?;

    if cli.check {
        println!(
            "{}: OK ({} checkers)",
            cli.config.display(),
            config.checkers.len()
        );
        return Ok(());
    }

    logging::init_logging(&config.observability);
    tracing::info!("netguard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %cli.config.display(),
        checkers = config.checkers.len(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let running = startup::start(&config, &shutdown).await?;

    signals::wait_for_shutdown_signal().await;
    shutdown.trigger();

    if tokio::time::timeout(SHUTDOWN_GRACE, running.wait()).await.is_err() {
        tracing::warn!(grace = ?SHUTDOWN_GRACE, "Health machines did not stop in time");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
