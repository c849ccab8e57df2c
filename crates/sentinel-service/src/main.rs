use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentinel_core::baseline::BaselineStore;
use sentinel_core::config::MonitorConfig;
use sentinel_core::event_log::EventLog;
use sentinel_core::scanner::Scanner;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use sentinel_service::monitor::{spawn_monitor, MonitorSession};

#[derive(Parser, Debug)]
#[command(name = "sentinel", version, about = "Local file integrity monitor", long_about = None)]
struct Cli {
    /// Optional JSON config file; command-line flags override its values.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Take the initial baseline snapshot of the watched roots
    Baseline {
        /// Directory to watch (repeatable)
        #[arg(long = "root")]
        roots: Vec<PathBuf>,
    },
    /// Run one change-check cycle against the stored baseline
    Check {
        /// Directory to watch (repeatable)
        #[arg(long = "root")]
        roots: Vec<PathBuf>,
    },
    /// Poll for changes until interrupted
    Watch {
        /// Directory to watch (repeatable)
        #[arg(long = "root")]
        roots: Vec<PathBuf>,

        /// Seconds between scan cycles
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// Print recent activity log lines, newest first
    Events {
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };

    match cli.command {
        Commands::Baseline { roots } => {
            apply_roots(&mut config, roots)?;
            let session = build_session(&config)?;
            let files = session.scan_baseline()?;
            println!("Baseline written: {files} files");
        }
        Commands::Check { roots } => {
            apply_roots(&mut config, roots)?;
            let session = build_session(&config)?;
            let events = session.check_once()?;
            println!("Changes detected: {events}");
        }
        Commands::Watch {
            roots,
            interval_secs,
        } => {
            if let Some(secs) = interval_secs {
                config.poll_interval_secs = secs;
            }
            apply_roots(&mut config, roots)?;
            let session = Arc::new(build_session(&config)?);
            let (task, handle) = spawn_monitor(session.clone(), config.poll_interval())?;

            signal::ctrl_c().await?;
            info!("stop requested");
            handle.stop();
            task.await?;
            println!("Changes detected: {}", session.change_count());
        }
        Commands::Events { limit } => {
            let log = EventLog::new(&config.log_path);
            for line in log.read_recent(Some(limit))? {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Command-line roots override config roots; either way the roots are
/// canonicalized so baseline keys are absolute regardless of how they were
/// spelled.
fn apply_roots(config: &mut MonitorConfig, roots: Vec<PathBuf>) -> Result<()> {
    if !roots.is_empty() {
        config.roots = roots;
    }
    let mut canonical = Vec::with_capacity(config.roots.len());
    for root in &config.roots {
        canonical.push(
            root.canonicalize()
                .with_context(|| format!("cannot resolve root {}", root.display()))?,
        );
    }
    config.roots = canonical;
    Ok(())
}

fn build_session(config: &MonitorConfig) -> Result<MonitorSession> {
    if let Some(parent) = config.baseline_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let scanner = Scanner::new(config.roots.clone(), config.ignore_set());
    let store = BaselineStore::new(&config.baseline_path);
    let log = Arc::new(EventLog::new(&config.log_path));
    Ok(MonitorSession::new(scanner, store, log))
}
