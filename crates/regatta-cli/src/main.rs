//! Regatta - series scoring and fleet seeding from the command line.
//!
//! This binary runs the scoring engine against a JSON store document:
//! recomputing leaderboards, applying position edits, and seeding new
//! rounds and final fleets.

mod commands;
mod config;
mod utils;

use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{Command, USAGE};
use config::Config;
use regatta_core::JsonStore;

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "regatta.log";

/// Initialize the tracing subscriber for logging.
///
/// Returns the file writer guard when file logging is on; it must live
/// until exit so buffered lines are flushed.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match config.log_to_file.then(|| config.log_dir()) {
        Some(Ok(dir)) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        Some(Err(e)) => {
            eprintln!("Warning: file logging disabled: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

fn execute(args: &[String], mut config: Config) -> Result<String> {
    let command = Command::parse(args)?;

    if let Command::UseStore { path } = command {
        config.store_path = Some(path.clone());
        config.save().context("Failed to save config")?;
        return Ok(format!("Store set to {}\n", path.display()));
    }

    let store_path = config.store_path()?;
    let mut store = JsonStore::open(&store_path)
        .with_context(|| format!("Failed to open store {}", store_path.display()))?;
    info!(path = %store_path.display(), "Opened store");

    commands::run(command, &mut store)
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: using default config: {}", e);
            Config::default()
        }
    };
    let _guard = init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" || args[0] == "-h" {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    match execute(&args, config) {
        Ok(report) => {
            print!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
