//! # Stream Replay - Main Entry Point
//!
//! Drives a client message stream from a scripted input file, the way a game
//! client drives it from devices: raw events in, one propagation pass per
//! tick, commands drained to the consumer.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with the default configuration file (replay.toml)
//! stream-replay
//!
//! # Specify a custom script
//! stream-replay --config drag_scroll.toml
//!
//! # Override settings
//! stream-replay --ticks 300 --log-level debug
//!
//! # Machine-readable command output
//! stream-replay --json-output
//! ```
//!
//! ## Configuration
//!
//! The replay loads a TOML file with `[session]`, `[mouse]`, `[look_at]`,
//! `[[bindings]]`, `[[input]]` and `[[shell]]` sections. A missing file runs
//! the stock bindings with no scripted input.
//!
//! ## Signal Handling
//!
//! The replay stops early on SIGINT (Ctrl+C) or SIGTERM (Unix systems).

use tracing::error;

mod app;
mod cli;
mod config;
mod consumer;
mod logging;
mod script;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the replay driver.
///
/// # Exit Codes
///
/// * **0**: Replay finished or was interrupted cleanly
/// * **1**: Error during startup, configuration, or the replay itself
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let loaded = AppConfig::load_from_file(&args.config_path).await;

    // Logging comes up before config errors are reported so they reach the log.
    let logging = match &loaded {
        Ok(config) => config.logging.clone(),
        Err(_) => LoggingSettings::default(),
    };
    let logging = LoggingSettings {
        level: args.log_level.clone().unwrap_or(logging.level),
        ..logging
    };
    if let Err(e) = logging::setup_logging(&logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("❌ {e}");
            std::process::exit(1);
        }
    };

    match Application::new(args, config) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Replay error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start replay: {e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

// Re-export main types for potential library usage
pub use config::{ConfigError, LoggingSettings, SessionSettings};
pub use consumer::CommandRecorder;
pub use script::{InputScript, ScriptedInput, ShellToggle};
