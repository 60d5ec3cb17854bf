//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `audit_gateway` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Server startup
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use audit_gateway::initialization::init_logger_with;
use audit_gateway::{run_server, Config, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file (if it exists)
    // This allows setting API_KEY and the Drive credentials in .env without
    // exporting them manually
    // Try loading from current directory first, then from the executable's directory
    if dotenvy::dotenv().is_err() {
        // If .env not found in current dir, try next to the executable
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Load settings from the environment; a missing API key is fatal
    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("audit_gateway error: {e}");
            process::exit(1);
        }
    };
    if let Some(port) = config.port {
        settings.port = port;
    }

    // Run the server using the library
    if let Err(e) = run_server(settings).await {
        eprintln!("audit_gateway error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
