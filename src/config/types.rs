//! Configuration types, CLI options, and environment-derived settings.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::error;

use crate::config::constants::{
    AUDIT_COMMAND_CANDIDATES, AUDIT_TIMEOUT, BATCH_ITEM_DELAY, COMMAND_PROBE_TIMEOUT,
    DEFAULT_PORT, MAX_AUDIT_OUTPUT_BYTES, VERSION_CHECK_TIMEOUT,
};
use crate::drive::ServiceAccountKey;
use crate::error_handling::SettingsError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line options.
///
/// Runtime behavior (API key, Drive credentials, port) comes from the
/// environment; the CLI only controls logging and offers a port override
/// for local runs.
///
/// # Examples
///
/// ```bash
/// # Basic usage (reads API_KEY etc. from the environment / .env)
/// audit_gateway
///
/// # Structured logs on a custom port
/// audit_gateway --log-format json --port 8080
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "audit_gateway",
    about = "HTTP API that runs SquirrelScan website audits."
)]
pub struct Config {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Listening port (overrides the PORT environment variable)
    #[arg(long)]
    pub port: Option<u16>,
}

/// Runtime settings for the server.
///
/// Built from the environment with [`Settings::from_env`]; every operational
/// knob is an ordinary field so tests can construct tightened variants
/// (short timeouts, scratch temp directories, fake tool candidates).
#[derive(Debug, Clone)]
pub struct Settings {
    /// Shared secret expected in the `x-api-key` header.
    pub api_key: String,

    /// Listening port.
    pub port: u16,

    /// Parsed Google service-account credentials, when configured.
    pub drive_key: Option<ServiceAccountKey>,

    /// Default destination folder for Drive uploads.
    pub drive_folder_id: Option<String>,

    /// Deployment environment name from `APP_ENV`, when set.
    pub environment: Option<String>,

    /// Directory for temporary report files.
    pub temp_dir: PathBuf,

    /// Audit tool command names, in probe order.
    pub tool_candidates: Vec<String>,

    /// Timeout for one `--version` probe during command resolution.
    pub probe_timeout: Duration,

    /// Timeout for the version probe run by `GET /test`.
    pub version_check_timeout: Duration,

    /// Wall-clock limit for one audit subprocess.
    pub audit_timeout: Duration,

    /// Per-stream cap on captured subprocess output in bytes.
    pub max_output_bytes: u64,

    /// Pause between consecutive batch items.
    pub batch_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            port: DEFAULT_PORT,
            drive_key: None,
            drive_folder_id: None,
            environment: None,
            temp_dir: env::temp_dir(),
            tool_candidates: AUDIT_COMMAND_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            probe_timeout: COMMAND_PROBE_TIMEOUT,
            version_check_timeout: VERSION_CHECK_TIMEOUT,
            audit_timeout: AUDIT_TIMEOUT,
            max_output_bytes: MAX_AUDIT_OUTPUT_BYTES,
            batch_delay: BATCH_ITEM_DELAY,
        }
    }
}

impl Settings {
    /// Builds settings from the process environment.
    ///
    /// Reads:
    /// - `API_KEY` (required) - shared secret for request authentication
    /// - `GOOGLE_SERVICE_ACCOUNT_KEY` (optional) - service-account JSON;
    ///   an unparseable value is logged and treated as not configured
    /// - `GOOGLE_DRIVE_FOLDER_ID` (optional) - default upload folder
    /// - `PORT` (optional, default 3000)
    /// - `APP_ENV` (optional) - `development` enables detailed error messages
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingVar`] when `API_KEY` is absent or empty.
    pub fn from_env() -> Result<Self, SettingsError> {
        let api_key = env_string("API_KEY").ok_or(SettingsError::MissingVar("API_KEY"))?;

        let drive_key = match env_string("GOOGLE_SERVICE_ACCOUNT_KEY") {
            Some(raw) => match ServiceAccountKey::from_json(&raw) {
                Ok(key) => Some(key),
                Err(e) => {
                    // Matches the upload adapter's "not configured" behavior
                    // rather than refusing to start.
                    error!("Google Drive setup failed: {e}");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            api_key,
            port: env_u16("PORT", DEFAULT_PORT),
            drive_key,
            drive_folder_id: env_string("GOOGLE_DRIVE_FOLDER_ID"),
            environment: env_string("APP_ENV"),
            ..Self::default()
        })
    }

    /// Whether Drive uploads are configured.
    pub fn drive_configured(&self) -> bool {
        self.drive_key.is_some()
    }

    /// Whether detailed internal error messages are exposed in responses.
    ///
    /// Only an explicit `APP_ENV=development` turns this on.
    pub fn development_mode(&self) -> bool {
        self.environment.as_deref() == Some("development")
    }

    /// Environment name for the startup banner.
    pub fn environment_name(&self) -> &str {
        self.environment.as_deref().unwrap_or("development")
    }
}

fn env_string(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_u16(name: &str, default: u16) -> u16 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(default)
}
