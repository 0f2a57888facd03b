//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the anchor variable is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Falls back to built-in defaults when neither source exists
//!
//! ## Environment Variables
//! - `OPENHOUSE_DB_PATH`: Database file path (anchor for env-based loading)
//! - `OPENHOUSE_DB_POOL_SIZE`: Connection pool size
//! - `OPENHOUSE_HOST` / `OPENHOUSE_PORT`: Listen address
//! - `OPENHOUSE_ENVIRONMENT`: `development` or `production`
//! - `OPENHOUSE_LOOKAHEAD_DAYS`: Forward-scan window for slot search
//! - `OPENHOUSE_MAX_SLOTS_PER_DAY`: Availability cap per agent per day
//! - `OPENHOUSE_CALENDAR_ENABLED` / `OPENHOUSE_CALENDAR_FAIL_OPEN`
//! - `OPENHOUSE_CALENDAR_CLIENT_ID` / `_CLIENT_SECRET` / `_REFRESH_TOKEN`
//! - `OPENHOUSE_CALENDAR_API_BASE` / `OPENHOUSE_CALENDAR_TOKEN_URL`
//! - `OPENHOUSE_EMAIL_ENABLED` / `_EMAIL_API_URL` / `_EMAIL_API_KEY` / `_EMAIL_FROM`
//! - `OPENHOUSE_SMS_ENABLED` / `_SMS_API_URL` / `_SMS_ACCOUNT_SID` / `_SMS_AUTH_TOKEN` / `_SMS_FROM`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./openhouse.json` or `./openhouse.toml` (current working directory)
//! 3. Parent directories (up to 2 levels)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use openhouse_domain::{Config, OpenHouseError, Result};

/// Load configuration with automatic fallback strategy
///
/// Environment variables win when `OPENHOUSE_DB_PATH` is set; otherwise a
/// probed config file; otherwise built-in defaults.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(env_err) => {
            tracing::debug!(error = ?env_err, "Failed to load from environment, trying file");
            match load_from_file(None) {
                Ok(config) => Ok(config),
                Err(file_err) => {
                    tracing::info!(
                        error = ?file_err,
                        "No configuration source found, using built-in defaults"
                    );
                    Ok(Config::default())
                }
            }
        }
    }
}

/// Load configuration from environment variables
///
/// `OPENHOUSE_DB_PATH` must be present; every other variable falls back to
/// its default.
///
/// # Errors
/// Returns `OpenHouseError::Config` if the anchor variable is missing or a
/// numeric variable fails to parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("OPENHOUSE_DB_PATH")?;
    if let Some(pool_size) = env_parse::<u32>("OPENHOUSE_DB_POOL_SIZE")? {
        config.database.pool_size = pool_size;
    }

    if let Ok(host) = std::env::var("OPENHOUSE_HOST") {
        config.server.host = host;
    }
    if let Some(port) = env_parse::<u16>("OPENHOUSE_PORT")? {
        config.server.port = port;
    }
    if let Ok(environment) = std::env::var("OPENHOUSE_ENVIRONMENT") {
        config.server.environment = environment;
    }

    if let Some(lookahead) = env_parse::<u32>("OPENHOUSE_LOOKAHEAD_DAYS")? {
        config.booking.lookahead_days = lookahead;
    }
    if let Some(max_slots) = env_parse::<usize>("OPENHOUSE_MAX_SLOTS_PER_DAY")? {
        config.booking.max_slots_per_day = max_slots;
    }

    config.calendar.enabled = env_bool("OPENHOUSE_CALENDAR_ENABLED", config.calendar.enabled);
    config.calendar.fail_open =
        env_bool("OPENHOUSE_CALENDAR_FAIL_OPEN", config.calendar.fail_open);
    config.calendar.client_id = std::env::var("OPENHOUSE_CALENDAR_CLIENT_ID").ok();
    config.calendar.client_secret = std::env::var("OPENHOUSE_CALENDAR_CLIENT_SECRET").ok();
    config.calendar.refresh_token = std::env::var("OPENHOUSE_CALENDAR_REFRESH_TOKEN").ok();
    config.calendar.api_base = std::env::var("OPENHOUSE_CALENDAR_API_BASE").ok();
    config.calendar.token_url = std::env::var("OPENHOUSE_CALENDAR_TOKEN_URL").ok();

    config.email.enabled = env_bool("OPENHOUSE_EMAIL_ENABLED", config.email.enabled);
    config.email.api_url = std::env::var("OPENHOUSE_EMAIL_API_URL").ok();
    config.email.api_key = std::env::var("OPENHOUSE_EMAIL_API_KEY").ok();
    if let Ok(from) = std::env::var("OPENHOUSE_EMAIL_FROM") {
        config.email.from = from;
    }

    config.sms.enabled = env_bool("OPENHOUSE_SMS_ENABLED", config.sms.enabled);
    config.sms.api_url = std::env::var("OPENHOUSE_SMS_API_URL").ok();
    config.sms.account_sid = std::env::var("OPENHOUSE_SMS_ACCOUNT_SID").ok();
    config.sms.auth_token = std::env::var("OPENHOUSE_SMS_AUTH_TOKEN").ok();
    config.sms.from = std::env::var("OPENHOUSE_SMS_FROM").ok();

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `OpenHouseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(OpenHouseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            OpenHouseError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OpenHouseError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OpenHouseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OpenHouseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(OpenHouseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("openhouse.json"),
            cwd.join("openhouse.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("openhouse.json"),
                exe_dir.join("openhouse.toml"),
            ]);
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        OpenHouseError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric environment variable.
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| OpenHouseError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
