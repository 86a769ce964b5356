//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the credentials are not in the environment, falls back to a file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `TRUESIGN_CLIENT_ID`: API client id (required)
//! - `TRUESIGN_CLIENT_SECRET`: API client secret (required)
//! - `TRUESIGN_API_URL`: Base path, defaults to the `v1` endpoint
//! - `TRUESIGN_TIMEOUT_SECS`: Request timeout in seconds
//! - `TRUESIGN_REFRESH_THRESHOLD_SECS`: Token refresh threshold in seconds
//! - `TRUESIGN_TITLE_PREFIX`: Prefix of generated envelope titles
//! - `TRUESIGN_SIGNED_OR_STAMPED_ONLY`: Only download finalized documents
//!
//! ## File Locations
//! The loader probes `truesign.{json,toml}` and `config.{json,toml}` in the
//! working directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use truesign_domain::{ApiConfig, Result, TrueSignConfig, TrueSignError, WorkflowConfig};

const CONFIG_FILE_NAMES: [&str; 4] = ["truesign.json", "truesign.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TrueSignError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The resulting API settings do not validate
pub fn load() -> Result<TrueSignConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only the client id and secret are required; everything else falls back
/// to the defaults.
///
/// # Errors
/// Returns `TrueSignError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<TrueSignConfig> {
    let mut api = ApiConfig::new(env_var("TRUESIGN_CLIENT_ID")?, env_var("TRUESIGN_CLIENT_SECRET")?);

    if let Some(url) = env_opt("TRUESIGN_API_URL") {
        api.base_url = url;
    }
    if let Some(timeout) = env_parse::<u64>("TRUESIGN_TIMEOUT_SECS")? {
        api.timeout_seconds = timeout;
    }
    if let Some(threshold) = env_parse::<i64>("TRUESIGN_REFRESH_THRESHOLD_SECS")? {
        api.refresh_threshold_seconds = threshold;
    }
    api.validate()?;

    let defaults = WorkflowConfig::default();
    let workflow = WorkflowConfig {
        title_prefix: env_opt("TRUESIGN_TITLE_PREFIX").unwrap_or(defaults.title_prefix.clone()),
        signed_or_stamped_only: env_bool(
            "TRUESIGN_SIGNED_OR_STAMPED_ONLY",
            defaults.signed_or_stamped_only,
        ),
        ..defaults
    };

    Ok(TrueSignConfig { api, workflow })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `TrueSignError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<TrueSignConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TrueSignError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TrueSignError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TrueSignError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.api.validate()?;
    Ok(config)
}

/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<TrueSignConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TrueSignError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TrueSignError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TrueSignError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        TrueSignError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| TrueSignError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
