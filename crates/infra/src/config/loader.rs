//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports TOML and JSON formats
//!
//! ## Environment Variables
//! - `CONCORD_BACKEND_URL`: GraphQL backend endpoint
//! - `CONCORD_BACKEND_ADMIN_SECRET`: admin secret sent on every request
//! - `CONCORD_GOOGLE_API_BASE`: Google Calendar API base (optional)
//! - `CONCORD_GOOGLE_TOKEN_URL`: Google OAuth token endpoint (optional)
//! - `CONCORD_ZOOM_API_BASE`: Zoom API base (optional)
//! - `CONCORD_HTTP_TIMEOUT`: outbound HTTP timeout in seconds (optional)
//! - `CONCORD_HTTP_MAX_ATTEMPTS`: outbound HTTP attempt count (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.toml` or `./config.json` (current working directory)
//! 2. `./concord.toml` or `./concord.json` (current working directory)
//! 3. `../config.toml` or `../config.json` (parent directory)

use std::path::{Path, PathBuf};

use concord_domain::{BackendConfig, ConcordError, Config, Result};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ConcordError::Config` if configuration cannot be loaded from
/// either source or a file's format is invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The backend URL and admin secret are required; everything else falls
/// back to its default.
///
/// # Errors
/// Returns `ConcordError::Config` if a required variable is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<Config> {
    let url = env_var("CONCORD_BACKEND_URL")?;
    let admin_secret = env_var("CONCORD_BACKEND_ADMIN_SECRET")?;

    let mut config = Config {
        backend: BackendConfig { url, admin_secret },
        ..Config::default()
    };

    if let Ok(base) = std::env::var("CONCORD_GOOGLE_API_BASE") {
        config.google.api_base = base;
    }
    if let Ok(token_url) = std::env::var("CONCORD_GOOGLE_TOKEN_URL") {
        config.google.token_url = token_url;
    }
    config.google.client_id = std::env::var("GOOGLE_CALENDAR_CLIENT_ID").ok();
    config.google.client_secret = std::env::var("GOOGLE_CALENDAR_CLIENT_SECRET").ok();
    config.google.refresh_token = std::env::var("GOOGLE_CALENDAR_REFRESH_TOKEN").ok();
    config.google.access_token = std::env::var("GOOGLE_CALENDAR_ACCESS_TOKEN").ok();

    if let Ok(base) = std::env::var("CONCORD_ZOOM_API_BASE") {
        config.zoom.api_base = base;
    }
    config.zoom.access_token = std::env::var("CONCORD_ZOOM_ACCESS_TOKEN").ok();

    if let Ok(url) = std::env::var("CONCORD_SCHEDULER_URL") {
        config.scheduler.url = url;
    }

    if let Ok(timeout) = std::env::var("CONCORD_HTTP_TIMEOUT") {
        config.http.timeout_seconds = timeout
            .parse()
            .map_err(|e| ConcordError::Config(format!("invalid HTTP timeout: {e}")))?;
    }
    if let Ok(attempts) = std::env::var("CONCORD_HTTP_MAX_ATTEMPTS") {
        config.http.max_attempts = attempts
            .parse()
            .map_err(|e| ConcordError::Config(format!("invalid HTTP attempt count: {e}")))?;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both TOML and JSON formats (detected by file extension).
///
/// # Errors
/// Returns `ConcordError::Config` if no file is found or parsing fails.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => probe_config_paths().ok_or_else(|| {
            ConcordError::Config("no configuration file found in probed locations".into())
        })?,
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        ConcordError::Config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&contents)
            .map_err(|e| ConcordError::Config(format!("invalid TOML in {}: {e}", path.display())))?,
        Some("json") => serde_json::from_str(&contents)
            .map_err(|e| ConcordError::Config(format!("invalid JSON in {}: {e}", path.display())))?,
        other => {
            return Err(ConcordError::Config(format!(
                "unsupported config extension {other:?} on {}",
                path.display()
            )))
        }
    };

    if config.backend.url.is_empty() {
        return Err(ConcordError::Config(format!(
            "{} is missing the backend URL",
            path.display()
        )));
    }

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    const CANDIDATES: &[&str] = &[
        "config.toml",
        "config.json",
        "concord.toml",
        "concord.json",
        "../config.toml",
        "../config.json",
    ];

    CANDIDATES.iter().map(PathBuf::from).find(|p| p.is_file())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| ConcordError::Config(format!("environment variable {name} is not set")))
}
