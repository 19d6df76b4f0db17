//! Configuration structures
//!
//! Plain data; loading (env probing, file fallback) lives in the infra
//! crate's config loader.

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// GraphQL backend endpoint configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Single GraphQL endpoint URL.
    pub url: String,
    /// Admin secret carried on every request.
    pub admin_secret: String,
}

/// Google Calendar API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_base: String,
    pub token_url: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Long-lived refresh token exchanged for access tokens.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Pre-issued access token; used as-is when no refresh token is set.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_base: "https://www.googleapis.com/calendar/v3".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            client_id: None,
            client_secret: None,
            refresh_token: None,
            access_token: None,
        }
    }
}

/// Zoom meeting API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub api_base: String,
    /// Server-to-server OAuth access token.
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self { api_base: "https://api.zoom.us/v2".to_string(), access_token: None }
    }
}

/// Endpoint that kicks off final meeting-assist scheduling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub url: String,
}

/// Outbound HTTP behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    /// Total attempts (initial try + retries).
    pub max_attempts: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 30, max_attempts: 3 }
    }
}
