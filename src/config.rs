//! Configuration management for geosearch.
//!
//! Handles loading configuration from TOML files and environment variables:
//! which geocoding provider to use, its credentials, and search timing.

use crate::error::{GeoSearchError, Result};
use crate::geocoding::mapbox::{DEFAULT_MAPBOX_URL, DEFAULT_TIMEOUT_SECS};
use crate::geocoding::GeocoderProvider;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Mapbox access token.
pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

/// Quiet period before a typed query is sent.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Main configuration structure for geosearch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Geocoding service configuration.
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Search widget behaviour.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Geocoding service configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Provider: "mapbox" or "mock".
    #[serde(default)]
    pub provider: GeocoderProvider,

    /// Access token (falls back to `MAPBOX_ACCESS_TOKEN`).
    #[serde(default)]
    pub access_token: Option<String>,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_MAPBOX_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderProvider::default(),
            access_token: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for GeocodingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingConfig")
            .field("provider", &self.provider)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GeocodingConfig {
    /// Applies environment variables (`MAPBOX_ACCESS_TOKEN`) as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.access_token.is_none() {
            self.access_token = std::env::var(ACCESS_TOKEN_ENV).ok();
        }
    }

    /// Returns a display-safe description for the UI header.
    pub fn display_string(&self) -> String {
        match self.provider {
            GeocoderProvider::Mapbox => {
                let host = url::Url::parse(&self.base_url)
                    .ok()
                    .and_then(|u| u.host_str().map(String::from))
                    .unwrap_or_else(|| self.base_url.clone());
                format!("mapbox @ {host}")
            }
            GeocoderProvider::Mock => "mock gazetteer".to_string(),
        }
    }
}

/// Search widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period in milliseconds before a query is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl SearchConfig {
    /// Returns the debounce delay as a duration.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("geosearch")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| GeoSearchError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            GeoSearchError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
