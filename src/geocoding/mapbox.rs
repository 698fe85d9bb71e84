//! Mapbox geocoding client.
//!
//! Implements the Geocoder trait against the `mapbox.places` forward
//! geocoding endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GeoSearchError, Result};
use crate::geocoding::types::{FeatureCollection, Suggestion, PLACE_TYPES};
use crate::geocoding::Geocoder;

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Mapbox API base URL.
pub const DEFAULT_MAPBOX_URL: &str = "https://api.mapbox.com";

/// Mapbox client configuration.
#[derive(Clone)]
pub struct MapboxConfig {
    /// Access token sent as the `access_token` query parameter.
    pub access_token: String,
    /// Scheme and host (plus optional path prefix) of the API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl MapboxConfig {
    /// Creates a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_MAPBOX_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Sets the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

// Keeps the token out of debug logs.
impl std::fmt::Debug for MapboxConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapboxConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Error body returned by Mapbox for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Mapbox geocoding client.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    config: MapboxConfig,
    client: Client,
}

impl MapboxClient {
    /// Creates a new Mapbox client with the given configuration.
    pub fn new(config: MapboxConfig) -> Result<Self> {
        // Validate early so a bad base URL fails at startup, not on first keystroke.
        Url::parse(&config.base_url).map_err(|e| {
            GeoSearchError::config(format!("Invalid geocoding base URL '{}': {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeoSearchError::geocoding(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Builds the search URL for a query.
    ///
    /// The query becomes a single path segment with every reserved character
    /// escaped, so `;` cannot split it into a batch query. The type filter is
    /// sent as one `types` pair per category.
    pub fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| GeoSearchError::config(format!("Invalid geocoding base URL: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(GeoSearchError::config("Geocoding base URL cannot have a path"));
        }

        // Already escaped; `set_path` leaves existing percent sequences alone.
        let path = format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            url.path().trim_end_matches('/'),
            urlencoding::encode(query)
        );
        url.set_path(&path);

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("access_token", &self.config.access_token);
            for place_type in PLACE_TYPES {
                pairs.append_pair("types", place_type);
            }
        }

        Ok(url)
    }
}

/// Decodes a `mapbox.places` response body into suggestions.
pub(crate) fn parse_features(body: &str) -> Result<Vec<Suggestion>> {
    let collection: FeatureCollection = serde_json::from_str(body)
        .map_err(|e| GeoSearchError::malformed(format!("Failed to parse response: {e}")))?;

    Ok(collection
        .features
        .into_iter()
        .map(Suggestion::from)
        .collect())
}

#[async_trait]
impl Geocoder for MapboxClient {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        let url = self.search_url(query)?;
        debug!(query, "Requesting place suggestions from Mapbox");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeoSearchError::geocoding("Request timed out. Try again.")
            } else if e.is_connect() {
                GeoSearchError::geocoding("Failed to connect to Mapbox. Check your network.")
            } else {
                GeoSearchError::geocoding(format!("Request failed: {}", e.without_url()))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeoSearchError::geocoding(format!("Failed to read response: {}", e.without_url())))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            warn!(%status, "Mapbox rejected geocoding request");
            return Err(GeoSearchError::geocoding(format!(
                "Mapbox API error ({}): {}",
                status, message
            )));
        }

        let suggestions = parse_features(&body)?;
        debug!(query, count = suggestions.len(), "Received place suggestions");
        Ok(suggestions)
    }

    fn name(&self) -> &'static str {
        "mapbox"
    }
}
