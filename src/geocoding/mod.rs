//! Geocoding integration for geosearch.
//!
//! Provides the trait the search widget fetches suggestions through, plus the
//! Mapbox and mock implementations.

pub mod mapbox;
pub mod mock;
pub mod types;

pub use mapbox::{MapboxClient, MapboxConfig};
pub use mock::MockGeocoder;
pub use types::{Coordinates, Suggestion, PLACE_TYPES};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::config::GeocodingConfig;
use crate::error::{GeoSearchError, Result};

/// Trait for services that turn free text into place suggestions.
///
/// Implementations must be thread-safe (Send + Sync) so requests can run on
/// spawned tasks.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Searches for places matching `query`.
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>>;

    /// Short provider name for display.
    fn name(&self) -> &'static str;
}

/// Geocoding provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderProvider {
    /// Mapbox forward geocoding.
    #[default]
    Mapbox,
    /// Built-in gazetteer (no access token required).
    Mock,
}

impl GeocoderProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mapbox => "mapbox",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for GeocoderProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mapbox" => Ok(Self::Mapbox),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown geocoding provider: {}", s)),
        }
    }
}

impl std::fmt::Display for GeocoderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creates a geocoder for the configured provider.
///
/// The access token is injected through `config`; nothing here reads
/// process-wide state, so tests can build clients with any token.
pub fn create_geocoder(config: &GeocodingConfig) -> Result<Arc<dyn Geocoder>> {
    match config.provider {
        GeocoderProvider::Mapbox => {
            let token = config
                .access_token
                .clone()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    GeoSearchError::config(
                        "Mapbox access token not configured. Use --access-token, set MAPBOX_ACCESS_TOKEN, or add it to the config file.",
                    )
                })?;
            let mapbox = MapboxConfig::new(token)
                .with_url(config.base_url.clone())
                .with_timeout(config.timeout_secs);
            Ok(Arc::new(MapboxClient::new(mapbox)?))
        }
        GeocoderProvider::Mock => Ok(Arc::new(MockGeocoder::new())),
    }
}
