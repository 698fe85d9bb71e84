//! Error types for geosearch.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for geosearch operations.
#[derive(Error, Debug)]
pub enum GeoSearchError {
    /// Geocoding request errors (unreachable host, non-2xx status, timeouts, etc.)
    #[error("Geocoding error: {0}")]
    Geocoding(String),

    /// The geocoding service answered with a body we could not decode.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Configuration errors (invalid config file, missing access token, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal failures, unexpected states, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GeoSearchError {
    /// Creates a geocoding error with the given message.
    pub fn geocoding(msg: impl Into<String>) -> Self {
        Self::Geocoding(msg.into())
    }

    /// Creates a malformed-response error with the given message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Geocoding(_) => "Geocoding Error",
            Self::MalformedResponse(_) => "Response Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using GeoSearchError.
pub type Result<T> = std::result::Result<T, GeoSearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_geocoding() {
        let err = GeoSearchError::geocoding("Mapbox API error (401 Unauthorized)");
        assert_eq!(
            err.to_string(),
            "Geocoding error: Mapbox API error (401 Unauthorized)"
        );
        assert_eq!(err.category(), "Geocoding Error");
    }

    #[test]
    fn test_error_display_malformed() {
        let err = GeoSearchError::malformed("missing field `features`");
        assert_eq!(
            err.to_string(),
            "Malformed response: missing field `features`"
        );
        assert_eq!(err.category(), "Response Error");
    }

    #[test]
    fn test_error_display_config() {
        let err = GeoSearchError::config("Mapbox access token not configured");
        assert_eq!(
            err.to_string(),
            "Configuration error: Mapbox access token not configured"
        );
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_error_display_internal() {
        let err = GeoSearchError::internal("unexpected state");
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.category(), "Internal Error");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeoSearchError>();
    }
}
