//! Mock geocoder for offline use and testing.
//!
//! Answers from a small built-in gazetteer and records every query it sees.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::error::{GeoSearchError, Result};
use crate::geocoding::types::Suggestion;
use crate::geocoding::Geocoder;

/// Built-in places: (id, text, context, place name, longitude, latitude).
const GAZETTEER: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("place.paris-fr", "Paris", "Île-de-France", "Paris, Île-de-France, France", 2.35183, 48.85658),
    ("place.paris-tx", "Paris", "Texas", "Paris, Texas, United States", -95.5555, 33.6609),
    ("place.paris-tn", "Paris", "Tennessee", "Paris, Tennessee, United States", -88.3267, 36.3020),
    ("place.parma", "Parma", "Emilia-Romagna", "Parma, Emilia-Romagna, Italy", 10.3279, 44.8015),
    ("place.lyon", "Lyon", "Rhône", "Lyon, Rhône, France", 4.8357, 45.7640),
    ("place.london", "London", "England", "London, England, United Kingdom", -0.1276, 51.5072),
    ("locality.soho", "Soho", "London", "Soho, London, England, United Kingdom", -0.1337, 51.5136),
    ("place.berlin", "Berlin", "Berlin", "Berlin, Germany", 13.4050, 52.5200),
    ("district.kreuzberg", "Kreuzberg", "Berlin", "Kreuzberg, Berlin, Germany", 13.4036, 52.4986),
    ("place.sao-paulo", "São Paulo", "São Paulo", "São Paulo, São Paulo, Brazil", -46.6333, -23.5505),
    ("place.new-york", "New York", "New York", "New York, New York, United States", -74.0060, 40.7128),
    ("neighborhood.harlem", "Harlem", "New York", "Harlem, New York, United States", -73.9465, 40.8116),
];

/// Response behaviour configured for a specific query.
#[derive(Debug, Clone)]
enum Canned {
    Results(Vec<Suggestion>),
    Failure(String),
    Malformed,
}

/// Mock geocoder that returns deterministic suggestions.
///
/// Clones share the query log, so a test can hand one clone to the widget
/// host and keep another to inspect what was requested.
#[derive(Debug, Clone, Default)]
pub struct MockGeocoder {
    /// Custom response mappings (exact query, case-insensitive -> behaviour).
    canned: Vec<(String, Canned)>,
    /// Every query received, in order.
    queries: Arc<Mutex<Vec<String>>>,
}

impl MockGeocoder {
    /// Creates a new mock geocoder backed by the built-in gazetteer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `suggestions` whenever `query` is searched.
    pub fn with_response(mut self, query: impl Into<String>, suggestions: Vec<Suggestion>) -> Self {
        self.canned
            .push((query.into(), Canned::Results(suggestions)));
        self
    }

    /// Fails with a geocoding error whenever `query` is searched.
    pub fn with_failure(mut self, query: impl Into<String>, message: impl Into<String>) -> Self {
        self.canned
            .push((query.into(), Canned::Failure(message.into())));
        self
    }

    /// Answers `query` with an undecodable body.
    pub fn with_malformed(mut self, query: impl Into<String>) -> Self {
        self.canned.push((query.into(), Canned::Malformed));
        self
    }

    /// Returns the queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    /// Looks up the gazetteer by case-insensitive prefix of the label or full name.
    fn lookup(query: &str) -> Vec<Suggestion> {
        let needle = query.trim().to_lowercase();
        GAZETTEER
            .iter()
            .filter(|(_, text, _, place_name, _, _)| {
                text.to_lowercase().starts_with(&needle)
                    || place_name.to_lowercase().starts_with(&needle)
            })
            .map(|(id, text, context, place_name, lon, lat)| {
                Suggestion::new(*id, *text)
                    .with_context(*context)
                    .with_place_name(*place_name)
                    .with_center(*lon, *lat)
            })
            .collect()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        let canned = self
            .canned
            .iter()
            .find(|(pattern, _)| pattern.eq_ignore_ascii_case(query))
            .map(|(_, canned)| canned.clone());

        match canned {
            Some(Canned::Results(suggestions)) => Ok(suggestions),
            Some(Canned::Failure(message)) => Err(GeoSearchError::geocoding(message)),
            Some(Canned::Malformed) => Err(GeoSearchError::malformed("expected value at line 1 column 1")),
            None => Ok(Self::lookup(query)),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
