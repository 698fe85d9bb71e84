//! Place suggestion types and the geocoding wire format.

use serde::{Deserialize, Serialize};

/// Place categories the search is restricted to.
pub const PLACE_TYPES: &[&str] = &["district", "place", "locality", "neighborhood"];

/// A longitude/latitude pair as returned by the geocoding service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A candidate location offered to the user.
///
/// Immutable once received; the search state only ever replaces whole lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Unique key assigned by the service (e.g. `place.123`).
    pub id: String,
    /// Primary label (e.g. `Paris`).
    pub text: String,
    /// Secondary label: the first entry of the feature's context list.
    pub context: Option<String>,
    /// Fully qualified name (e.g. `Paris, Île-de-France, France`).
    pub place_name: Option<String>,
    /// Representative point of the place.
    pub center: Option<Coordinates>,
}

impl Suggestion {
    /// Creates a suggestion with only an id and a label.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            context: None,
            place_name: None,
            center: None,
        }
    }

    /// Sets the secondary context label.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sets the fully qualified place name.
    pub fn with_place_name(mut self, place_name: impl Into<String>) -> Self {
        self.place_name = Some(place_name.into());
        self
    }

    /// Sets the center point.
    pub fn with_center(mut self, longitude: f64, latitude: f64) -> Self {
        self.center = Some(Coordinates {
            longitude,
            latitude,
        });
        self
    }

    /// Returns the most descriptive name available.
    pub fn display_name(&self) -> &str {
        self.place_name.as_deref().unwrap_or(&self.text)
    }
}

// Wire types for the `mapbox.places` endpoint. Only the fields we use are
// declared; everything else in the payload is ignored.

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub place_name: Option<String>,
    #[serde(default)]
    pub center: Option<[f64; 2]>,
    #[serde(default)]
    pub context: Vec<ContextEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContextEntry {
    pub text: String,
}

impl From<Feature> for Suggestion {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id,
            text: feature.text,
            context: feature.context.into_iter().next().map(|c| c.text),
            place_name: feature.place_name,
            center: feature.center.map(|[longitude, latitude]| Coordinates {
                longitude,
                latitude,
            }),
        }
    }
}
