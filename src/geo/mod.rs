//! Province boundary features and name reconciliation.

pub mod fetch;
pub mod matching;

pub use fetch::{fetch_features, DEFAULT_GEOJSON_URL};
pub use matching::{match_names, normalize, MatchOutcome, NameMapping};

#[derive(Debug, Clone)]
/// One boundary feature from the provinces GeoJSON.
pub struct GeoFeature {
    /// Name as it appears in the feature properties.
    pub display_name: String,
    /// Normalised form of the display name, computed at load time.
    pub normalized: String,
    /// Raw geometry payload, opaque to the matching logic.
    pub geometry: serde_json::Value,
}

impl GeoFeature {
    pub fn new(display_name: impl Into<String>, geometry: serde_json::Value) -> Self {
        let display_name = display_name.into();
        GeoFeature {
            normalized: matching::normalize(&display_name),
            display_name,
            geometry,
        }
    }
}
