//! Fetches the provinces GeoJSON and extracts the feature names.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::GeoFeature;

/// Public provinces GeoJSON used when no other source is given.
pub const DEFAULT_GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/codeforgermany/click_that_hood/main/public/data/spain-provinces.geojson";

/// Property keys that may hold the province name, tried in order.
const NAME_KEYS: [&str; 5] = ["name", "NAME", "NOMBRE", "prov_name", "nom"];

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Map<String, Value>,
    #[serde(default)]
    geometry: Value,
}

/// Fetches a provinces feature collection. Timeouts and HTTP errors are
/// fatal; there is no retry.
pub async fn fetch_features(url: &str) -> Result<Vec<GeoFeature>> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to fetch provinces GeoJSON from `{url}`"))?;

    if !response.status().is_success() {
        bail!(
            "failed to fetch provinces GeoJSON from `{}`: HTTP {}",
            url,
            response.status()
        );
    }

    let collection: RawCollection = response
        .json()
        .await
        .context("provinces GeoJSON is not valid JSON")?;

    Ok(collect_features(collection))
}

fn collect_features(collection: RawCollection) -> Vec<GeoFeature> {
    let mut features = Vec::with_capacity(collection.features.len());
    let mut skipped = 0usize;
    for raw in collection.features {
        match feature_name(&raw.properties) {
            Some(name) => features.push(GeoFeature::new(name.to_string(), raw.geometry)),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!("skipped {skipped} features with no recognisable name property");
    }
    features
}

fn feature_name(properties: &Map<String, Value>) -> Option<&str> {
    NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {

    use super::*;

    fn collection(json: &str) -> RawCollection {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn should_extract_names_and_normalise_eagerly() {
        let collection = collection(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"name": "Córdoba"}, "geometry": {"type": "Polygon", "coordinates": []}}
            ]}"#,
        );

        let features = collect_features(collection);

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].display_name, "Córdoba");
        assert_eq!(features[0].normalized, "cordoba");
        assert_eq!(features[0].geometry["type"], "Polygon");
    }

    #[test]
    fn should_try_name_keys_in_order() {
        let collection = collection(
            r#"{"features": [
                {"properties": {"NOMBRE": "Sevilla", "nom": "ignored"}},
                {"properties": {"prov_name": "Cádiz"}},
                {"properties": {"name": "Huelva", "NOMBRE": "ignored"}}
            ]}"#,
        );

        let features = collect_features(collection);

        assert_eq!(features[0].display_name, "Sevilla");
        assert_eq!(features[1].display_name, "Cádiz");
        assert_eq!(features[2].display_name, "Huelva");
    }

    #[test]
    fn should_skip_features_without_a_name() {
        let collection = collection(
            r#"{"features": [
                {"properties": {"id": 7}},
                {"properties": {"name": "Madrid"}},
                {"properties": {"name": 42}}
            ]}"#,
        );

        let features = collect_features(collection);

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].display_name, "Madrid");
    }

    #[test]
    fn should_handle_missing_features_array() {
        let features = collect_features(collection("{}"));

        assert!(features.is_empty());
    }
}
