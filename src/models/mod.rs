//! Data models for the two GeoJSON feeds.

mod earthquake;
mod plates;

pub use earthquake::{EarthquakeEvent, FeatureError};
pub use plates::PlateBoundaries;

/// The `features` array of a GeoJSON FeatureCollection.
pub fn feature_array(collection: &serde_json::Value) -> Option<&Vec<serde_json::Value>> {
    collection.get("features").and_then(|f| f.as_array())
}
