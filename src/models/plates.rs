//! Tectonic plate boundary collection.

use serde::Serialize;

use super::feature_array;

/// Plate boundaries as fetched; geometry is passed to the map untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlateBoundaries(serde_json::Value);

impl PlateBoundaries {
    /// Wrap a FeatureCollection. Returns `None` if it has no `features` array.
    pub fn from_collection(collection: serde_json::Value) -> Option<Self> {
        feature_array(&collection)?;
        Some(Self(collection))
    }

    pub fn feature_count(&self) -> usize {
        feature_array(&self.0).map(Vec::len).unwrap_or(0)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}
