//! Earthquake events parsed from the USGS GeoJSON summary feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Problems with a single feature in the earthquake feed.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("feature has no geometry")]
    MissingGeometry,
    #[error("expected [lon, lat, depth] coordinates, got {0} values")]
    Coordinates(usize),
    #[error("malformed feature: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct QuakeFeature {
    properties: QuakeProperties,
    geometry: Option<PointGeometry>,
}

#[derive(Debug, Deserialize)]
struct QuakeProperties {
    #[serde(default)]
    place: Option<String>,
    time: i64,
    #[serde(default)]
    mag: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    coordinates: Vec<f64>,
}

/// One earthquake from the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarthquakeEvent {
    /// NaN when the feed reports no magnitude.
    pub magnitude: f64,
    pub depth_km: f64,
    pub place: String,
    pub time_millis: i64,
    pub longitude: f64,
    pub latitude: f64,
}

impl EarthquakeEvent {
    /// Parse one GeoJSON feature.
    pub fn from_feature(feature: &serde_json::Value) -> Result<Self, FeatureError> {
        let feature = QuakeFeature::deserialize(feature)?;
        let geometry = feature.geometry.ok_or(FeatureError::MissingGeometry)?;

        let [longitude, latitude, depth_km] = match geometry.coordinates.as_slice() {
            [lon, lat, depth, ..] => [*lon, *lat, *depth],
            other => return Err(FeatureError::Coordinates(other.len())),
        };

        Ok(Self {
            magnitude: feature.properties.mag.unwrap_or(f64::NAN),
            depth_km,
            place: feature.properties.place.unwrap_or_default(),
            time_millis: feature.properties.time,
            longitude,
            latitude,
        })
    }

    /// Event time, if the millisecond timestamp is representable.
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time_millis)
    }
}
