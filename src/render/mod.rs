//! Render context: the layers and feed statuses for one map render.
//!
//! Both feeds are fetched concurrently. Each result is handed to its own
//! completion handler, which fills in that layer or records the failure.
//! A failed feed leaves its layer empty; the other is unaffected.

mod layers;

pub use layers::{popup_html, EarthquakeLayer, PlateLayer, StyledMarker};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::feeds::{FeedError, FeedKind, FeedSource};
use crate::models::PlateBoundaries;

/// Result of loading one feed, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FeedStatus {
    Loaded { features: usize, skipped: usize },
    Failed { error: String },
}

impl FeedStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Layers and statuses for one render pass.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub earthquakes: Option<EarthquakeLayer>,
    pub plates: Option<PlateLayer>,
    pub statuses: BTreeMap<FeedKind, FeedStatus>,
    pub generated_at: DateTime<Utc>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            earthquakes: None,
            plates: None,
            statuses: BTreeMap::new(),
            generated_at: Utc::now(),
        }
    }

    /// Fetch both feeds concurrently and build the layers.
    pub async fn load(source: &dyn FeedSource) -> Self {
        let (earthquakes, plates) = tokio::join!(
            source.fetch(FeedKind::Earthquakes),
            source.fetch(FeedKind::TectonicPlates)
        );

        let mut ctx = Self::new();
        ctx.on_earthquakes(earthquakes);
        ctx.on_plates(plates);
        ctx
    }

    /// Completion handler for the earthquake feed.
    pub fn on_earthquakes(&mut self, result: Result<serde_json::Value, FeedError>) {
        let layer = result.and_then(|collection| {
            EarthquakeLayer::from_collection(&collection).ok_or(FeedError::NotACollection)
        });

        match layer {
            Ok(layer) => {
                tracing::info!(
                    markers = layer.markers.len(),
                    skipped = layer.skipped(),
                    "Earthquake layer ready"
                );
                self.statuses.insert(
                    FeedKind::Earthquakes,
                    FeedStatus::Loaded {
                        features: layer.markers.len(),
                        skipped: layer.skipped(),
                    },
                );
                self.earthquakes = Some(layer);
            }
            Err(e) => self.fail(FeedKind::Earthquakes, e),
        }
    }

    /// Completion handler for the plate boundary feed.
    pub fn on_plates(&mut self, result: Result<serde_json::Value, FeedError>) {
        let boundaries = result.and_then(|collection| {
            PlateBoundaries::from_collection(collection).ok_or(FeedError::NotACollection)
        });

        match boundaries {
            Ok(boundaries) => {
                let features = boundaries.feature_count();
                tracing::info!(features, "Plate layer ready");
                self.statuses.insert(
                    FeedKind::TectonicPlates,
                    FeedStatus::Loaded {
                        features,
                        skipped: 0,
                    },
                );
                self.plates = Some(PlateLayer::new(boundaries));
            }
            Err(e) => self.fail(FeedKind::TectonicPlates, e),
        }
    }

    fn fail(&mut self, kind: FeedKind, error: FeedError) {
        tracing::warn!(feed = %kind, "Feed failed: {}", error);
        match kind {
            FeedKind::Earthquakes => self.earthquakes = None,
            FeedKind::TectonicPlates => self.plates = None,
        }
        self.statuses.insert(
            kind,
            FeedStatus::Failed {
                error: error.to_string(),
            },
        );
    }

    /// Feeds that failed, with their error messages.
    pub fn failures(&self) -> Vec<(FeedKind, &str)> {
        self.statuses
            .iter()
            .filter_map(|(kind, status)| match status {
                FeedStatus::Failed { error } => Some((*kind, error.as_str())),
                FeedStatus::Loaded { .. } => None,
            })
            .collect()
    }

    /// Earthquake layer as a styled FeatureCollection (empty if not loaded).
    pub fn earthquakes_geojson(&self) -> serde_json::Value {
        self.earthquakes
            .as_ref()
            .map(EarthquakeLayer::to_feature_collection)
            .unwrap_or_else(|| EarthquakeLayer::default().to_feature_collection())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct FixedSource;

    #[async_trait]
    impl FeedSource for FixedSource {
        async fn fetch(&self, kind: FeedKind) -> Result<serde_json::Value, FeedError> {
            match kind {
                FeedKind::Earthquakes => Ok(json!({
                    "type": "FeatureCollection",
                    "features": [{
                        "type": "Feature",
                        "properties": { "mag": 9.0, "place": "deep", "time": 0 },
                        "geometry": { "type": "Point", "coordinates": [0.0, 0.0, 700.0] }
                    }]
                })),
                FeedKind::TectonicPlates => Err(FeedError::Status {
                    url: "https://example.com/plates.json".to_string(),
                    status: 404,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_load_keeps_good_layer_when_other_fails() {
        let ctx = RenderContext::load(&FixedSource).await;

        let quakes = ctx.earthquakes.as_ref().unwrap();
        assert_eq!(quakes.markers.len(), 1);
        assert_eq!(quakes.markers[0].style.radius, 180_000.0);
        assert_eq!(quakes.markers[0].style.fill_color, crate::style::DEFAULT_COLOR);

        assert!(ctx.plates.is_none());
        assert_eq!(
            ctx.statuses[&FeedKind::Earthquakes],
            FeedStatus::Loaded {
                features: 1,
                skipped: 0
            }
        );
        let failures = ctx.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, FeedKind::TectonicPlates);
        assert!(failures[0].1.contains("404"));
    }

    #[test]
    fn test_non_collection_is_a_failure() {
        let mut ctx = RenderContext::new();
        ctx.on_earthquakes(Ok(json!({"type": "Feature"})));
        assert!(ctx.earthquakes.is_none());
        assert!(!ctx.statuses[&FeedKind::Earthquakes].is_loaded());
        assert_eq!(ctx.earthquakes_geojson()["features"], json!([]));
    }

    #[test]
    fn test_plates_loaded() {
        let mut ctx = RenderContext::new();
        ctx.on_plates(Ok(json!({
            "type": "FeatureCollection",
            "features": [{ "type": "Feature", "properties": {}, "geometry": null }]
        })));
        assert!(ctx.plates.is_some());
        assert_eq!(
            ctx.statuses[&FeedKind::TectonicPlates],
            FeedStatus::Loaded {
                features: 1,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_status_json() {
        let loaded = serde_json::to_value(FeedStatus::Loaded {
            features: 3,
            skipped: 1,
        })
        .unwrap();
        assert_eq!(loaded, json!({"state": "loaded", "features": 3, "skipped": 1}));

        let failed = serde_json::to_value(FeedStatus::Failed {
            error: "boom".to_string(),
        })
        .unwrap();
        assert_eq!(failed, json!({"state": "failed", "error": "boom"}));
    }
}
