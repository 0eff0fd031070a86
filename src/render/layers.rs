//! Overlay layers built from fetched feeds.

use chrono::SecondsFormat;
use serde::Serialize;
use serde_json::json;

use crate::models::{feature_array, EarthquakeEvent, PlateBoundaries};
use crate::style::{encode, LineStyle, MarkerStyle, VisualEncoding, PLATE_STYLE};
use crate::utils::html_escape;

/// One earthquake with its marker style and popup.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledMarker {
    pub event: EarthquakeEvent,
    pub style: MarkerStyle,
    pub popup: String,
}

impl StyledMarker {
    pub fn new(event: EarthquakeEvent, encoding: VisualEncoding) -> Self {
        let style = MarkerStyle::from(encoding);
        let popup = popup_html(&event);
        Self {
            event,
            style,
            popup,
        }
    }

    /// GeoJSON Point feature carrying the style and popup in its properties.
    pub fn to_feature(&self) -> serde_json::Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [self.event.longitude, self.event.latitude, self.event.depth_km],
            },
            "properties": {
                "place": self.event.place,
                "time": self.event.time_millis,
                "mag": self.event.magnitude,
                "depth": self.event.depth_km,
                "style": self.style,
                "popup": self.popup,
            },
        })
    }
}

/// Popup body: location, date, magnitude and depth.
pub fn popup_html(event: &EarthquakeEvent) -> String {
    let date = event
        .time()
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| event.time_millis.to_string());

    format!(
        "<h3>Location: {}</h3><hr><p>Date: {}</p><p>Magnitude: {}</p><p>Depth: {}</p>",
        html_escape(&event.place),
        date,
        event.magnitude,
        event.depth_km
    )
}

/// Outcome of turning a feature collection into markers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarthquakeLayer {
    pub markers: Vec<StyledMarker>,
    /// Features that could not be parsed.
    pub invalid: usize,
    /// Features that parsed but produced an undrawable marker.
    pub degenerate: usize,
}

impl EarthquakeLayer {
    /// Parse and style every feature. Bad features are counted, not fatal.
    ///
    /// Returns `None` if `collection` is not a FeatureCollection.
    pub fn from_collection(collection: &serde_json::Value) -> Option<Self> {
        let features = feature_array(collection)?;
        let mut layer = Self::default();

        for feature in features {
            let event = match EarthquakeEvent::from_feature(feature) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(
                        id = feature.get("id").and_then(|v| v.as_str()).unwrap_or("?"),
                        "Skipping earthquake feature: {}",
                        e
                    );
                    layer.invalid += 1;
                    continue;
                }
            };

            let encoding = encode(&event);
            if encoding.is_degenerate() {
                layer.degenerate += 1;
                continue;
            }
            layer.markers.push(StyledMarker::new(event, encoding));
        }

        if layer.degenerate > 0 {
            tracing::debug!(count = layer.degenerate, "Dropped degenerate markers");
        }

        Some(layer)
    }

    pub fn skipped(&self) -> usize {
        self.invalid + self.degenerate
    }

    pub fn to_feature_collection(&self) -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": self.markers.iter().map(StyledMarker::to_feature).collect::<Vec<_>>(),
        })
    }
}

/// Plate boundaries with their line style.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlateLayer {
    pub boundaries: PlateBoundaries,
    pub style: LineStyle,
}

impl PlateLayer {
    pub fn new(boundaries: PlateBoundaries) -> Self {
        Self {
            boundaries,
            style: PLATE_STYLE,
        }
    }
}
