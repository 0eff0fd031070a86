//! Magnitude and depth to marker encoding.
//!
//! Marker radius scales linearly with magnitude. Fill color comes from a
//! fixed table of depth buckets scanned in declaration order.

use serde::Serialize;

use crate::models::EarthquakeEvent;

/// Marker radius in meters per unit of magnitude.
pub const MARKER_SCALE: f64 = 20_000.0;

/// Fill color for depths outside every finite bucket.
pub const DEFAULT_COLOR: &str = "#E2FFAE";

/// A depth range mapped to one fill color.
///
/// Both bounds are inclusive, so adjacent buckets share an endpoint. The
/// earlier bucket in the table wins at the shared value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorBucket {
    pub lower: f64,
    pub upper: f64,
    pub color: &'static str,
}

impl ColorBucket {
    pub const fn new(lower: f64, upper: f64, color: &'static str) -> Self {
        Self {
            lower,
            upper,
            color,
        }
    }

    /// Inclusive on both ends. NaN never matches.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }
}

/// Finite depth buckets in ascending order. Anything else gets [`DEFAULT_COLOR`].
pub const DEPTH_BUCKETS: [ColorBucket; 5] = [
    ColorBucket::new(1.0, 2.5, "#0071BC"),
    ColorBucket::new(2.5, 4.0, "#35BC00"),
    ColorBucket::new(4.0, 5.5, "#BCBC00"),
    ColorBucket::new(5.5, 8.0, "#BC3500"),
    ColorBucket::new(8.0, 20.0, "#BC0000"),
];

/// Visual encoding of one earthquake.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEncoding {
    pub radius: f64,
    pub fill_color: &'static str,
}

impl VisualEncoding {
    /// A marker that cannot be drawn (zero, negative or NaN radius).
    pub fn is_degenerate(&self) -> bool {
        !(self.radius.is_finite() && self.radius > 0.0)
    }
}

/// Marker radius for a magnitude. Not clamped.
pub fn marker_radius(magnitude: f64) -> f64 {
    magnitude * MARKER_SCALE
}

/// Fill color for a depth using the fixed bucket table.
pub fn bucket_color(depth_km: f64) -> &'static str {
    bucket_color_in(&DEPTH_BUCKETS, depth_km)
}

/// First bucket in `buckets` containing `value`, or [`DEFAULT_COLOR`].
pub fn bucket_color_in(buckets: &[ColorBucket], value: f64) -> &'static str {
    buckets
        .iter()
        .find(|bucket| bucket.contains(value))
        .map(|bucket| bucket.color)
        .unwrap_or(DEFAULT_COLOR)
}

/// Encode an event's magnitude and depth.
pub fn encode(event: &EarthquakeEvent) -> VisualEncoding {
    VisualEncoding {
        radius: marker_radius(event.magnitude),
        fill_color: bucket_color(event.depth_km),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(magnitude: f64, depth_km: f64) -> EarthquakeEvent {
        EarthquakeEvent {
            magnitude,
            depth_km,
            place: "test".to_string(),
            time_millis: 0,
            longitude: 0.0,
            latitude: 0.0,
        }
    }

    #[test]
    fn test_marker_radius_scales_magnitude() {
        assert_eq!(marker_radius(4.5), 90_000.0);
        assert_eq!(marker_radius(0.0), 0.0);
        assert_eq!(marker_radius(-1.0), -20_000.0);
    }

    #[test]
    fn test_marker_radius_monotonic() {
        let mut previous = marker_radius(0.0);
        for step in 1..=100 {
            let radius = marker_radius(step as f64 * 0.1);
            assert!(radius >= previous);
            previous = radius;
        }
    }

    #[test]
    fn test_bucket_color_out_of_range_uses_default() {
        assert_eq!(bucket_color(-5.0), DEFAULT_COLOR);
        assert_eq!(bucket_color(25.0), DEFAULT_COLOR);
        assert_eq!(bucket_color(0.5), DEFAULT_COLOR);
        assert_eq!(bucket_color(f64::NAN), DEFAULT_COLOR);
    }

    #[test]
    fn test_bucket_color_shared_boundary_prefers_earlier_bucket() {
        assert_eq!(bucket_color(2.5), "#0071BC");
        assert_eq!(bucket_color(4.0), "#35BC00");
        assert_eq!(bucket_color(5.5), "#BCBC00");
        assert_eq!(bucket_color(8.0), "#BC3500");
    }

    #[test]
    fn test_bucket_color_inclusive_outer_bounds() {
        assert_eq!(bucket_color(1.0), "#0071BC");
        assert_eq!(bucket_color(20.0), "#BC0000");
        assert_eq!(bucket_color(20.001), DEFAULT_COLOR);
    }

    #[test]
    fn test_buckets_contiguous_and_ascending() {
        for pair in DEPTH_BUCKETS.windows(2) {
            assert!(pair[0].lower < pair[1].lower);
            assert_eq!(pair[0].upper, pair[1].lower);
        }
    }

    #[test]
    fn test_encode_shallow_event() {
        let encoding = encode(&event(3.0, 3.0));
        assert_eq!(encoding.radius, 60_000.0);
        assert_eq!(encoding.fill_color, "#35BC00");
        assert!(!encoding.is_degenerate());
    }

    #[test]
    fn test_encode_deep_event() {
        let encoding = encode(&event(9.0, 700.0));
        assert_eq!(encoding.radius, 180_000.0);
        assert_eq!(encoding.fill_color, DEFAULT_COLOR);
    }

    #[test]
    fn test_degenerate_encodings() {
        assert!(encode(&event(0.0, 5.0)).is_degenerate());
        assert!(encode(&event(-0.4, 5.0)).is_degenerate());
        assert!(encode(&event(f64::NAN, 5.0)).is_degenerate());
    }
}
