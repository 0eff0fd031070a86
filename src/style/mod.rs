//! Earthquake symbology: marker encoding, legend, and fixed overlay styles.

mod encoder;
mod legend;

pub use encoder::{
    bucket_color, bucket_color_in, encode, marker_radius, ColorBucket, VisualEncoding,
    DEFAULT_COLOR, DEPTH_BUCKETS, MARKER_SCALE,
};
pub use legend::{build_legend, LegendEntry, LEGEND_SAMPLE_OFFSET};

use serde::Serialize;

/// Full Leaflet circle style for an earthquake marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerStyle {
    pub radius: f64,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub color: &'static str,
    pub stroke: bool,
    pub weight: f64,
}

impl From<VisualEncoding> for MarkerStyle {
    fn from(encoding: VisualEncoding) -> Self {
        Self {
            radius: encoding.radius,
            fill_color: encoding.fill_color,
            fill_opacity: 0.7,
            color: "black",
            stroke: true,
            weight: 0.5,
        }
    }
}

/// Line style for plate boundaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub weight: f64,
}

pub const PLATE_STYLE: LineStyle = LineStyle {
    color: "orange",
    weight: 2.0,
};
