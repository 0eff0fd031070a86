//! Map setup handed to the browser: base tile layers, overlays, initial view.
//!
//! The page script reads this as JSON and builds the Leaflet map, the layer
//! control and the overlays from it.

use serde::{Deserialize, Serialize};

use crate::feeds::FeedKind;
use crate::style::{LineStyle, PLATE_STYLE};

/// Initial map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    /// `[lat, lon]`
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: [9.8282, -28.5795],
            zoom: 3,
        }
    }
}

/// A base tile layer selectable in the layer control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<&'static str>,
    #[serde(skip_serializing_if = "no_subdomains")]
    pub subdomains: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<u8>,
}

fn no_subdomains(subdomains: &&[&str]) -> bool {
    subdomains.is_empty()
}

pub const STREET_MAP: TileLayer = TileLayer {
    name: "Street Map",
    url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: Some(
        "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors",
    ),
    subdomains: &[],
    max_zoom: None,
};

pub const SATELLITE: TileLayer = TileLayer {
    name: "Satellite",
    url: "https://{s}.google.com/vt/lyrs=s&x={x}&y={y}&z={z}",
    attribution: None,
    subdomains: &["mt0", "mt1", "mt2", "mt3"],
    max_zoom: Some(20),
};

pub const TOPOGRAPHIC: TileLayer = TileLayer {
    name: "Topographic",
    url: "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
    attribution: Some(
        "Map data: &copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors, \
         <a href=\"http://viewfinderpanoramas.org\">SRTM</a> | Map style: &copy; \
         <a href=\"https://opentopomap.org\">OpenTopoMap</a> \
         (<a href=\"https://creativecommons.org/licenses/by-sa/3.0/\">CC-BY-SA</a>)",
    ),
    subdomains: &[],
    max_zoom: None,
};

/// Base layers in layer-control order. The first is shown on load.
pub const BASE_LAYERS: [TileLayer; 3] = [STREET_MAP, SATELLITE, TOPOGRAPHIC];

/// An overlay in the layer control.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub key: FeedKind,
    pub name: &'static str,
    pub visible_on_load: bool,
}

/// Everything the page script needs to set up the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub view: MapView,
    pub base_layers: Vec<TileLayer>,
    pub overlays: Vec<Overlay>,
    pub plate_style: LineStyle,
    pub collapsed_control: bool,
}

impl MapConfig {
    pub fn new(view: MapView) -> Self {
        Self {
            view,
            base_layers: BASE_LAYERS.to_vec(),
            overlays: FeedKind::ALL
                .iter()
                .map(|kind| Overlay {
                    key: *kind,
                    name: kind.overlay_name(),
                    visible_on_load: *kind == FeedKind::Earthquakes,
                })
                .collect(),
            plate_style: PLATE_STYLE,
            collapsed_control: false,
        }
    }
}
