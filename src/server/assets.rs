//! Static asset constants (CSS and JavaScript).

/// Stylesheet for the map page.
pub const CSS: &str = include_str!("static/style.css");

/// Builds the Leaflet map from the page config and loads the overlays.
pub const JS: &str = include_str!("static/map.js");
