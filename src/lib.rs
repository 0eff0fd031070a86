//! quakemap - interactive web map of recent earthquakes and tectonic plates.
//!
//! Fetches the USGS earthquake feed and a plate-boundary feed, styles each
//! earthquake by magnitude and depth, and serves (or writes) a Leaflet page
//! with a legend and a layer-toggle control.

pub mod cli;
pub mod config;
pub mod feeds;
pub mod map;
pub mod models;
pub mod render;
pub mod server;
pub mod style;
pub mod utils;
