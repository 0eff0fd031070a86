//! Askama template structs for the map page.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.

use std::collections::BTreeMap;

use askama::Template;

use super::assets;
use crate::feeds::FeedKind;
use crate::map::MapConfig;
use crate::render::{FeedStatus, RenderContext};
use crate::style::LegendEntry;
use crate::utils::script_json;

/// A feed that failed to load, shown in the status banner.
pub struct FailureRow {
    pub feed: &'static str,
    pub error: String,
}

impl FailureRow {
    pub fn from_statuses(statuses: &BTreeMap<FeedKind, FeedStatus>) -> Vec<Self> {
        statuses
            .iter()
            .filter_map(|(kind, status)| match status {
                FeedStatus::Failed { error } => Some(Self {
                    feed: kind.overlay_name(),
                    error: error.clone(),
                }),
                FeedStatus::Loaded { .. } => None,
            })
            .collect()
    }
}

/// The map page.
///
/// Served pages link the static assets and fetch overlays from the API.
/// Standalone pages inline the assets and the overlay data.
#[derive(Template)]
#[template(path = "map.html")]
pub struct MapTemplate<'a> {
    pub title: &'a str,
    pub legend: &'a [LegendEntry],
    /// `MapConfig` as script-safe JSON.
    pub config_json: String,
    /// Pre-fetched overlays as script-safe JSON.
    pub data_json: Option<String>,
    pub failures: Vec<FailureRow>,
    pub generated_at: Option<String>,
    pub inline_css: Option<&'a str>,
    pub inline_js: Option<&'a str>,
}

impl<'a> MapTemplate<'a> {
    /// A self-contained page with the layers of `ctx` inlined.
    pub fn standalone(
        ctx: &RenderContext,
        config: &MapConfig,
        legend: &'a [LegendEntry],
    ) -> serde_json::Result<Self> {
        let data = serde_json::json!({
            "earthquakes": ctx.earthquakes_geojson(),
            "plates": ctx.plates,
            "statuses": ctx.statuses,
        });

        Ok(Self {
            title: "Earthquakes",
            legend,
            config_json: script_json(config)?,
            data_json: Some(script_json(&data)?),
            failures: FailureRow::from_statuses(&ctx.statuses),
            generated_at: Some(ctx.generated_at.format("%Y-%m-%d %H:%M UTC").to_string()),
            inline_css: Some(assets::CSS),
            inline_js: Some(assets::JS),
        })
    }
}
