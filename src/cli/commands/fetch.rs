//! Feed inspection command.

use console::style;

use crate::config::Settings;
use crate::feeds::{FeedKind, FeedSource, HttpFeedSource};
use crate::render::EarthquakeLayer;

/// Fetch the earthquake feed and print each marker's encoding.
pub async fn cmd_fetch(settings: &Settings, limit: usize) -> anyhow::Result<()> {
    let source = HttpFeedSource::from_settings(settings)?;

    println!(
        "{} Fetching {}",
        style("→").cyan(),
        source.url(FeedKind::Earthquakes)
    );

    let collection = source.fetch(FeedKind::Earthquakes).await?;
    let layer = EarthquakeLayer::from_collection(&collection)
        .ok_or_else(|| anyhow::anyhow!("Earthquake feed is not a FeatureCollection"))?;

    let header = format!(
        "{:>6} {:>8} {:>10} {:<8}  {}",
        "Mag", "Depth", "Radius", "Color", "Place"
    );
    println!("{}", style(header).bold());

    let shown = if limit == 0 {
        layer.markers.len()
    } else {
        limit.min(layer.markers.len())
    };

    for marker in layer.markers.iter().take(shown) {
        println!(
            "{:>6.1} {:>8.1} {:>10.0} {:<8}  {}",
            marker.event.magnitude,
            marker.event.depth_km,
            marker.style.radius,
            marker.style.fill_color,
            if marker.event.place.is_empty() {
                "-"
            } else {
                &marker.event.place
            }
        );
    }

    println!();
    println!(
        "  {} {} markers ({} shown)",
        style("✓").green(),
        layer.markers.len(),
        shown
    );
    if layer.skipped() > 0 {
        println!(
            "  {} {} skipped ({} invalid, {} degenerate)",
            style("!").yellow(),
            layer.skipped(),
            layer.invalid,
            layer.degenerate
        );
    }

    Ok(())
}
