//! Standalone map render command.

use std::path::PathBuf;
use std::time::Duration;

use askama::Template;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::feeds::HttpFeedSource;
use crate::map::MapConfig;
use crate::render::{FeedStatus, RenderContext};
use crate::server::template_structs::MapTemplate;
use crate::style::{build_legend, DEPTH_BUCKETS};

/// Fetch both feeds and write the map as a single HTML file.
pub async fn cmd_render(settings: &Settings, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| settings.output_path.clone());
    let source = HttpFeedSource::from_settings(settings)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Fetching earthquake and plate feeds...");
    pb.enable_steady_tick(Duration::from_millis(100));

    let ctx = RenderContext::load(&source).await;
    pb.finish_and_clear();

    for (kind, status) in &ctx.statuses {
        match status {
            FeedStatus::Loaded { features, skipped } if *skipped > 0 => println!(
                "  {} {}: {} features ({} skipped)",
                style("✓").green(),
                kind.overlay_name(),
                features,
                skipped
            ),
            FeedStatus::Loaded { features, .. } => println!(
                "  {} {}: {} features",
                style("✓").green(),
                kind.overlay_name(),
                features
            ),
            FeedStatus::Failed { error } => eprintln!(
                "  {} {}: {}",
                style("✗").red(),
                kind.overlay_name(),
                error
            ),
        }
    }

    let legend = build_legend(&DEPTH_BUCKETS);
    let config = MapConfig::new(settings.map_view);
    let html = MapTemplate::standalone(&ctx, &config, &legend)?.render()?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&output, html).await?;

    println!(
        "{} Wrote {}",
        style("→").cyan(),
        style(output.display()).bold()
    );

    if ctx.statuses.values().all(|s| !s.is_loaded()) {
        anyhow::bail!("No feeds could be loaded");
    }
    Ok(())
}
