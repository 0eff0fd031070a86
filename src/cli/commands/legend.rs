//! Legend command.

use console::style;

use crate::style::{build_legend, DEPTH_BUCKETS};

/// Print the depth legend with colored swatches.
pub fn cmd_legend() -> anyhow::Result<()> {
    println!("{}", style("Depth (km)").bold());
    for entry in build_legend(&DEPTH_BUCKETS) {
        println!("  {} {:<8} {}", style("■").color256(swatch(entry.color)), entry.label, entry.color);
    }
    Ok(())
}

/// Nearest xterm-256 cube color for a `#RRGGBB` hex string.
fn swatch(hex: &str) -> u8 {
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    let level = |v: u8| ((u16::from(v) * 5 + 127) / 255) as u8;
    16 + 36 * level(channel(1)) + 6 * level(channel(3)) + level(channel(5))
}
