//! Legend entries for the depth color buckets.

use serde::Serialize;

use super::encoder::{bucket_color, ColorBucket};

/// Offset added to a bucket's lower bound when sampling its legend color.
pub const LEGEND_SAMPLE_OFFSET: f64 = 1.0;

/// One swatch in the map legend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: &'static str,
    #[serde(rename = "rangeLabel")]
    pub label: String,
}

/// Build legend entries, one per bucket, in bucket order.
///
/// Labels run from each lower bound to the next one (`"1–2.5"`); the last
/// bucket is open-ended (`"8+"`). Swatch colors are sampled from the encoder
/// at `lower + LEGEND_SAMPLE_OFFSET`, not read from the bucket itself.
pub fn build_legend(buckets: &[ColorBucket]) -> Vec<LegendEntry> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, bucket)| {
            let label = match buckets.get(i + 1) {
                Some(next) => format!("{}–{}", bucket.lower, next.lower),
                None => format!("{}+", bucket.lower),
            };
            LegendEntry {
                color: bucket_color(bucket.lower + LEGEND_SAMPLE_OFFSET),
                label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::encoder::DEPTH_BUCKETS;

    #[test]
    fn test_legend_has_entry_per_bucket() {
        let legend = build_legend(&DEPTH_BUCKETS);
        assert_eq!(legend.len(), 5);
        assert!(legend.iter().all(|entry| !entry.label.is_empty()));
        assert!(legend.last().unwrap().label.ends_with('+'));
    }

    #[test]
    fn test_legend_labels() {
        let labels: Vec<_> = build_legend(&DEPTH_BUCKETS)
            .into_iter()
            .map(|entry| entry.label)
            .collect();
        assert_eq!(labels, vec!["1–2.5", "2.5–4", "4–5.5", "5.5–8", "8+"]);
    }

    #[test]
    fn test_legend_colors_match_buckets_for_fixed_table() {
        let legend = build_legend(&DEPTH_BUCKETS);
        for (entry, bucket) in legend.iter().zip(DEPTH_BUCKETS.iter()) {
            assert_eq!(entry.color, bucket.color);
        }
    }

    #[test]
    fn test_legend_samples_encoder_not_bucket_color() {
        // A bucket whose own color differs from what the encoder returns at lower + 1.
        let buckets = [ColorBucket::new(1.0, 2.0, "#000000")];
        let legend = build_legend(&buckets);
        assert_eq!(legend[0].color, "#0071BC");
        assert_eq!(legend[0].label, "1+");
    }

    #[test]
    fn test_empty_legend() {
        assert!(build_legend(&[]).is_empty());
    }
}
