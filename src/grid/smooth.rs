//! Bounding the width ratio of neighboring cells.

use log::debug;

use crate::constants::MAX_WIDTH_RATIO;
use crate::error::{GridError, Result};
use crate::math_utils::midpoint;

#[derive(Debug, Clone)]
pub struct Smoothed {
    pub edges: Vec<f64>,
    pub inserted: usize,
}

/// Split cells until no cell is more than `MAX_WIDTH_RATIO` times as wide
/// as its neighbor.
///
/// Triples of edges are scanned left to right and the wider cell of the
/// first offending pair is split at its midpoint. After a split the scan
/// resumes at the first triple that contains the split cell: every triple
/// left of it is unchanged and already passed, so this finds the same next
/// violation a scan from the start would.
pub fn smooth(edges: Vec<f64>, max_points: usize) -> Result<Smoothed> {
    let mut x = edges;
    let mut inserted = 0;
    let mut i = 0;

    while i + 2 < x.len() {
        let ratio = (x[i + 1] - x[i]) / (x[i + 2] - x[i + 1]);
        let split = if ratio > MAX_WIDTH_RATIO {
            i
        } else if ratio < 1.0 / MAX_WIDTH_RATIO {
            i + 1
        } else {
            i += 1;
            continue;
        };

        let xmid = midpoint(x[split], x[split + 1]);
        if !(xmid > x[split] && xmid < x[split + 1]) || x.len() >= max_points {
            return Err(GridError::SmoothingDiverged {
                insertions: inserted,
                points: x.len(),
            });
        }
        x.insert(split + 1, xmid);
        inserted += 1;
        i = split.saturating_sub(1);
    }

    debug!("smoothing inserted {} points, {} total", inserted, x.len());
    Ok(Smoothed { edges: x, inserted })
}

/// Largest neighboring width ratio, taken both ways (always `>= 1`).
pub fn max_width_ratio(edges: &[f64]) -> f64 {
    edges
        .windows(3)
        .map(|w| {
            let ratio = (w[1] - w[0]) / (w[2] - w[1]);
            ratio.max(1.0 / ratio)
        })
        .fold(1.0, f64::max)
}
