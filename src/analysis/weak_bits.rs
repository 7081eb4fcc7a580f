/// Weak-bit detection by cross-revolution timing dispersion

use crate::analysis::stats::{mean, variance};
use crate::flux::Track;
use crate::format::constants::WEAK_BIT_DISPERSION;
use tracing::debug;

/// Find sample positions whose timing disagrees between revolutions
///
/// Positions run over the shortest revolution and index the per-revolution
/// sample sequence. A position is weak when the population variance of its
/// deltas divided by their mean exceeds the dispersion threshold. Must be
/// run on the captured revolutions, not on a consensus revolution.
pub fn detect_weak_bits(track: &Track) -> Vec<usize> {
    let revolutions = track.revolutions();
    if revolutions.len() < 2 {
        return Vec::new();
    }

    let mut weak_positions = Vec::new();
    let mut deltas = Vec::with_capacity(revolutions.len());

    for i in 0..track.shortest_revolution() {
        deltas.clear();
        deltas.extend(revolutions.iter().map(|r| r.samples()[i].delta_ns));

        let m = mean(&deltas);
        if m > 0.0 && variance(&deltas) / m > WEAK_BIT_DISPERSION {
            weak_positions.push(i);
        }
    }

    if !weak_positions.is_empty() {
        debug!("Found {} weak bits", weak_positions.len());
    }

    weak_positions
}
