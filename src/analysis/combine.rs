/// Multi-revolution consensus combination

use crate::analysis::stats::median;
use crate::flux::{Revolution, Track, CONSENSUS_ORDINAL};
use tracing::debug;

/// Fuse every revolution of a normalized track into one consensus revolution
///
/// Revolution 0 fixes the positions. At each position the sample whose delta
/// is closest to the median of all revolutions' deltas at that position is
/// taken; ties go to the earliest revolution. Shorter revolutions simply
/// drop out of positions they do not reach. A single revolution is returned
/// unchanged, and an empty track yields an empty consensus revolution.
pub fn combine_revolutions(track: &Track) -> Revolution {
    let revolutions = track.revolutions();
    match revolutions {
        [] => return Revolution::new(CONSENSUS_ORDINAL, 0, Vec::new()),
        [only] => return only.clone(),
        _ => {}
    }

    debug!("Combining {} revolutions", revolutions.len());

    let reference = &revolutions[0];
    let mut best = reference.samples().to_vec();

    for (i, slot) in best.iter_mut().enumerate() {
        let candidates: Vec<_> = revolutions
            .iter()
            .filter_map(|rev| rev.samples().get(i))
            .collect();
        if candidates.len() < 2 {
            continue;
        }

        let deltas: Vec<f64> = candidates.iter().map(|c| c.delta_ns).collect();
        let mid = median(&deltas);

        let mut chosen = candidates[0];
        let mut chosen_distance = (chosen.delta_ns - mid).abs();
        for &candidate in &candidates[1..] {
            let distance = (candidate.delta_ns - mid).abs();
            if distance < chosen_distance {
                chosen = candidate;
                chosen_distance = distance;
            }
        }
        *slot = *chosen;
    }

    let mut combined = Revolution::new(CONSENSUS_ORDINAL, reference.index_ticks, best);
    combined.duration_ns = reference.duration_ns;
    combined.rpm = reference.rpm;
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::Sample;

    fn revolution(ordinal: u8, deltas: &[f64]) -> Revolution {
        let samples = deltas
            .iter()
            .enumerate()
            .map(|(i, &d)| Sample::with_delta(i as u32 * 10 + ordinal as u32, d))
            .collect();
        let mut rev = Revolution::new(ordinal, 1000 + ordinal as u32, samples);
        rev.rpm = 300.0 + ordinal as f64;
        rev.duration_ns = 200_000_000.0;
        rev
    }

    #[test]
    fn test_single_revolution_unchanged() {
        let rev = revolution(0, &[100.0, 200.0]);
        let track = Track::with_revolutions(0, 0, vec![rev.clone()]);
        assert_eq!(combine_revolutions(&track), rev);
    }

    #[test]
    fn test_closest_to_median_wins() {
        let track = Track::with_revolutions(
            0,
            0,
            vec![
                revolution(0, &[100.0]),
                revolution(1, &[102.0]),
                revolution(2, &[200.0]),
            ],
        );
        let combined = combine_revolutions(&track);
        assert_eq!(combined.samples()[0].delta_ns, 102.0);
        // the whole sample is taken from revolution 1
        assert_eq!(combined.samples()[0].tick, 1);
    }

    #[test]
    fn test_tie_goes_to_first_revolution() {
        let track = Track::with_revolutions(
            0,
            0,
            vec![revolution(0, &[100.0]), revolution(1, &[200.0])],
        );
        assert_eq!(combine_revolutions(&track).samples()[0].delta_ns, 100.0);
    }

    #[test]
    fn test_shorter_revolutions_drop_out() {
        let track = Track::with_revolutions(
            0,
            0,
            vec![
                revolution(0, &[100.0, 300.0, 500.0]),
                revolution(1, &[110.0, 900.0]),
                revolution(2, &[112.0]),
            ],
        );
        let combined = combine_revolutions(&track);
        assert_eq!(combined.deltas(), vec![110.0, 300.0, 500.0]);
    }

    #[test]
    fn test_consensus_keeps_reference_timing() {
        let track = Track::with_revolutions(
            0,
            0,
            vec![revolution(0, &[100.0]), revolution(1, &[100.0])],
        );
        let combined = combine_revolutions(&track);
        assert!(combined.is_consensus());
        assert_eq!(combined.index_ticks, 1000);
        assert_eq!(combined.rpm, 300.0);
        assert_eq!(combined.duration_ns, 200_000_000.0);
        assert_eq!(combined.sample_count(), 1);
    }

    #[test]
    fn test_empty_track() {
        let combined = combine_revolutions(&Track::new(0, 0));
        assert!(combined.is_consensus());
        assert!(combined.is_empty());
    }
}
