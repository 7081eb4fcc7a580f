/// Track quality scoring

use crate::analysis::stats::{counts_as_f64, mean, variance};
use crate::analysis::TrackDiagnostics;
use crate::flux::Track;
use crate::format::constants::NOMINAL_RPM;

/// Points lost per RPM of deviation, per revolution
const RPM_PENALTY: f64 = 0.5;
/// Points lost per warning
const WARNING_PENALTY: f64 = 5.0;
/// Points lost per weak position
const WEAK_BIT_PENALTY: f64 = 0.1;
/// Multiplier on the sample-count dispersion between revolutions
const CONSISTENCY_PENALTY: f64 = 10.0;

/// Score a track from 0 to 100
///
/// Speed deviation is summed over every revolution, not averaged. The
/// sample-count term uses the population variance over the mean and only
/// applies with more than one revolution.
pub fn calculate_quality(track: &Track, diagnostics: &TrackDiagnostics) -> f64 {
    let mut score = 100.0;

    for rev in track.revolutions() {
        score -= (NOMINAL_RPM - rev.rpm).abs() * RPM_PENALTY;
    }

    score -= diagnostics.warnings.len() as f64 * WARNING_PENALTY;
    score -= diagnostics.weak_bits.len() as f64 * WEAK_BIT_PENALTY;

    if track.revolution_count() > 1 {
        let counts = counts_as_f64(&track.sample_counts());
        let m = mean(&counts);
        let dispersion = if m > 0.0 { variance(&counts) / m } else { 0.0 };
        score -= dispersion * CONSISTENCY_PENALTY;
    }

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TrackWarning;
    use crate::flux::{Revolution, Sample};

    fn revolution(rpm: f64, count: usize) -> Revolution {
        let samples = (0..count).map(|i| Sample::with_delta(i as u32, 2000.0)).collect();
        let mut rev = Revolution::new(0, 0, samples);
        rev.rpm = rpm;
        rev
    }

    #[test]
    fn test_perfect_track() {
        let track = Track::with_revolutions(0, 0, vec![revolution(300.0, 10)]);
        assert_eq!(calculate_quality(&track, &TrackDiagnostics::default()), 100.0);
    }

    #[test]
    fn test_penalties_add_up() {
        let track = Track::with_revolutions(0, 0, vec![revolution(302.0, 10)]);
        let diagnostics = TrackDiagnostics {
            warnings: vec![TrackWarning::LowDensity { revolution: 0, count: 10 }],
            weak_bits: vec![1, 2, 3, 4, 5],
        };
        // 100 - 1.0 - 5.0 - 0.5
        let score = calculate_quality(&track, &diagnostics);
        assert!((score - 93.5).abs() < 1e-9);
    }

    #[test]
    fn test_speed_penalty_summed_per_revolution() {
        let track = Track::with_revolutions(0, 0, vec![revolution(290.0, 10), revolution(310.0, 10)]);
        assert_eq!(calculate_quality(&track, &TrackDiagnostics::default()), 90.0);
    }

    #[test]
    fn test_count_dispersion_penalty() {
        let track = Track::with_revolutions(0, 0, vec![revolution(300.0, 90), revolution(300.0, 110)]);
        // variance 100, mean 100 -> 1.0 * 10
        assert_eq!(calculate_quality(&track, &TrackDiagnostics::default()), 90.0);
    }

    #[test]
    fn test_clamped_at_zero() {
        let track = Track::with_revolutions(0, 0, vec![revolution(0.0, 1)]);
        assert_eq!(calculate_quality(&track, &TrackDiagnostics::default()), 0.0);
    }

    #[test]
    fn test_empty_track_scores_full() {
        assert_eq!(calculate_quality(&Track::new(0, 0), &TrackDiagnostics::default()), 100.0);
    }
}
