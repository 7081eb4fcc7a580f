/// Statistical anomaly scan over a normalized track

use crate::analysis::stats::median;
use crate::flux::Track;
use crate::format::constants::*;

/// An anomaly found in one revolution
#[derive(Debug, Clone, PartialEq)]
pub enum TrackWarning {
    /// Revolution speed outside the acceptable window
    AbnormalSpeed {
        /// Revolution ordinal
        revolution: u8,
        /// Measured speed
        rpm: f64,
    },
    /// Fewer transitions than the format should produce
    LowDensity {
        /// Revolution ordinal
        revolution: u8,
        /// Transitions captured
        count: usize,
    },
    /// A delta far from the revolution's median
    TimingAnomaly {
        /// Revolution ordinal
        revolution: u8,
        /// Position within the revolution's positive deltas
        index: usize,
    },
}

impl std::fmt::Display for TrackWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackWarning::AbnormalSpeed { revolution, rpm } => {
                write!(f, "Rev {}: abnormal speed {:.1} RPM", revolution, rpm)
            }
            TrackWarning::LowDensity { revolution, count } => {
                write!(f, "Rev {}: too few flux transitions ({})", revolution, count)
            }
            TrackWarning::TimingAnomaly { revolution, index } => {
                write!(f, "Rev {}: timing anomaly at sample {}", revolution, index)
            }
        }
    }
}

/// Scan a normalized track for anomalies
///
/// Per revolution, in order: a speed check, a density check against the
/// classified format, then one warning per outlying delta. Outlier indices
/// count positive deltas only, so they are offsets into that filtered
/// sequence rather than raw sample positions.
pub fn detect_errors(track: &Track) -> Vec<TrackWarning> {
    let mut warnings = Vec::new();
    let expected_flux = track.format.expected_flux() as f64;

    for rev in track.revolutions() {
        if rev.rpm < RPM_MIN || rev.rpm > RPM_MAX {
            warnings.push(TrackWarning::AbnormalSpeed {
                revolution: rev.ordinal,
                rpm: rev.rpm,
            });
        }

        if (rev.sample_count() as f64) < expected_flux * MIN_DENSITY_FRACTION {
            warnings.push(TrackWarning::LowDensity {
                revolution: rev.ordinal,
                count: rev.sample_count(),
            });
        }

        let deltas = rev.positive_deltas();
        if deltas.is_empty() {
            continue;
        }
        let mid = median(&deltas);
        for (index, &delta) in deltas.iter().enumerate() {
            if delta > mid * OUTLIER_HIGH_FACTOR || delta < mid * OUTLIER_LOW_FACTOR {
                warnings.push(TrackWarning::TimingAnomaly {
                    revolution: rev.ordinal,
                    index,
                });
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::{Revolution, Sample};
    use crate::format::DiskFormat;

    fn revolution(ordinal: u8, rpm: f64, deltas: &[f64]) -> Revolution {
        let samples = deltas
            .iter()
            .enumerate()
            .map(|(i, &d)| Sample::with_delta(i as u32, d))
            .collect();
        let mut rev = Revolution::new(ordinal, 0, samples);
        rev.rpm = rpm;
        rev
    }

    fn dense(ordinal: u8, rpm: f64) -> Revolution {
        revolution(ordinal, rpm, &vec![2000.0; 50_000])
    }

    #[test]
    fn test_clean_revolution() {
        let mut track = Track::with_revolutions(0, 0, vec![dense(0, 300.0)]);
        track.format = DiskFormat::PcMfmDd;
        assert!(detect_errors(&track).is_empty());
    }

    #[test]
    fn test_speed_anomaly() {
        let track = Track::with_revolutions(0, 0, vec![dense(0, 350.0)]);
        let warnings = detect_errors(&track);
        assert_eq!(
            warnings,
            vec![TrackWarning::AbnormalSpeed { revolution: 0, rpm: 350.0 }]
        );
        assert_eq!(warnings[0].to_string(), "Rev 0: abnormal speed 350.0 RPM");
    }

    #[test]
    fn test_speed_window_inclusive() {
        let track = Track::with_revolutions(0, 0, vec![dense(0, 280.0), dense(1, 320.0)]);
        assert!(detect_errors(&track).is_empty());
    }

    #[test]
    fn test_density_depends_on_format() {
        let mut track = Track::with_revolutions(0, 0, vec![revolution(0, 300.0, &vec![2000.0; 35_000])]);
        assert!(detect_errors(&track).is_empty());

        track.format = DiskFormat::AmigaDd;
        assert_eq!(
            detect_errors(&track),
            vec![TrackWarning::LowDensity { revolution: 0, count: 35_000 }]
        );
    }

    #[test]
    fn test_outliers_indexed_in_positive_deltas() {
        let mut deltas = vec![2000.0; 40_000];
        deltas[0] = 0.0;
        deltas[10] = 7000.0;
        deltas[20] = 500.0;
        let track = Track::with_revolutions(0, 0, vec![revolution(3, 300.0, &deltas)]);

        let warnings = detect_errors(&track);
        assert_eq!(
            warnings,
            vec![
                TrackWarning::TimingAnomaly { revolution: 3, index: 9 },
                TrackWarning::TimingAnomaly { revolution: 3, index: 19 },
            ]
        );
    }

    #[test]
    fn test_checks_fire_independently() {
        let track = Track::with_revolutions(0, 0, vec![revolution(0, 0.0, &[1000.0, 1000.0, 9000.0])]);
        let warnings = detect_errors(&track);
        assert_eq!(warnings.len(), 3);
        assert!(matches!(warnings[0], TrackWarning::AbnormalSpeed { .. }));
        assert!(matches!(warnings[1], TrackWarning::LowDensity { count: 3, .. }));
        assert!(matches!(warnings[2], TrackWarning::TimingAnomaly { index: 2, .. }));
    }

    #[test]
    fn test_empty_track_has_no_warnings() {
        assert!(detect_errors(&Track::new(0, 0)).is_empty());
    }
}
