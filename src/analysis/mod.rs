/// Flux analysis stages

/// Multi-revolution consensus combination
pub mod combine;
/// Statistical anomaly scan
pub mod errors;
/// Quality scoring
pub mod quality;
/// Mean, median and population variance
pub mod stats;
/// Timing normalization
pub mod timing;
/// Weak-bit detection
pub mod weak_bits;

pub use combine::combine_revolutions;
pub use errors::{detect_errors, TrackWarning};
pub use quality::calculate_quality;
pub use timing::{normalize_timing, Timebase};
pub use weak_bits::detect_weak_bits;

use crate::flux::Track;

/// Per-track findings shared by the later pipeline stages
///
/// Computed once from a classified, normalized track so the protection
/// analyzer and the scorer see exactly the values that were reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackDiagnostics {
    /// Anomalies from the error detector, in detection order
    pub warnings: Vec<TrackWarning>,
    /// Weak positions, ascending
    pub weak_bits: Vec<usize>,
}

impl TrackDiagnostics {
    /// Run the error and weak-bit detectors over a track
    pub fn collect(track: &Track) -> Self {
        Self {
            warnings: detect_errors(track),
            weak_bits: detect_weak_bits(track),
        }
    }

    /// Render the warnings as display strings
    pub fn warning_strings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}
