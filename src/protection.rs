/// Copy protection detection from flux timing
///
/// Detects protection schemes that show up below the sector level: weak
/// (fuzzy) bits, long timing gaps, and revolutions of varying density.

use crate::analysis::stats::median;
use crate::flux::Track;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Weak-bit count above which a track is considered protected
const WEAK_BIT_THRESHOLD: usize = 10;
/// Number of weak positions recorded in the details
const RECORDED_POSITIONS: usize = 20;
/// Gap above this multiple of the median delta indicates timing protection
const TIMING_GAP_FACTOR: f64 = 5.0;
/// Sample-count spread between revolutions that indicates variable density
const DENSITY_SPREAD_THRESHOLD: usize = 1000;

/// Kind of protection detected on a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtectionKind {
    /// Nothing detected
    #[default]
    None,
    /// Unstable cells that read differently on every revolution
    WeakBits,
    /// Deliberately long gaps between transitions
    TimingProtection,
    /// Revolutions carrying noticeably different transition counts
    VariableDensity,
}

impl ProtectionKind {
    /// Get the label of this protection kind
    pub fn name(&self) -> &'static str {
        match self {
            ProtectionKind::None => "none",
            ProtectionKind::WeakBits => "weak_bits",
            ProtectionKind::TimingProtection => "timing_protection",
            ProtectionKind::VariableDensity => "variable_density",
        }
    }
}

/// Evidence collected by the protection rules
///
/// Every rule that fires leaves its evidence here, even when a later rule
/// replaces the label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProtectionDetails {
    /// Total weak positions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weak_count: Option<usize>,
    /// First weak positions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Vec<usize>>,
    /// Longest gap seen in the last revolution that tripped the gap rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_gap_ns: Option<f64>,
    /// Spread between the largest and smallest revolution sample counts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flux_variation: Option<usize>,
}

impl ProtectionDetails {
    /// Check if no rule left any evidence
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of copy protection detection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProtectionResult {
    /// Label of the last rule that fired
    #[serde(rename = "type")]
    pub kind: ProtectionKind,
    /// Evidence from every rule that fired
    pub details: ProtectionDetails,
}

impl ProtectionResult {
    /// Check whether any protection was detected
    pub fn is_protected(&self) -> bool {
        self.kind != ProtectionKind::None
    }
}

impl std::fmt::Display for ProtectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind.name())?;
        let d = &self.details;
        let mut parts = Vec::new();
        if let Some(count) = d.weak_count {
            parts.push(format!("{} weak bits", count));
        }
        if let Some(gap) = d.max_gap_ns {
            parts.push(format!("max gap {:.0}ns", gap));
        }
        if let Some(spread) = d.flux_variation {
            parts.push(format!("flux variation {}", spread));
        }
        if !parts.is_empty() {
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Detect copy protection on a normalized track
///
/// Rules run in a fixed order and each one that fires overwrites the
/// label, so only the last match is reported as the kind.
///
/// # Arguments
///
/// * `track` - The normalized track, with its captured revolutions
/// * `weak_bits` - Weak positions found on the same revolutions
///
/// # Example
///
/// ```
/// use fluxprep::flux::{Revolution, Track};
/// use fluxprep::protection::{self, ProtectionKind};
///
/// let track = Track::with_revolutions(0, 0, vec![Revolution::from_ticks(0, 0, &[])]);
/// let result = protection::analyze(&track, &[]);
/// assert_eq!(result.kind, ProtectionKind::None);
/// ```
pub fn analyze(track: &Track, weak_bits: &[usize]) -> ProtectionResult {
    let mut result = ProtectionResult::default();

    // Fuzzy bits
    if weak_bits.len() > WEAK_BIT_THRESHOLD {
        result.kind = ProtectionKind::WeakBits;
        result.details.weak_count = Some(weak_bits.len());
        result.details.positions = Some(weak_bits.iter().take(RECORDED_POSITIONS).copied().collect());
    }

    // Long gaps
    for rev in track.revolutions() {
        let deltas = rev.deltas();
        if deltas.is_empty() {
            continue;
        }
        let max_delta = deltas.iter().copied().fold(f64::MIN, f64::max);
        if max_delta > median(&deltas) * TIMING_GAP_FACTOR {
            result.kind = ProtectionKind::TimingProtection;
            result.details.max_gap_ns = Some(max_delta);
        }
    }

    // Track length variation
    let counts = track.sample_counts();
    if let (Some(max), Some(min)) = (counts.iter().max(), counts.iter().min()) {
        let spread = max - min;
        if spread > DENSITY_SPREAD_THRESHOLD {
            result.kind = ProtectionKind::VariableDensity;
            result.details.flux_variation = Some(spread);
        }
    }

    if result.is_protected() {
        debug!(
            "Track {}/{}: protection {}",
            track.track_number, track.side_number, result
        );
    }

    result
}
