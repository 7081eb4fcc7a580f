/// Revolution data structures

use crate::flux::sample::Sample;

/// Ordinal reserved for synthetic consensus revolutions
///
/// Captured revolutions are numbered from 0; this value never appears on a
/// physically captured revolution.
pub const CONSENSUS_ORDINAL: u8 = 0xFF;

/// One disk rotation's worth of flux transitions
#[derive(Debug, Clone, PartialEq)]
pub struct Revolution {
    /// Revolution ordinal within the capture (or `CONSENSUS_ORDINAL`)
    pub ordinal: u8,
    /// Index-to-index time in capture ticks
    pub index_ticks: u32,
    /// Revolution duration in nanoseconds, 0 until normalized
    pub duration_ns: f64,
    /// Rotational speed, 0 until normalized or when the duration is unknown
    pub rpm: f64,
    /// Flux transitions ordered by tick
    samples: Vec<Sample>,
}

impl Revolution {
    /// Create a revolution from samples
    pub fn new(ordinal: u8, index_ticks: u32, samples: Vec<Sample>) -> Self {
        Self {
            ordinal,
            index_ticks,
            duration_ns: 0.0,
            rpm: 0.0,
            samples,
        }
    }

    /// Create a raw revolution from capture timer values
    pub fn from_ticks(ordinal: u8, index_ticks: u32, ticks: &[u32]) -> Self {
        Self::new(
            ordinal,
            index_ticks,
            ticks.iter().copied().map(Sample::new).collect(),
        )
    }

    /// Get a reference to all samples
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Get a mutable reference to all samples
    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.samples
    }

    /// Get the number of flux transitions
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Check if this revolution has no transitions
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check if this is a synthetic consensus revolution
    pub fn is_consensus(&self) -> bool {
        self.ordinal == CONSENSUS_ORDINAL
    }

    /// Get all sample deltas in order
    pub fn deltas(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.delta_ns).collect()
    }

    /// Get the strictly positive sample deltas in order
    pub fn positive_deltas(&self) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.delta_ns)
            .filter(|&d| d > 0.0)
            .collect()
    }

    /// Get the raw timer values in order
    pub fn ticks(&self) -> Vec<u32> {
        self.samples.iter().map(|s| s.tick).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ticks() {
        let rev = Revolution::from_ticks(2, 1000, &[10, 20, 30]);
        assert_eq!(rev.ordinal, 2);
        assert_eq!(rev.index_ticks, 1000);
        assert_eq!(rev.sample_count(), 3);
        assert_eq!(rev.ticks(), vec![10, 20, 30]);
        assert_eq!(rev.rpm, 0.0);
        assert!(!rev.is_consensus());
    }

    #[test]
    fn test_positive_deltas_skip_zero() {
        let rev = Revolution::new(
            0,
            0,
            vec![
                Sample::with_delta(0, 0.0),
                Sample::with_delta(5, 2000.0),
                Sample::with_delta(9, 1800.0),
            ],
        );
        assert_eq!(rev.deltas(), vec![0.0, 2000.0, 1800.0]);
        assert_eq!(rev.positive_deltas(), vec![2000.0, 1800.0]);
    }

    #[test]
    fn test_consensus_marker() {
        let rev = Revolution::from_ticks(CONSENSUS_ORDINAL, 0, &[]);
        assert!(rev.is_consensus());
        assert!(rev.is_empty());
    }
}
