/// Track data structures

use crate::flux::revolution::Revolution;
use crate::flux::sector::DecodedSector;
use crate::format::DiskFormat;

/// A captured track holding one or more revolutions
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Physical track number
    pub track_number: u8,
    /// Physical side number (0 or 1)
    pub side_number: u8,
    /// Classified encoding, `DiskFormat::Unknown` until classified
    pub format: DiskFormat,
    /// Quality score (0-100), 0 until scored
    pub quality_score: f64,
    /// Revolutions in capture order
    revolutions: Vec<Revolution>,
    /// Decoded sectors (always empty, no channel decoding is performed)
    sectors: Vec<DecodedSector>,
}

impl Track {
    /// Create a new empty track
    pub fn new(track_number: u8, side_number: u8) -> Self {
        Self {
            track_number,
            side_number,
            format: DiskFormat::Unknown,
            quality_score: 0.0,
            revolutions: Vec::new(),
            sectors: Vec::new(),
        }
    }

    /// Create a track from captured revolutions
    pub fn with_revolutions(track_number: u8, side_number: u8, revolutions: Vec<Revolution>) -> Self {
        Self {
            revolutions,
            ..Self::new(track_number, side_number)
        }
    }

    /// Add a revolution to this track
    pub fn add_revolution(&mut self, revolution: Revolution) {
        self.revolutions.push(revolution);
    }

    /// Get a reference to all revolutions
    pub fn revolutions(&self) -> &[Revolution] {
        &self.revolutions
    }

    /// Get a mutable reference to all revolutions
    pub fn revolutions_mut(&mut self) -> &mut [Revolution] {
        &mut self.revolutions
    }

    /// Get a revolution by its position in capture order
    pub fn get_revolution(&self, index: usize) -> Option<&Revolution> {
        self.revolutions.get(index)
    }

    /// Get the number of revolutions
    pub fn revolution_count(&self) -> usize {
        self.revolutions.len()
    }

    /// Check if this track has any revolutions
    pub fn is_empty(&self) -> bool {
        self.revolutions.is_empty()
    }

    /// Get the decoded sectors
    pub fn sectors(&self) -> &[DecodedSector] {
        &self.sectors
    }

    /// Get the sample count of every revolution in order
    pub fn sample_counts(&self) -> Vec<usize> {
        self.revolutions.iter().map(|r| r.sample_count()).collect()
    }

    /// Get the sample count of the shortest revolution, 0 if there are none
    pub fn shortest_revolution(&self) -> usize {
        self.revolutions
            .iter()
            .map(|r| r.sample_count())
            .min()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_track() {
        let track = Track::new(3, 1);
        assert_eq!(track.track_number, 3);
        assert_eq!(track.side_number, 1);
        assert_eq!(track.format, DiskFormat::Unknown);
        assert!(track.is_empty());
        assert!(track.sectors().is_empty());
        assert_eq!(track.shortest_revolution(), 0);
    }

    #[test]
    fn test_add_revolution() {
        let mut track = Track::new(0, 0);
        track.add_revolution(Revolution::from_ticks(0, 100, &[1, 2, 3]));
        track.add_revolution(Revolution::from_ticks(1, 100, &[1, 2]));

        assert_eq!(track.revolution_count(), 2);
        assert_eq!(track.sample_counts(), vec![3, 2]);
        assert_eq!(track.shortest_revolution(), 2);
        assert_eq!(track.get_revolution(1).unwrap().ordinal, 1);
        assert!(track.get_revolution(2).is_none());
    }
}
