/// In-memory cache of processed tracks for one disk

use crate::error::Result;
use crate::format::DiskFormat;
use crate::processor::ProcessingResult;
use crate::protection::ProtectionResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Disk-level summary derived from the buffered tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskInfo {
    /// Format of track 0 side 0, once buffered
    pub format: DiskFormat,
    /// Highest buffered track number plus one
    pub total_tracks: usize,
    /// Sides the disk is read with
    pub sides: u8,
    /// Mean quality over every buffered track
    pub quality_avg: f64,
}

impl Default for DiskInfo {
    fn default() -> Self {
        Self {
            format: DiskFormat::Unknown,
            total_tracks: 0,
            sides: 2,
            quality_avg: 0.0,
        }
    }
}

/// Compact per-track record for transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    /// Physical track number
    pub track: u8,
    /// Physical side number
    pub side: u8,
    /// Classified encoding
    pub format: DiskFormat,
    /// Quality score (0-100)
    pub quality: f64,
    /// Number of decoded sectors
    pub sectors: usize,
    /// Error detector warnings
    pub warnings: Vec<String>,
    /// Copy protection findings
    pub protection: ProtectionResult,
}

impl From<&ProcessingResult> for TrackSummary {
    fn from(result: &ProcessingResult) -> Self {
        Self {
            track: result.track,
            side: result.side,
            format: result.format,
            quality: result.quality_score,
            sectors: result.sectors.len(),
            warnings: result.warnings.clone(),
            protection: result.protection.clone(),
        }
    }
}

/// Whole-disk export document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskExport {
    /// Disk-level summary
    pub disk_info: DiskInfo,
    /// One entry per buffered track, in no particular order
    pub tracks: Vec<TrackSummary>,
}

/// Latest processing result for every (track, side) of one disk
///
/// Inserting for a position that is already buffered replaces it, which is
/// what makes re-reading a poor track idempotent. There is no expiry; a new
/// disk gets a new (or cleared) buffer.
#[derive(Debug, Clone, Default)]
pub struct DiskBuffer {
    tracks: HashMap<(u8, u8), ProcessingResult>,
    info: DiskInfo,
}

impl DiskBuffer {
    /// Create an empty buffer for a double-sided disk
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty buffer for a disk with the given number of sides
    pub fn with_sides(sides: u8) -> Self {
        Self {
            tracks: HashMap::new(),
            info: DiskInfo {
                sides,
                ..DiskInfo::default()
            },
        }
    }

    /// Store a result, replacing any earlier result for the same position
    pub fn insert(&mut self, result: ProcessingResult) {
        let key = (result.track, result.side);
        self.tracks.insert(key, result);
        self.update_disk_info();
    }

    /// Get the buffered result for a position
    pub fn get(&self, track: u8, side: u8) -> Option<&ProcessingResult> {
        self.tracks.get(&(track, side))
    }

    /// Get the disk-level summary
    pub fn disk_info(&self) -> &DiskInfo {
        &self.info
    }

    /// Iterate over buffered results in no particular order
    pub fn results(&self) -> impl Iterator<Item = &ProcessingResult> {
        self.tracks.values()
    }

    /// Get the number of buffered tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if nothing has been buffered
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Discard every buffered track, keeping the side count
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.info = DiskInfo {
            sides: self.info.sides,
            ..DiskInfo::default()
        };
    }

    /// Flatten the buffer into per-track summaries
    pub fn export(&self) -> Vec<TrackSummary> {
        self.tracks.values().map(TrackSummary::from).collect()
    }

    /// Build the whole-disk export document
    pub fn to_export(&self) -> DiskExport {
        DiskExport {
            disk_info: self.info.clone(),
            tracks: self.export(),
        }
    }

    /// Serialize the whole-disk export document as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_export())?)
    }

    fn update_disk_info(&mut self) {
        if self.tracks.is_empty() {
            return;
        }

        if let Some(first) = self.tracks.get(&(0, 0)) {
            self.info.format = first.format;
        }

        self.info.total_tracks = self
            .tracks
            .keys()
            .map(|&(track, _)| track as usize + 1)
            .max()
            .unwrap_or(0);

        let total: f64 = self.tracks.values().map(|r| r.quality_score).sum();
        self.info.quality_avg = total / self.tracks.len() as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flux::{Revolution, Track, CONSENSUS_ORDINAL};

    fn result(track: u8, side: u8, format: DiskFormat, quality: f64) -> ProcessingResult {
        ProcessingResult {
            track,
            side,
            format,
            quality_score: quality,
            sectors: Vec::new(),
            raw_flux: Track::new(track, side),
            consensus: Revolution::new(CONSENSUS_ORDINAL, 0, Vec::new()),
            warnings: Vec::new(),
            protection: ProtectionResult::default(),
        }
    }

    #[test]
    fn test_new_buffer() {
        let buffer = DiskBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.disk_info(), &DiskInfo::default());
        assert!(buffer.get(0, 0).is_none());
    }

    #[test]
    fn test_insert_overwrites() {
        let mut buffer = DiskBuffer::new();
        buffer.insert(result(0, 0, DiskFormat::PcMfmDd, 50.0));
        buffer.insert(result(0, 0, DiskFormat::AmigaDd, 95.0));

        assert_eq!(buffer.len(), 1);
        let stored = buffer.get(0, 0).unwrap();
        assert_eq!(stored.format, DiskFormat::AmigaDd);
        assert_eq!(stored.quality_score, 95.0);
        assert_eq!(buffer.disk_info().quality_avg, 95.0);
    }

    #[test]
    fn test_disk_info() {
        let mut buffer = DiskBuffer::new();
        buffer.insert(result(5, 1, DiskFormat::C64Gcr, 80.0));
        assert_eq!(buffer.disk_info().format, DiskFormat::Unknown);
        assert_eq!(buffer.disk_info().total_tracks, 6);

        buffer.insert(result(0, 0, DiskFormat::AmigaDd, 100.0));
        buffer.insert(result(2, 0, DiskFormat::AmigaDd, 90.0));

        let info = buffer.disk_info();
        assert_eq!(info.format, DiskFormat::AmigaDd);
        assert_eq!(info.total_tracks, 6);
        assert_eq!(info.sides, 2);
        assert_eq!(info.quality_avg, 90.0);
    }

    #[test]
    fn test_clear_keeps_sides() {
        let mut buffer = DiskBuffer::with_sides(1);
        buffer.insert(result(0, 0, DiskFormat::AppleIiGcr, 70.0));
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.disk_info().sides, 1);
        assert_eq!(buffer.disk_info().total_tracks, 0);
    }

    #[test]
    fn test_export() {
        let mut buffer = DiskBuffer::new();
        buffer.insert(result(0, 0, DiskFormat::PcMfmDd, 100.0));
        buffer.insert(result(0, 1, DiskFormat::PcMfmDd, 90.0));

        let mut summaries = buffer.export();
        summaries.sort_by_key(|s| (s.track, s.side));
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].side, 1);
        assert_eq!(summaries[1].quality, 90.0);
        assert_eq!(summaries[1].sectors, 0);
    }

    #[test]
    fn test_json_shape() {
        let mut buffer = DiskBuffer::new();
        buffer.insert(result(0, 0, DiskFormat::PcMfmHd, 100.0));

        let json: serde_json::Value = serde_json::from_str(&buffer.to_json().unwrap()).unwrap();
        assert_eq!(json["disk_info"]["format"], "PC_MFM_HD");
        assert_eq!(json["disk_info"]["total_tracks"], 1);
        assert_eq!(json["disk_info"]["sides"], 2);
        assert_eq!(json["tracks"][0]["protection"]["type"], "none");
        assert_eq!(json["tracks"][0]["sectors"], 0);
    }
}
