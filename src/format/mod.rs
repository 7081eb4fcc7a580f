/// Disk encoding formats and flux-level classification

/// Timing constants and thresholds
pub mod constants;

pub use constants::*;

use crate::analysis::stats::mean;
use crate::flux::Track;
use serde::{Deserialize, Serialize};

/// Disk encoding format
///
/// A classification target only; nothing is decoded based on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DiskFormat {
    /// Not recognised
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    /// PC 720K
    #[serde(rename = "PC_MFM_DD")]
    PcMfmDd,
    /// PC 1.44M
    #[serde(rename = "PC_MFM_HD")]
    PcMfmHd,
    /// Amiga 880K
    #[serde(rename = "AMIGA_DD")]
    AmigaDd,
    /// Amiga 1.76M
    #[serde(rename = "AMIGA_HD")]
    AmigaHd,
    /// C64 170K
    #[serde(rename = "C64_GCR")]
    C64Gcr,
    /// C64 40 track
    #[serde(rename = "C64_GCR_40")]
    C64Gcr40,
    /// Apple II 140K
    #[serde(rename = "APPLE_II_GCR")]
    AppleIiGcr,
    /// Atari 8-bit
    #[serde(rename = "ATARI_FM")]
    AtariFm,
}

impl DiskFormat {
    /// Get the export name of this format
    pub fn name(&self) -> &'static str {
        match self {
            DiskFormat::Unknown => "UNKNOWN",
            DiskFormat::PcMfmDd => "PC_MFM_DD",
            DiskFormat::PcMfmHd => "PC_MFM_HD",
            DiskFormat::AmigaDd => "AMIGA_DD",
            DiskFormat::AmigaHd => "AMIGA_HD",
            DiskFormat::C64Gcr => "C64_GCR",
            DiskFormat::C64Gcr40 => "C64_GCR_40",
            DiskFormat::AppleIiGcr => "APPLE_II_GCR",
            DiskFormat::AtariFm => "ATARI_FM",
        }
    }

    /// Get the number of flux transitions a healthy revolution should carry
    pub fn expected_flux(&self) -> usize {
        match self {
            DiskFormat::PcMfmDd | DiskFormat::AmigaDd => EXPECTED_FLUX_DD,
            _ => EXPECTED_FLUX_DEFAULT,
        }
    }
}

impl std::fmt::Display for DiskFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Classify a normalized track from the timing of its first revolution
///
/// Bands are checked in order and the first match wins, so an average
/// between 3500 and 4000ns lands in the Amiga/C64 band, never Apple II.
pub fn detect_format(track: &Track) -> DiskFormat {
    let rev = match track.get_revolution(0) {
        Some(rev) if !rev.is_empty() => rev,
        _ => return DiskFormat::Unknown,
    };

    let deltas = rev.positive_deltas();
    if deltas.is_empty() {
        return DiskFormat::Unknown;
    }
    let avg_delta = mean(&deltas);

    if in_band(avg_delta, MFM_BAND) {
        if rev.sample_count() > MFM_HD_SAMPLE_COUNT {
            DiskFormat::PcMfmHd
        } else {
            DiskFormat::PcMfmDd
        }
    } else if in_band(avg_delta, AMIGA_C64_BAND) {
        if in_band(rev.rpm, AMIGA_RPM_WINDOW) {
            DiskFormat::AmigaDd
        } else {
            DiskFormat::C64Gcr
        }
    } else if in_band(avg_delta, APPLE_II_BAND) {
        DiskFormat::AppleIiGcr
    } else {
        DiskFormat::Unknown
    }
}
