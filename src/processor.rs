/// Track processing pipeline

use crate::analysis::{
    calculate_quality, combine_revolutions, normalize_timing, Timebase, TrackDiagnostics,
};
use crate::config::ProcessorConfig;
use crate::flux::{DecodedSector, Revolution, Track};
use crate::format::{detect_format, DiskFormat};
use crate::protection::{self, ProtectionResult};
use tracing::info;

/// Immutable outcome of processing one track
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingResult {
    /// Physical track number
    pub track: u8,
    /// Physical side number
    pub side: u8,
    /// Classified encoding
    pub format: DiskFormat,
    /// Quality score (0-100)
    pub quality_score: f64,
    /// Decoded sectors, always empty as no channel decoding is performed
    pub sectors: Vec<DecodedSector>,
    /// The normalized track, kept for audit
    pub raw_flux: Track,
    /// Consensus of all captured revolutions
    pub consensus: Revolution,
    /// Anomalies reported by the error detector
    pub warnings: Vec<String>,
    /// Copy protection findings
    pub protection: ProtectionResult,
}

/// Runs the fixed processing pipeline over captured tracks
///
/// The pipeline never fails on data: malformed input degrades to an unknown
/// format and a low quality score.
#[derive(Debug, Clone, Default)]
pub struct FluxProcessor {
    timebase: Timebase,
}

impl FluxProcessor {
    /// Create a processor for the given capture timebase
    pub fn new(timebase: Timebase) -> Self {
        Self { timebase }
    }

    /// Create a processor from a configuration
    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self::new(config.timebase())
    }

    /// Get the timebase used for normalization
    pub fn timebase(&self) -> &Timebase {
        &self.timebase
    }

    /// Process one raw track
    ///
    /// Stages run in order: normalize, classify, detect errors, combine
    /// revolutions, analyze protection, score. Error and weak-bit detection
    /// run once and are shared by the protection analyzer and the scorer.
    pub fn process_track(&self, track: Track) -> ProcessingResult {
        info!(
            "Processing track {}/{}",
            track.track_number, track.side_number
        );

        let mut track = normalize_timing(track, &self.timebase);

        track.format = detect_format(&track);
        info!("  Format: {}", track.format);

        let diagnostics = TrackDiagnostics::collect(&track);

        let consensus = combine_revolutions(&track);

        let protection = protection::analyze(&track, &diagnostics.weak_bits);

        let quality = calculate_quality(&track, &diagnostics);
        track.quality_score = quality;
        info!("  Quality: {:.1}%", quality);

        ProcessingResult {
            track: track.track_number,
            side: track.side_number,
            format: track.format,
            quality_score: quality,
            sectors: track.sectors().to_vec(),
            warnings: diagnostics.warning_strings(),
            consensus,
            protection,
            raw_flux: track,
        }
    }
}
