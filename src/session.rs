/// Disk read sessions with quality-driven retries

use crate::config::ProcessorConfig;
use crate::error::{FluxError, Result};
use crate::processor::FluxProcessor;
use crate::source::{FluxSource, ResultSink};
use tracing::{info, warn};

/// Outcome of reading a whole disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionReport {
    /// Positions processed and handed to the sink
    pub tracks_read: usize,
    /// Positions that were re-read for low quality
    pub retries: usize,
    /// Positions the source had no capture for
    pub missing: Vec<(u8, u8)>,
}

/// Reads tracks from a source, processes them and stores the results
///
/// A track scoring below the configured threshold is captured again with
/// more revolutions and reprocessed; the sink's replace-on-insert keeps
/// only the second result.
pub struct DiskReader<S: FluxSource> {
    source: S,
    processor: FluxProcessor,
    config: ProcessorConfig,
}

impl<S: FluxSource> DiskReader<S> {
    /// Create a reader over a source
    pub fn new(source: S, config: ProcessorConfig) -> Self {
        Self {
            source,
            processor: FluxProcessor::from_config(&config),
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Get a mutable reference to the source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Read one track, retrying once if its quality is too low
    ///
    /// Returns the quality of the result that was stored last and whether a
    /// retry happened.
    pub fn read_track<K: ResultSink>(
        &mut self,
        track: u8,
        side: u8,
        sink: &mut K,
    ) -> Result<(f64, bool)> {
        let raw = self.source.read_track(track, side, self.config.revolutions)?;
        let result = self.processor.process_track(raw);
        let quality = result.quality_score;
        sink.accept(result);

        if quality >= self.config.retry_quality_threshold {
            return Ok((quality, false));
        }

        warn!(
            "Track {}/{}: retry due to quality {:.0}%",
            track, side, quality
        );
        let raw = self
            .source
            .read_track(track, side, self.config.retry_revolutions)?;
        let result = self.processor.process_track(raw);
        let quality = result.quality_score;
        sink.accept(result);

        Ok((quality, true))
    }

    /// Read every configured track and side in order
    ///
    /// Positions the source never captured are recorded and skipped; any
    /// other source failure ends the session.
    pub fn read_disk<K: ResultSink>(&mut self, sink: &mut K) -> Result<SessionReport> {
        let mut report = SessionReport::default();

        for track in 0..self.config.tracks {
            for side in 0..self.config.sides {
                match self.read_track(track, side, sink) {
                    Ok((_, retried)) => {
                        report.tracks_read += 1;
                        if retried {
                            report.retries += 1;
                        }
                    }
                    Err(FluxError::TrackNotCaptured { track, side }) => {
                        report.missing.push((track, side));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        info!(
            "Disk read complete: {} tracks, {} retries, {} missing",
            report.tracks_read,
            report.retries,
            report.missing.len()
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::DiskBuffer;
    use crate::flux::{Revolution, Track};
    use crate::processor::ProcessingResult;

    /// Serves good tracks only when asked for enough revolutions
    struct ScriptedSource {
        good_from: u8,
        calls: Vec<(u8, u8, u8)>,
    }

    impl FluxSource for ScriptedSource {
        fn read_track(&mut self, track: u8, side: u8, revolutions: u8) -> Result<Track> {
            self.calls.push((track, side, revolutions));
            if track == 9 {
                return Err(FluxError::TrackNotCaptured { track, side });
            }
            // 1 tick per ns at the default 300 RPM
            let index_ticks = if revolutions >= self.good_from { 200_000_000 } else { 0 };
            let ticks: Vec<u32> = (1..=50_000).map(|i| i * 2000).collect();
            let revs = (0..revolutions)
                .map(|r| Revolution::from_ticks(r, index_ticks, &ticks))
                .collect();
            Ok(Track::with_revolutions(track, side, revs))
        }
    }

    fn config(tracks: u8, sides: u8) -> ProcessorConfig {
        ProcessorConfig {
            capture_clock_hz: 1_000_000_000,
            tracks,
            sides,
            ..Default::default()
        }
    }

    #[test]
    fn test_good_track_no_retry() {
        let source = ScriptedSource { good_from: 1, calls: Vec::new() };
        let mut reader = DiskReader::new(source, config(1, 1));
        let mut sink: Vec<ProcessingResult> = Vec::new();

        let (quality, retried) = reader.read_track(0, 0, &mut sink).unwrap();
        assert_eq!(quality, 100.0);
        assert!(!retried);
        assert_eq!(sink.len(), 1);
        assert_eq!(reader.source_mut().calls, vec![(0, 0, 3)]);
    }

    #[test]
    fn test_poor_track_is_reread() {
        let source = ScriptedSource { good_from: 5, calls: Vec::new() };
        let mut reader = DiskReader::new(source, config(1, 1));
        let mut buffer = DiskBuffer::new();

        let (quality, retried) = reader.read_track(0, 0, &mut buffer).unwrap();
        assert!(retried);
        assert_eq!(quality, 100.0);
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.get(0, 0).unwrap().raw_flux.revolution_count(), 5);
        assert_eq!(reader.source_mut().calls, vec![(0, 0, 3), (0, 0, 5)]);
    }

    #[test]
    fn test_read_disk_report() {
        let source = ScriptedSource { good_from: 5, calls: Vec::new() };
        let mut reader = DiskReader::new(source, config(10, 2));
        let mut buffer = DiskBuffer::new();

        let report = reader.read_disk(&mut buffer).unwrap();
        assert_eq!(report.tracks_read, 18);
        assert_eq!(report.retries, 18);
        assert_eq!(report.missing, vec![(9, 0), (9, 1)]);
        assert_eq!(buffer.len(), 18);
        assert_eq!(buffer.disk_info().total_tracks, 9);
    }

    /// Good tracks everywhere except one position, where the drive fails
    struct FailingSource {
        failing_track: u8,
    }

    impl FluxSource for FailingSource {
        fn read_track(&mut self, track: u8, side: u8, revolutions: u8) -> Result<Track> {
            if track == self.failing_track {
                return Err(FluxError::invalid_capture("disconnected"));
            }
            let ticks: Vec<u32> = (1..=50_000).map(|i| i * 2000).collect();
            let revs = (0..revolutions)
                .map(|r| Revolution::from_ticks(r, 200_000_000, &ticks))
                .collect();
            Ok(Track::with_revolutions(track, side, revs))
        }
    }

    #[test]
    fn test_other_source_error_aborts() {
        let mut reader = DiskReader::new(FailingSource { failing_track: 1 }, config(3, 1));
        let mut buffer = DiskBuffer::new();

        let err = reader.read_disk(&mut buffer).unwrap_err();
        assert!(matches!(err, FluxError::InvalidCapture(ref msg) if msg == "disconnected"));
        assert_eq!(buffer.len(), 1);
        assert!(buffer.get(0, 0).is_some());
        assert!(buffer.get(2, 0).is_none());
    }
}
