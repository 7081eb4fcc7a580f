/// Acquisition and result-sink capabilities
///
/// The processor never talks to hardware or presentation code directly.
/// Callers hand it a `FluxSource` to read from and a `ResultSink` to store
/// into.

use crate::buffer::DiskBuffer;
use crate::error::{FluxError, Result};
use crate::flux::{Revolution, Track};
use crate::io::{read_capture, CapturePacket};
use crate::processor::ProcessingResult;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

/// Something that can capture raw flux for a track
pub trait FluxSource {
    /// Capture up to `revolutions` revolutions of a track
    fn read_track(&mut self, track: u8, side: u8, revolutions: u8) -> Result<Track>;
}

/// Something that accepts processing results
pub trait ResultSink {
    /// Take ownership of a result
    fn accept(&mut self, result: ProcessingResult);
}

impl ResultSink for DiskBuffer {
    fn accept(&mut self, result: ProcessingResult) {
        self.insert(result);
    }
}

/// Shared buffer for several producers; inserts are serialized by the lock
impl ResultSink for Arc<Mutex<DiskBuffer>> {
    fn accept(&mut self, result: ProcessingResult) {
        let mut buffer = match self.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        buffer.insert(result);
    }
}

impl ResultSink for Vec<ProcessingResult> {
    fn accept(&mut self, result: ProcessingResult) {
        self.push(result);
    }
}

/// Replays revolutions from a capture file
#[derive(Debug, Clone, Default)]
pub struct CaptureFileSource {
    revolutions: HashMap<(u8, u8), Vec<Revolution>>,
}

impl CaptureFileSource {
    /// Open a capture file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = Self::from_packets(read_capture(path.as_ref())?);
        info!(
            "Opened capture {} ({} tracks)",
            path.as_ref().display(),
            source.revolutions.len()
        );
        Ok(source)
    }

    /// Build a source from parsed packets, keeping file order per position
    pub fn from_packets(packets: Vec<CapturePacket>) -> Self {
        let mut revolutions: HashMap<(u8, u8), Vec<Revolution>> = HashMap::new();
        for packet in packets {
            revolutions
                .entry((packet.track, packet.side))
                .or_default()
                .push(packet.revolution);
        }
        Self { revolutions }
    }

    /// Get every captured (track, side) in ascending order
    pub fn positions(&self) -> Vec<(u8, u8)> {
        let ordered: BTreeMap<_, _> = self.revolutions.iter().collect();
        ordered.into_keys().copied().collect()
    }

    /// Get the number of revolutions captured for a position
    pub fn revolutions_available(&self, track: u8, side: u8) -> usize {
        self.revolutions
            .get(&(track, side))
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

impl FluxSource for CaptureFileSource {
    fn read_track(&mut self, track: u8, side: u8, revolutions: u8) -> Result<Track> {
        let captured = self
            .revolutions
            .get(&(track, side))
            .filter(|r| !r.is_empty())
            .ok_or(FluxError::TrackNotCaptured { track, side })?;

        let selected = captured
            .iter()
            .take(revolutions as usize)
            .cloned()
            .collect();
        Ok(Track::with_revolutions(track, side, selected))
    }
}
