/// Timing normalization: ticks to nanoseconds, speed, and speed compensation

use crate::flux::{Revolution, Track};
use crate::format::constants::{CAPTURE_CLOCK_HZ, NS_PER_MINUTE, REFERENCE_RPM};
use tracing::debug;

/// Capture clock and the speed all deltas are rescaled to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timebase {
    /// Capture timer frequency in ticks per second
    pub capture_clock_hz: u32,
    /// Rotational speed deltas are normalized to
    pub reference_rpm: f64,
}

impl Timebase {
    /// Create a timebase
    pub fn new(capture_clock_hz: u32, reference_rpm: f64) -> Self {
        Self {
            capture_clock_hz,
            reference_rpm,
        }
    }

    /// Nanoseconds per capture tick, 0 for a zero clock
    pub fn ns_per_tick(&self) -> f64 {
        if self.capture_clock_hz == 0 {
            return 0.0;
        }
        1e9 / self.capture_clock_hz as f64
    }
}

impl Default for Timebase {
    fn default() -> Self {
        Self::new(CAPTURE_CLOCK_HZ, REFERENCE_RPM)
    }
}

/// Normalize every revolution of a raw track
///
/// Computes per-sample deltas, each revolution's duration and speed, then
/// rescales deltas as if the disk had turned at the reference speed.
/// Revolutions with fewer than two samples are passed through untouched.
/// A revolution whose speed cannot be computed keeps its unscaled deltas
/// and an RPM of 0, which the error detector reports.
pub fn normalize_timing(mut track: Track, timebase: &Timebase) -> Track {
    debug!(
        "Normalizing timing for track {}/{}",
        track.track_number, track.side_number
    );

    for rev in track.revolutions_mut() {
        if rev.sample_count() < 2 {
            continue;
        }
        normalize_revolution(rev, timebase);
    }

    track
}

fn normalize_revolution(rev: &mut Revolution, timebase: &Timebase) {
    let tick_ns = timebase.ns_per_tick();

    let mut prev_tick = 0u32;
    for sample in rev.samples_mut() {
        let delta_ticks = sample.tick as f64 - prev_tick as f64;
        sample.delta_ns = delta_ticks * tick_ns;
        prev_tick = sample.tick;
    }

    rev.duration_ns = rev.index_ticks as f64 * tick_ns;
    rev.rpm = if rev.duration_ns > 0.0 {
        NS_PER_MINUTE / rev.duration_ns
    } else {
        0.0
    };

    if rev.rpm > 0.0 {
        let scale = timebase.reference_rpm / rev.rpm;
        for sample in rev.samples_mut() {
            sample.delta_ns *= scale;
        }
    }
}
