/// Flux transition sample

/// One captured flux transition
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sample {
    /// Capture timer value at the transition (ticks)
    pub tick: u32,
    /// Time since the previous transition in nanoseconds, 0 until normalized
    pub delta_ns: f64,
}

impl Sample {
    /// Create a raw sample from a timer value
    pub fn new(tick: u32) -> Self {
        Self { tick, delta_ns: 0.0 }
    }

    /// Create a sample with a known delta
    pub fn with_delta(tick: u32, delta_ns: f64) -> Self {
        Self { tick, delta_ns }
    }
}
