/// Flux timing constants and classification thresholds

/// Capture timer frequency of the acquisition hardware (ticks per second)
pub const CAPTURE_CLOCK_HZ: u32 = 275_000_000;

/// Reference rotational speed deltas are normalized to
pub const REFERENCE_RPM: f64 = 300.0;

/// Nominal drive speed used for speed checks and scoring
pub const NOMINAL_RPM: f64 = 300.0;

/// Nanoseconds in one minute
pub const NS_PER_MINUTE: f64 = 60e9;

/// Lowest acceptable revolution speed
pub const RPM_MIN: f64 = 280.0;

/// Highest acceptable revolution speed
pub const RPM_MAX: f64 = 320.0;

/// Expected transitions per revolution for MFM and Amiga double density
pub const EXPECTED_FLUX_DD: usize = 50_000;

/// Expected transitions per revolution for every other format
pub const EXPECTED_FLUX_DEFAULT: usize = 40_000;

/// Fraction of the expected density below which a revolution is flagged
pub const MIN_DENSITY_FRACTION: f64 = 0.8;

/// Deltas above this multiple of the median are timing anomalies
pub const OUTLIER_HIGH_FACTOR: f64 = 3.0;

/// Deltas below this multiple of the median are timing anomalies
pub const OUTLIER_LOW_FACTOR: f64 = 0.3;

/// Cross-revolution variance/mean ratio above which a cell is weak
pub const WEAK_BIT_DISPERSION: f64 = 0.1;

/// Open bounds of the MFM average-delta band (ns)
pub const MFM_BAND: (f64, f64) = (1500.0, 2500.0);

/// Transitions per revolution above which MFM is high density
pub const MFM_HD_SAMPLE_COUNT: usize = 80_000;

/// Open bounds of the Amiga/C64 average-delta band (ns)
pub const AMIGA_C64_BAND: (f64, f64) = (2500.0, 4000.0);

/// Open bounds of the speed window that identifies Amiga drives
pub const AMIGA_RPM_WINDOW: (f64, f64) = (290.0, 310.0);

/// Open bounds of the Apple II average-delta band (ns)
pub const APPLE_II_BAND: (f64, f64) = (3500.0, 5000.0);

/// Check whether `value` lies strictly inside `band`
pub fn in_band(value: f64, band: (f64, f64)) -> bool {
    band.0 < value && value < band.1
}
