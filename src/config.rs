/// Processing configuration loaded from TOML

use crate::analysis::Timebase;
use crate::error::{FluxError, Result};
use crate::format::constants::{CAPTURE_CLOCK_HZ, REFERENCE_RPM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings for processing and for a disk read session
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Capture timer frequency in ticks per second
    pub capture_clock_hz: u32,
    /// Speed deltas are normalized to
    pub reference_rpm: f64,
    /// Revolutions captured on a first read
    pub revolutions: u8,
    /// Revolutions captured when a track is re-read
    pub retry_revolutions: u8,
    /// Quality below which a track is re-read
    pub retry_quality_threshold: f64,
    /// Tracks per side read by a full disk session
    pub tracks: u8,
    /// Sides read by a full disk session
    pub sides: u8,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            capture_clock_hz: CAPTURE_CLOCK_HZ,
            reference_rpm: REFERENCE_RPM,
            revolutions: 3,
            retry_revolutions: 5,
            retry_quality_threshold: 80.0,
            tracks: 80,
            sides: 2,
        }
    }
}

impl ProcessorConfig {
    /// Parse and validate a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ProcessorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load the configuration file at the default location, or the defaults
    /// when it does not exist
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            _ => Ok(Self::default()),
        }
    }

    /// Default configuration file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("fluxprep");
            p.push("config.toml");
            p
        })
    }

    /// Check the values are usable
    pub fn validate(&self) -> Result<()> {
        if self.capture_clock_hz == 0 {
            return Err(FluxError::config("capture_clock_hz must be greater than 0"));
        }
        if !self.reference_rpm.is_finite() || self.reference_rpm <= 0.0 {
            return Err(FluxError::config("reference_rpm must be greater than 0"));
        }
        if self.revolutions == 0 || self.retry_revolutions == 0 {
            return Err(FluxError::config("revolution counts must be at least 1"));
        }
        if !(1..=2).contains(&self.sides) {
            return Err(FluxError::config(format!(
                "sides must be 1 or 2, got {}",
                self.sides
            )));
        }
        Ok(())
    }

    /// Timing reference used by the normalizer
    pub fn timebase(&self) -> Timebase {
        Timebase::new(self.capture_clock_hz, self.reference_rpm)
    }

    /// Nanoseconds per capture tick
    pub fn ns_per_tick(&self) -> f64 {
        self.timebase().ns_per_tick()
    }

    /// Render this configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| FluxError::config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProcessorConfig::default();
        assert_eq!(config.capture_clock_hz, 275_000_000);
        assert_eq!(config.reference_rpm, 300.0);
        assert_eq!(config.revolutions, 3);
        assert_eq!(config.retry_revolutions, 5);
        assert_eq!(config.retry_quality_threshold, 80.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = ProcessorConfig::from_toml_str("tracks = 40\nsides = 1\n").unwrap();
        assert_eq!(config.tracks, 40);
        assert_eq!(config.sides, 1);
        assert_eq!(config.revolutions, 3);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            ProcessorConfig::from_toml_str("capture_clock_hz = 0"),
            Err(FluxError::Config(_))
        ));
        assert!(ProcessorConfig::from_toml_str("sides = 3").is_err());
        assert!(ProcessorConfig::from_toml_str("revolutions = 0").is_err());
        assert!(ProcessorConfig::from_toml_str("reference_rpm = -1.0").is_err());
    }

    #[test]
    fn test_rejects_bad_types() {
        assert!(matches!(
            ProcessorConfig::from_toml_str("tracks = \"many\""),
            Err(FluxError::Config(_))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ProcessorConfig {
            tracks: 35,
            ..Default::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(ProcessorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "retry_quality_threshold = 70.0\n").unwrap();
        let config = ProcessorConfig::load(&path).unwrap();
        assert_eq!(config.retry_quality_threshold, 70.0);
    }
}
