/*!
# fluxprep

A Rust library for turning raw floppy flux captures into quality-scored,
classified track records.

## Features

- Timing normalization from capture ticks to nanoseconds at a reference speed
- Anomaly detection, multi-revolution consensus and weak-bit detection
- Flux-level copy protection heuristics and encoding classification
- Per-track quality scoring and a per-disk result buffer with JSON export
- Capture file reading and writing, and disk read sessions with retries

## Quick Start

```rust,no_run
use fluxprep::{CaptureFileSource, DiskBuffer, DiskReader, ProcessorConfig};

let config = ProcessorConfig::load_or_default()?;
let source = CaptureFileSource::open("disk.flux")?;

let mut reader = DiskReader::new(source, config);
let mut buffer = DiskBuffer::new();
let report = reader.read_disk(&mut buffer)?;

println!("{} tracks, {} retries", report.tracks_read, report.retries);
if let Some(result) = buffer.get(0, 0) {
    println!("Track 0: {} at {:.1}%", result.format, result.quality_score);
}
println!("{}", buffer.to_json()?);
# Ok::<(), fluxprep::FluxError>(())
```

## Pipeline

`FluxProcessor::process_track` runs a fixed sequence of stages over one
track: normalize timing, classify the format, detect errors, combine
revolutions, analyze protection and score quality. It never fails on data;
poor input yields an unknown format and a low score.

## Modules

- `flux`: Capture data structures (Track, Revolution, Sample)
- `analysis`: Pipeline stages and shared statistics
- `format`: Encoding formats, classifier and thresholds
- `protection`: Copy protection detection
- `processor`: Pipeline orchestration
- `buffer`: Per-disk result cache and export
- `io`: Capture file reading and writing
- `source`: Acquisition and result-sink capabilities
- `session`: Disk reads with retries
- `error`: Error types and Result alias
*/

#![warn(missing_docs)]

/// Flux analysis stages
pub mod analysis;
/// Per-disk result cache and export
pub mod buffer;
/// Processing configuration
pub mod config;
/// Error types and Result alias
pub mod error;
/// Capture data structures
pub mod flux;
/// Encoding formats and classification
pub mod format;
/// Capture file reading and writing
pub mod io;
/// Track quality map visualization
pub mod map;
/// Pipeline orchestration
pub mod processor;
/// Copy protection detection
pub mod protection;
/// Disk reads with retries
pub mod session;
/// Acquisition and result-sink capabilities
pub mod source;

// Re-export common types
pub use analysis::{Timebase, TrackDiagnostics, TrackWarning};
pub use buffer::{DiskBuffer, DiskExport, DiskInfo, TrackSummary};
pub use config::ProcessorConfig;
pub use error::{FluxError, Result};
pub use flux::{DecodedSector, Revolution, Sample, Track, CONSENSUS_ORDINAL};
pub use format::{detect_format, DiskFormat};
pub use io::CapturePacket;
pub use processor::{FluxProcessor, ProcessingResult};
pub use protection::{ProtectionDetails, ProtectionKind, ProtectionResult};
pub use session::{DiskReader, SessionReport};
pub use source::{CaptureFileSource, FluxSource, ResultSink};
