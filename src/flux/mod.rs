/// Flux capture data structures

/// Revolution definition and consensus marker
pub mod revolution;
/// Single flux transition
pub mod sample;
/// Decoded sector placeholder
pub mod sector;
/// Track definition
pub mod track;

pub use revolution::{Revolution, CONSENSUS_ORDINAL};
pub use sample::Sample;
pub use sector::DecodedSector;
pub use track::Track;
