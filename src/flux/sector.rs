/// Decoded sector data structures
///
/// The pipeline classifies tracks at the flux-timing level only, so
/// results always carry an empty sector list. The type exists so that the
/// result shape stays stable once channel decoding is added.

/// A sector recovered from a track
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSector {
    /// Sector number as recorded in its ID field
    pub number: u8,
    /// Sector payload
    pub data: Vec<u8>,
    /// Whether the data CRC matched
    pub crc_ok: bool,
    /// Sector-level quality (0-100)
    pub quality: f64,
    /// Weak-bit positions within the sector
    pub weak_bits: Vec<usize>,
}
