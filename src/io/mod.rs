/// Capture file reading and writing
///
/// A capture file is the packet stream of the acquisition hardware stored
/// as-is: for every revolution a 12-byte little-endian header (track, side,
/// revolution, flags, index time, sample count) followed by that many
/// 32-bit tick timestamps.

/// Reader implementation for capture files
pub mod reader;
/// Writer implementation for capture files
pub mod writer;

pub use reader::{parse_capture, read_capture};
pub use writer::{encode_capture, write_capture};

use crate::flux::Revolution;

/// Size of a packet header in bytes
pub const PACKET_HEADER_SIZE: usize = 12;

/// Size of one sample timestamp in bytes
pub const SAMPLE_SIZE: usize = 4;

/// Flag bit set when the index pulse was seen
pub const FLAG_INDEX_FOUND: u8 = 0x01;

/// Flag bit set when the capture buffer overflowed
pub const FLAG_OVERFLOW: u8 = 0x02;

/// One captured revolution with its position
#[derive(Debug, Clone, PartialEq)]
pub struct CapturePacket {
    /// Physical track number
    pub track: u8,
    /// Physical side number
    pub side: u8,
    /// Raw capture flags
    pub flags: u8,
    /// Captured revolution (raw ticks, not normalized)
    pub revolution: Revolution,
}

impl CapturePacket {
    /// Create a packet for a cleanly captured revolution
    pub fn new(track: u8, side: u8, revolution: Revolution) -> Self {
        Self {
            track,
            side,
            flags: FLAG_INDEX_FOUND,
            revolution,
        }
    }

    /// Check if the index pulse was seen during capture
    pub fn index_found(&self) -> bool {
        self.flags & FLAG_INDEX_FOUND != 0
    }

    /// Check if samples were lost to a buffer overflow
    pub fn overflow(&self) -> bool {
        self.flags & FLAG_OVERFLOW != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_flags() {
        let mut packet = CapturePacket::new(0, 0, Revolution::from_ticks(0, 0, &[]));
        assert!(packet.index_found());
        assert!(!packet.overflow());

        packet.flags = FLAG_OVERFLOW;
        assert!(!packet.index_found());
        assert!(packet.overflow());
    }
}
