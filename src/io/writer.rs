/// Capture file writer

use crate::error::{FluxError, Result};
use crate::io::{CapturePacket, PACKET_HEADER_SIZE, SAMPLE_SIZE};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write packets to a capture file
pub fn write_capture<P: AsRef<Path>>(path: P, packets: &[CapturePacket]) -> Result<()> {
    let data = encode_capture(packets)?;
    let mut file = File::create(path)?;
    file.write_all(&data)?;
    Ok(())
}

/// Encode packets as a capture stream
pub fn encode_capture(packets: &[CapturePacket]) -> Result<Vec<u8>> {
    let total: usize = packets
        .iter()
        .map(|p| PACKET_HEADER_SIZE + p.revolution.sample_count() * SAMPLE_SIZE)
        .sum();
    let mut out = Vec::with_capacity(total);

    for packet in packets {
        let rev = &packet.revolution;
        let count = u32::try_from(rev.sample_count()).map_err(|_| {
            FluxError::invalid_capture(format!(
                "Track {}/{} rev {} has too many samples",
                packet.track, packet.side, rev.ordinal
            ))
        })?;

        out.push(packet.track);
        out.push(packet.side);
        out.push(rev.ordinal);
        out.push(packet.flags);
        out.extend_from_slice(&rev.index_ticks.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        for sample in rev.samples() {
            out.extend_from_slice(&sample.tick.to_le_bytes());
        }
    }

    Ok(out)
}
