/// Capture file reader

use crate::error::{FluxError, Result};
use crate::flux::{Revolution, CONSENSUS_ORDINAL};
use crate::io::{CapturePacket, PACKET_HEADER_SIZE, SAMPLE_SIZE};
use std::path::Path;
use tracing::{debug, warn};

/// Read a capture file from disk
pub fn read_capture<P: AsRef<Path>>(path: P) -> Result<Vec<CapturePacket>> {
    let data = std::fs::read(path.as_ref())?;
    let packets = parse_capture(&data)?;
    debug!(
        "Read {} packets from {}",
        packets.len(),
        path.as_ref().display()
    );
    Ok(packets)
}

/// Parse a capture packet stream
pub fn parse_capture(data: &[u8]) -> Result<Vec<CapturePacket>> {
    let mut packets = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let packet = read_packet(data, offset)?;
        offset += PACKET_HEADER_SIZE + packet.revolution.sample_count() * SAMPLE_SIZE;
        packets.push(packet);
    }

    Ok(packets)
}

/// Read a single packet starting at `offset`
fn read_packet(data: &[u8], offset: usize) -> Result<CapturePacket> {
    let header = data
        .get(offset..offset + PACKET_HEADER_SIZE)
        .ok_or_else(|| FluxError::parse(offset, "Truncated packet header"))?;

    let track = header[0];
    let side = header[1];
    let ordinal = header[2];
    let flags = header[3];
    let index_ticks = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let sample_count = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;

    if ordinal == CONSENSUS_ORDINAL {
        return Err(FluxError::ReservedRevolution(ordinal));
    }

    let body_start = offset + PACKET_HEADER_SIZE;
    let body = sample_count
        .checked_mul(SAMPLE_SIZE)
        .and_then(|len| data.get(body_start..body_start.checked_add(len)?))
        .ok_or_else(|| {
            FluxError::parse(
                body_start,
                format!("Truncated sample block, expected {} samples", sample_count),
            )
        })?;

    let ticks: Vec<u32> = body
        .chunks_exact(SAMPLE_SIZE)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let packet = CapturePacket {
        track,
        side,
        flags,
        revolution: Revolution::from_ticks(ordinal, index_ticks, &ticks),
    };

    if packet.overflow() {
        warn!(
            "Track {}/{} rev {}: capture overflow, samples were lost",
            track, side, ordinal
        );
    }
    if !packet.index_found() {
        warn!("Track {}/{} rev {}: no index pulse", track, side, ordinal);
    }
    if let Some(position) = first_tick_decrease(&ticks) {
        warn!(
            "Track {}/{} rev {}: tick decreases at sample {}",
            track, side, ordinal, position
        );
    }

    Ok(packet)
}

/// Index of the first sample whose tick is lower than the one before it
fn first_tick_decrease(ticks: &[u32]) -> Option<usize> {
    ticks.windows(2).position(|w| w[1] < w[0]).map(|i| i + 1)
}
