//! Synthetic wire encoder shared by the integration tests.
#![allow(dead_code)]

/// One encodable IO element: (value width in bytes, io id, raw value).
pub type IoElement = (usize, u16, u64);

/// Encode a record in wire order: GPS block, event id + total IO count,
/// then the four IO groups in 1/2/4/8-byte width order.
#[allow(clippy::too_many_arguments)]
pub fn encode_record(
    timestamp_ms: u64,
    priority: u8,
    lon_raw: i32,
    lat_raw: i32,
    altitude: i16,
    angle: u16,
    satellites: u8,
    speed: u16,
    io_elements: &[IoElement],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&timestamp_ms.to_be_bytes());
    out.push(priority);
    out.extend_from_slice(&lon_raw.to_be_bytes());
    out.extend_from_slice(&lat_raw.to_be_bytes());
    out.extend_from_slice(&altitude.to_be_bytes());
    out.extend_from_slice(&angle.to_be_bytes());
    out.push(satellites);
    out.extend_from_slice(&speed.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // event io id
    out.extend_from_slice(&(io_elements.len() as u16).to_be_bytes());
    for width in [1usize, 2, 4, 8] {
        let group: Vec<&IoElement> =
            io_elements.iter().filter(|(w, _, _)| *w == width).collect();
        out.extend_from_slice(&(group.len() as u16).to_be_bytes());
        for (_, id, value) in group {
            out.extend_from_slice(&id.to_be_bytes());
            out.extend_from_slice(&value.to_be_bytes()[8 - width..]);
        }
    }
    out
}

/// Minimal valid record carrying only the GPS block.
pub fn bare_record(timestamp_ms: u64, speed: u16) -> Vec<u8> {
    encode_record(
        timestamp_ms,
        0,
        144_123_456,
        -504_987_654,
        250,
        90,
        9,
        speed,
        &[],
    )
}
