//! Synthesized record buffers for the stream tests.

/// Frame `body` as a record with a 10-byte header and the given series id.
pub fn record(series_id: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![0xa5, 10, series_id, 0x10];
    out.extend((body.len() as u16).to_le_bytes());
    out.extend([0u8; 4]); // checksums, not validated
    out.extend_from_slice(body);
    out
}

pub fn string_record(text: &str) -> Vec<u8> {
    record(0xa0, text.as_bytes())
}

/// Fixed data offset used by [`average_profile_body`]. The status word sits
/// at byte 68 and is four bytes wide, so the arrays cannot start before 72.
pub const PROFILE_OFFSET_OF_DATA: u8 = 72;

/// Build an average-current-profile body (series id 0x16) carrying the
/// given beam-major sample arrays. An empty array clears its presence flag.
///
/// Fixed field values: serial 123456, 2021-06-08 12:30:45, sound speed
/// 1500.0 m/s, temperature 8.15 degC, cell size 2.0 m, blanking 0.5 m (mm
/// scaling), battery 12.3 V, ensemble counter 42.
pub fn average_profile_body(
    beams: u8,
    cells: u16,
    velocity_scaling: i8,
    velocity: &[i16],
    amplitude: &[u8],
    correlation: &[u8],
) -> Vec<u8> {
    let mut b = vec![0u8; usize::from(PROFILE_OFFSET_OF_DATA)];
    b[0] = 3; // version
    b[1] = PROFILE_OFFSET_OF_DATA;

    let mut flags: u16 = 0;
    if !velocity.is_empty() {
        flags |= 1 << 5;
    }
    if !amplitude.is_empty() {
        flags |= 1 << 6;
    }
    if !correlation.is_empty() {
        flags |= 1 << 7;
    }
    b[2..4].copy_from_slice(&flags.to_le_bytes());

    b[4..8].copy_from_slice(&123456u32.to_le_bytes());
    b[8..16].copy_from_slice(&[121, 5, 8, 12, 30, 45, 0, 0]);
    b[16..18].copy_from_slice(&15000u16.to_le_bytes()); // sound speed
    b[18..20].copy_from_slice(&815i16.to_le_bytes()); // temperature
    b[20..24].copy_from_slice(&10250u32.to_le_bytes()); // pressure

    // beams:4 / coordinate system:2 / cells:10
    let geometry = (u16::from(beams) << 12) | (cells & 0x3ff);
    b[30..32].copy_from_slice(&geometry.to_le_bytes());
    b[32..34].copy_from_slice(&2000u16.to_le_bytes()); // cell size
    b[36..38].copy_from_slice(&500u16.to_le_bytes()); // blanking
    b[38..40].copy_from_slice(&123u16.to_le_bytes()); // battery
    b[58] = velocity_scaling as u8;
    b[66..70].copy_from_slice(&42u32.to_le_bytes()); // ensemble counter

    for v in velocity {
        b.extend_from_slice(&v.to_le_bytes());
    }
    b.extend_from_slice(amplitude);
    b.extend_from_slice(correlation);
    b
}
