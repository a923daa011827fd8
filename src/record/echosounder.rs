//! Raw echosounder records (series tags 0x23/0x24): a flat layout without
//! the profile common block, carrying in-phase/quadrature sample pairs.
use serde::{Deserialize, Serialize};

use crate::bytes::Cursor;
use crate::header::RecordHeader;
use crate::record::common::{ErrorStatus, Status};
use crate::timecode::DateTime;
use crate::Result;

/// Orientation labels for raw echosounder records. The table differs from
/// the profile-family one; kept per-kind deliberately.
#[must_use]
pub fn orientation_label(value: u8) -> &'static str {
    match value {
        4 => "UP",
        5 => "DOWN",
        7 => "AHRS",
        _ => "unknown",
    }
}

/// Auto-orientation labels for raw echosounder records.
#[must_use]
pub fn auto_orientation_label(value: u8) -> &'static str {
    match value {
        0 => "Fixed",
        1 => "Auto",
        2 => "Auto3D",
        3 => "AHRS3D",
        _ => "unknown",
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EchosounderRaw {
    pub header: RecordHeader,
    pub version: u8,
    pub offset_of_data: u8,
    pub datetime: DateTime,
    pub error_status: ErrorStatus,
    pub status: Status,
    pub serial_number: u32,
    pub number_of_samples: u32,
    pub start_sample_index: u32,
    /// Hz
    pub sampling_rate: f32,
    /// Interleaved in-phase/quadrature pairs, `2 * number_of_samples`
    /// values.
    pub samples: Vec<i32>,
}

impl EchosounderRaw {
    pub fn decode(cursor: &mut Cursor, header: &RecordHeader) -> Result<Self> {
        let data_start = header.data_start;
        let version = cursor.read_u8()?;
        let offset_of_data = cursor.read_u8()?;
        let datetime = DateTime::decode(cursor)?;
        let error_status = ErrorStatus::decode(cursor)?;
        let status = Status::decode(cursor)?;
        let serial_number = cursor.read_u32()?;
        let number_of_samples = cursor.read_u32()?;
        let start_sample_index = cursor.read_u32()?;
        let sampling_rate = cursor.read_f32()?;

        cursor.seek_to(data_start + offset_of_data as usize)?;
        let n = 2 * number_of_samples as usize;
        // reservation capped by the bytes actually remaining; an oversized
        // count fails below as a buffer underrun
        let mut samples = Vec::with_capacity(n.min(cursor.remaining() / 4));
        for _ in 0..n {
            samples.push(cursor.read_i32()?);
        }

        Ok(EchosounderRaw {
            header: *header,
            version,
            offset_of_data,
            datetime,
            error_status,
            status,
            serial_number,
            number_of_samples,
            start_sample_index,
            sampling_rate,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn per_kind_orientation_tables() {
        assert_eq!(orientation_label(4), "UP");
        assert_eq!(orientation_label(0), "unknown");
        assert_eq!(auto_orientation_label(2), "Auto3D");
        assert_eq!(auto_orientation_label(7), "unknown");
    }

    #[test]
    fn oversized_sample_count_is_an_underrun() {
        // fixed block only, no sample bytes, but a count demanding 8 GiB
        let mut body = vec![0u8; 32];
        body[0] = 1;
        body[1] = 32; // offset of data
        body[20..24].copy_from_slice(&0x4000_0000u32.to_le_bytes());

        let header = RecordHeader {
            header_size: 10,
            data_series_id: 0x23,
            family_id: 0x10,
            data_size: body.len() as u32,
            data_checksum: 0,
            header_checksum: 0,
            start: 0,
            data_start: 0,
        };
        let mut c = Cursor::new(&body);
        let err = EchosounderRaw::decode(&mut c, &header).unwrap_err();
        assert!(matches!(err, Error::BufferUnderrun { .. }));
    }
}
