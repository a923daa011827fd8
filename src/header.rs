use serde::{Deserialize, Serialize};

use crate::bytes::Cursor;
use crate::{Error, Result};

/// Marker byte starting every record.
pub const SYNC: u8 = 0xa5;

/// The fixed 10- or 12-byte record header.
///
/// `header_size` selects the width of `data_size` (10 bytes carries a u16,
/// 12 bytes a u32). The record occupies exactly
/// `header_size + data_size` bytes starting at `start`; `data_start` is the
/// anchor for every offset declared inside the body.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub header_size: u8,
    /// Tag selecting the body decoder.
    pub data_series_id: u8,
    pub family_id: u8,
    pub data_size: u32,
    pub data_checksum: u16,
    pub header_checksum: u16,
    /// Offset of the sync byte in the input buffer.
    pub start: usize,
    /// Offset of the first body byte.
    pub data_start: usize,
}

impl RecordHeader {
    /// Smallest possible header length.
    pub const MIN_LEN: usize = 10;

    /// Decode a header at the cursor's current position.
    ///
    /// # Errors
    /// [`Error::InvalidSync`] if the first byte is not [`SYNC`] — fatal for
    /// the whole stream, the framing cannot be trusted.
    /// [`Error::UnsupportedHeaderSize`] for a header size other than 10
    /// or 12. [`Error::BufferUnderrun`] if the buffer ends inside the
    /// header.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let start = cursor.position();
        let sync = cursor.read_u8()?;
        if sync != SYNC {
            return Err(Error::InvalidSync {
                offset: start,
                byte: sync,
            });
        }
        let header_size = cursor.read_u8()?;
        let data_series_id = cursor.read_u8()?;
        let family_id = cursor.read_u8()?;
        let data_size = match header_size {
            10 => u32::from(cursor.read_u16()?),
            12 => cursor.read_u32()?,
            size => {
                return Err(Error::UnsupportedHeaderSize {
                    offset: start,
                    size,
                })
            }
        };
        let data_checksum = cursor.read_u16()?;
        let header_checksum = cursor.read_u16()?;
        Ok(RecordHeader {
            header_size,
            data_series_id,
            family_id,
            data_size,
            data_checksum,
            header_checksum,
            start,
            data_start: start + header_size as usize,
        })
    }

    /// Offset one past the record's last byte.
    #[must_use]
    pub fn data_end(&self) -> usize {
        self.data_start + self.data_size as usize
    }

    #[must_use]
    pub fn family_label(&self) -> &'static str {
        match self.family_id {
            0x10 => "Signature",
            0x16 => "DVL",
            0x30 => "Aquadopp Generation 2",
            0x40 => "Awac Generation 2",
            _ => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_short_header() {
        let dat = [0xa5, 10, 0x16, 0x10, 0x34, 0x12, 0xaa, 0xbb, 0xcc, 0xdd];
        let mut c = Cursor::new(&dat);
        let h = RecordHeader::decode(&mut c).unwrap();

        assert_eq!(h.header_size, 10);
        assert_eq!(h.data_series_id, 0x16);
        assert_eq!(h.family_id, 0x10);
        assert_eq!(h.family_label(), "Signature");
        assert_eq!(h.data_size, 0x1234);
        assert_eq!(h.data_checksum, 0xbbaa);
        assert_eq!(h.header_checksum, 0xddcc);
        assert_eq!(h.data_start, 10);
        assert_eq!(h.data_end(), 10 + 0x1234);
        assert_eq!(c.position(), 10);
    }

    #[test]
    fn decode_long_header() {
        let dat = [
            0xa5, 12, 0x30, 0x30, 0x78, 0x56, 0x34, 0x12, 0x01, 0x00, 0x02, 0x00,
        ];
        let mut c = Cursor::new(&dat);
        let h = RecordHeader::decode(&mut c).unwrap();

        assert_eq!(h.header_size, 12);
        assert_eq!(h.data_size, 0x1234_5678);
        assert_eq!(h.data_start, 12);
        assert_eq!(h.family_label(), "Aquadopp Generation 2");
    }

    #[test]
    fn bad_sync_is_fatal() {
        let dat = [0xa4, 10, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut c = Cursor::new(&dat);
        assert_eq!(
            RecordHeader::decode(&mut c).unwrap_err(),
            Error::InvalidSync {
                offset: 0,
                byte: 0xa4
            }
        );
    }

    #[test]
    fn unsupported_header_size() {
        let dat = [0xa5, 11, 0, 0, 0, 0, 0, 0, 0, 0];
        let mut c = Cursor::new(&dat);
        assert_eq!(
            RecordHeader::decode(&mut c).unwrap_err(),
            Error::UnsupportedHeaderSize { offset: 0, size: 11 }
        );
    }
}
