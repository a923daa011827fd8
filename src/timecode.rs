//! Instrument clock decoding.
//!
//! The AD2CP stores timestamps as six unsigned byte fields (year offset from
//! 1900, zero-based month, day, hour, minute, second) followed by a
//! little-endian u16 fraction counted in tenths of a millisecond.
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::bytes::Cursor;
use crate::Result;

/// A decoded instrument timestamp.
///
/// Fields are calendar values (`year` includes the 1900 base, `month` is
/// 1-based). No timezone is implied; the caller assigns UTC/local convention
/// externally.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Sub-second fraction in tenths of a millisecond.
    pub subsec_tenth_millis: u16,
}

impl DateTime {
    /// Encoded size in bytes.
    pub const LEN: usize = 8;

    /// Decode from the cursor, advancing it by [`DateTime::LEN`].
    ///
    /// # Errors
    /// [`crate::Error::BufferUnderrun`] if fewer than 8 bytes remain.
    pub fn decode(cursor: &mut Cursor) -> Result<Self> {
        let year = 1900 + u16::from(cursor.read_u8()?);
        // any byte is legal on the wire; a raw 0xff must not wrap
        let month = cursor.read_u8()?.saturating_add(1);
        let day = cursor.read_u8()?;
        let hour = cursor.read_u8()?;
        let minute = cursor.read_u8()?;
        let second = cursor.read_u8()?;
        let subsec_tenth_millis = cursor.read_u16()?;
        Ok(DateTime {
            year,
            month,
            day,
            hour,
            minute,
            second,
            subsec_tenth_millis,
        })
    }

    /// Compose the calendar timestamp, with 0.1 ms precision.
    ///
    /// Returns `None` when the raw fields do not name a valid calendar date
    /// or time of day; an unset clock is not a stream error.
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let micros = u32::from(self.subsec_tenth_millis) * 100;
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))?
            .and_hms_micro_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
                micros,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(dt: &DateTime) -> [u8; DateTime::LEN] {
        let frac = dt.subsec_tenth_millis.to_le_bytes();
        [
            (dt.year - 1900) as u8,
            dt.month - 1,
            dt.day,
            dt.hour,
            dt.minute,
            dt.second,
            frac[0],
            frac[1],
        ]
    }

    #[test]
    fn decode_known_bytes() {
        // 2021-06-08 12:30:45.1234
        let dat = [121, 5, 8, 12, 30, 45, 0xd2, 0x04];
        let mut c = Cursor::new(&dat);
        let dt = DateTime::decode(&mut c).unwrap();

        assert_eq!(dt.year, 2021);
        assert_eq!(dt.month, 6);
        assert_eq!(dt.day, 8);
        assert_eq!(dt.subsec_tenth_millis, 1234);
        assert_eq!(c.position(), DateTime::LEN);

        let ts = dt.timestamp().unwrap();
        assert_eq!(ts.to_string(), "2021-06-08 12:30:45.123400");
    }

    #[test]
    fn roundtrip_to_tenth_millisecond() {
        let dt = DateTime {
            year: 2024,
            month: 11,
            day: 1,
            hour: 23,
            minute: 59,
            second: 59,
            subsec_tenth_millis: 9999,
        };
        let dat = encode(&dt);
        let mut c = Cursor::new(&dat);
        let back = DateTime::decode(&mut c).unwrap();
        assert_eq!(back, dt);
        assert_eq!(back.timestamp(), dt.timestamp());
    }

    #[test]
    fn invalid_calendar_fields_are_not_an_error() {
        let dat = [100, 12, 40, 30, 61, 61, 0, 0];
        let mut c = Cursor::new(&dat);
        let dt = DateTime::decode(&mut c).unwrap();
        assert!(dt.timestamp().is_none());
    }

    #[test]
    fn month_byte_255_decodes_without_wrapping() {
        let dat = [121, 0xff, 8, 12, 30, 45, 0, 0];
        let mut c = Cursor::new(&dat);
        let dt = DateTime::decode(&mut c).unwrap();

        assert_eq!(dt.month, 255);
        assert!(dt.timestamp().is_none());
    }
}
