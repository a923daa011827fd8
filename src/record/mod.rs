//! Record bodies and the tag-dispatched decode.
pub mod common;
pub mod echosounder;
pub mod profile;
pub mod wave;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::bytes::Cursor;
use crate::header::RecordHeader;
use crate::Result;

pub use common::{
    CommonData, ErrorStatus, ExtendedStatus, PresenceFlags, ProfileCommon, Status,
};
pub use echosounder::EchosounderRaw;
pub use profile::{
    Ahrs, Altimeter, AltimeterRaw, Ast, CoordinateSystem, CurrentProfile, EchosounderProfile,
    Spectrum, SpectrumProfile, StdDeviation, StmExtension,
};
pub use wave::{
    WaveBand, WaveContent, WaveData, WaveError, WaveParameters, WaveSpectrum, WaveStatus,
};

/// Data series ids selecting the body decoder.
pub mod series {
    pub const BURST: u8 = 0x15;
    pub const AVERAGE: u8 = 0x16;
    pub const BURST_INTERLEAVED: u8 = 0x18;
    pub const BURST_ALTIMETER_RAW: u8 = 0x1a;
    pub const ECHOSOUNDER: u8 = 0x1c;
    pub const ALTIMETER: u8 = 0x1e;
    pub const AVERAGE_ALTIMETER_RAW: u8 = 0x1f;
    pub const SPECTRUM: u8 = 0x20;
    pub const ECHOSOUNDER_RAW: u8 = 0x23;
    pub const ECHOSOUNDER_RAW_TRANSMIT: u8 = 0x24;
    pub const WAVE: u8 = 0x30;
    pub const STRING: u8 = 0xa0;
}

/// A record whose body is plain text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RawString {
    pub header: RecordHeader,
    pub text: String,
}

impl RawString {
    pub fn decode(cursor: &mut Cursor, header: &RecordHeader) -> Result<Self> {
        let text = String::from_utf8_lossy(cursor.take(header.data_size as usize)?).into_owned();
        Ok(RawString {
            header: *header,
            text,
        })
    }
}

/// A record with an unrecognized series id. The body is not decoded; the
/// stream driver skips it using the header's declared length.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct UnknownRecord {
    pub header: RecordHeader,
}

/// One decoded record of any kind.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Record {
    CurrentProfile(CurrentProfile),
    EchosounderProfile(EchosounderProfile),
    EchosounderRaw(EchosounderRaw),
    SpectrumProfile(SpectrumProfile),
    Wave(WaveData),
    RawString(RawString),
    Unknown(UnknownRecord),
}

impl Record {
    #[must_use]
    pub fn header(&self) -> &RecordHeader {
        match self {
            Record::CurrentProfile(r) => &r.header,
            Record::EchosounderProfile(r) => &r.header,
            Record::EchosounderRaw(r) => &r.header,
            Record::SpectrumProfile(r) => &r.header,
            Record::Wave(r) => &r.header,
            Record::RawString(r) => &r.header,
            Record::Unknown(r) => &r.header,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Record::CurrentProfile(_) => "current profile",
            Record::EchosounderProfile(_) => "echosounder profile",
            Record::EchosounderRaw(_) => "echosounder raw",
            Record::SpectrumProfile(_) => "spectrum profile",
            Record::Wave(_) => "wave",
            Record::RawString(_) => "string",
            Record::Unknown(_) => "unknown",
        }
    }
}

/// Decode the body selected by the header's series id, with the cursor at
/// the record's data start. Returns `None` for an unrecognized series id;
/// the caller skips the body via the header's declared length.
pub(crate) fn decode_body(cursor: &mut Cursor, header: &RecordHeader) -> Result<Option<Record>> {
    use series::*;
    trace!(
        series_id = header.data_series_id,
        offset = header.start,
        "decoding record body"
    );
    let record = match header.data_series_id {
        BURST | AVERAGE | BURST_INTERLEAVED | BURST_ALTIMETER_RAW | ALTIMETER
        | AVERAGE_ALTIMETER_RAW => {
            Record::CurrentProfile(CurrentProfile::decode(cursor, header)?)
        }
        ECHOSOUNDER => Record::EchosounderProfile(EchosounderProfile::decode(cursor, header)?),
        ECHOSOUNDER_RAW | ECHOSOUNDER_RAW_TRANSMIT => {
            Record::EchosounderRaw(EchosounderRaw::decode(cursor, header)?)
        }
        SPECTRUM => Record::SpectrumProfile(SpectrumProfile::decode(cursor, header)?),
        WAVE => Record::Wave(WaveData::decode(cursor, header)?),
        STRING => Record::RawString(RawString::decode(cursor, header)?),
        _ => return Ok(None),
    };
    Ok(Some(record))
}
