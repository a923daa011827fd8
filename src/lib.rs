#![doc = include_str!("../README.md")]

mod error;

pub mod bits;
pub mod bytes;
pub mod header;
pub mod nmea;
pub mod record;
pub mod stream;
pub mod timecode;

pub use bits::BitField;
pub use bytes::Cursor;
pub use error::{Error, Result};
pub use header::{RecordHeader, SYNC};
pub use record::Record;
pub use stream::{decode, Decoded, Diagnostic, StreamError};
