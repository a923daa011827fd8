//! Tolerant driver walking a buffer of back-to-back records.
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bytes::Cursor;
use crate::header::RecordHeader;
use crate::record::{self, Record, UnknownRecord};
use crate::Error;

/// A non-fatal irregularity noticed while decoding. The affected record is
/// still produced; diagnostics let a caller audit how clean the stream was.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A body decoder stopped short of, or read past, the record length the
    /// header declared. `drift` is the declared record end minus the decoder
    /// position, so positive means unread trailing bytes.
    LengthDrift {
        offset: usize,
        series_id: u8,
        drift: i64,
    },
    /// A series id with no decoder. The record is kept as
    /// [`Record::Unknown`] and its body skipped.
    UnknownSeries { offset: usize, series_id: u8 },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::LengthDrift {
                offset,
                series_id,
                drift,
            } => write!(
                f,
                "record {series_id:#04x} at offset {offset}: decoder drifted {drift} bytes from declared length"
            ),
            Diagnostic::UnknownSeries { offset, series_id } => {
                write!(f, "unknown series id {series_id:#04x} at offset {offset}")
            }
        }
    }
}

/// The outcome of decoding a whole buffer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Decoded {
    pub records: Vec<Record>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A fatal decode failure, carrying everything decoded before it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("stream decode failed at offset {offset}: {source}")]
pub struct StreamError {
    pub offset: usize,
    pub source: Error,
    /// Records and diagnostics accumulated before the failure.
    pub partial: Decoded,
}

/// Decode every record in `buf`.
///
/// Records follow each other back to back; each one's full extent is
/// `header_size + data_size` from its sync byte, and the next record is
/// sought from that boundary no matter where the body decoder stopped. A
/// final record cut off by the end of the buffer is dropped silently;
/// anything else that prevents framing (bad sync, unsupported header size,
/// a body read escaping the buffer) is fatal and returns a [`StreamError`]
/// with the partial results.
pub fn decode(buf: &[u8]) -> std::result::Result<Decoded, StreamError> {
    let mut cursor = Cursor::new(buf);
    let mut decoded = Decoded::default();

    while !cursor.is_empty() {
        let offset = cursor.position();
        let header = match RecordHeader::decode(&mut cursor) {
            Ok(header) => header,
            // Truncated tail: the buffer ends inside the header.
            Err(Error::BufferUnderrun { .. }) => break,
            Err(source) => {
                return Err(StreamError {
                    offset,
                    source,
                    partial: decoded,
                })
            }
        };
        // Truncated tail: the header promises more body than remains.
        if header.data_end() > buf.len() {
            debug!(
                offset,
                series_id = header.data_series_id,
                "dropping record truncated by end of buffer"
            );
            break;
        }

        match record::decode_body(&mut cursor, &header) {
            Ok(Some(record)) => {
                let drift = header.data_end() as i64 - cursor.position() as i64;
                if drift != 0 {
                    warn!(
                        offset,
                        series_id = header.data_series_id,
                        drift,
                        "record decoder drifted from declared length"
                    );
                    decoded.diagnostics.push(Diagnostic::LengthDrift {
                        offset,
                        series_id: header.data_series_id,
                        drift,
                    });
                }
                decoded.records.push(record);
            }
            // Unknown bodies are never decoded; the reconciliation seek
            // below is what skips them, so there is no drift to report.
            Ok(None) => {
                warn!(
                    offset,
                    series_id = header.data_series_id,
                    "skipping record with unknown series id"
                );
                decoded.diagnostics.push(Diagnostic::UnknownSeries {
                    offset,
                    series_id: header.data_series_id,
                });
                decoded.records.push(Record::Unknown(UnknownRecord { header }));
            }
            Err(source) => {
                return Err(StreamError {
                    offset,
                    source,
                    partial: decoded,
                })
            }
        }

        // data_end() <= buf.len() was checked above, so this cannot fail.
        if let Err(source) = cursor.seek_to(header.data_end()) {
            return Err(StreamError {
                offset,
                source,
                partial: decoded,
            });
        }
    }

    Ok(decoded)
}
