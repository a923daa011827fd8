#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The byte at a record boundary is not the sync marker. The stream
    /// framing cannot be trusted past this point.
    #[error("invalid sync byte {byte:#04x} at offset {offset}")]
    InvalidSync { offset: usize, byte: u8 },

    #[error("unsupported header size {size} at offset {offset}")]
    UnsupportedHeaderSize { offset: usize, size: u8 },

    /// A fixed-width or length-computed read past the end of the buffer.
    #[error("buffer underrun at offset {offset}: need {needed} bytes, {available} available")]
    BufferUnderrun {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A bit run past the end of a bit-packed word. Well-formed data never
    /// triggers this; it indicates a decoder/format mismatch.
    #[error("bitfield overrun: need {needed} bits at bit offset {offset} of a {width}-bit word")]
    BitfieldOverrun {
        offset: usize,
        needed: usize,
        width: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
