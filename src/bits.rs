use crate::{Error, Result};

/// Bit cursor over a byte span whose byte order is reversed before any bits
/// are taken.
///
/// The instrument packs every multi-byte bit-field word (presence flags,
/// status words, wave processing flags) so that a plain MSB-first bit walk
/// only lines up with the documented field order after the span's bytes are
/// reversed. For a little-endian word this is the same as walking the
/// numeric value from its most significant bit down.
pub struct BitField {
    bytes: Vec<u8>,
    pos: usize,
}

impl BitField {
    /// Wrap `span`, reversing its byte order.
    #[must_use]
    pub fn new(span: &[u8]) -> Self {
        let mut bytes = span.to_vec();
        bytes.reverse();
        BitField { bytes, pos: 0 }
    }

    /// Total width of the word in bits.
    #[must_use]
    pub fn width(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Bits consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Consume the next `n` bits MSB-first, `1 <= n <= 32`.
    ///
    /// # Errors
    /// [`Error::BitfieldOverrun`] if fewer than `n` bits remain.
    pub fn take_bits(&mut self, n: usize) -> Result<u32> {
        assert!(n >= 1 && n <= 32, "bit run of {n} out of range");
        if self.pos + n > self.width() {
            return Err(Error::BitfieldOverrun {
                offset: self.pos,
                needed: n,
                width: self.width(),
            });
        }
        let mut out: u32 = 0;
        for _ in 0..n {
            let byte = self.bytes[self.pos / 8];
            let bit = (byte >> (7 - self.pos % 8)) & 1;
            out = (out << 1) | u32::from(bit);
            self.pos += 1;
        }
        Ok(out)
    }

    pub fn take_bit(&mut self) -> Result<bool> {
        Ok(self.take_bits(1)? == 1)
    }

    pub fn skip_bits(&mut self, n: usize) -> Result<()> {
        if self.pos + n > self.width() {
            return Err(Error::BitfieldOverrun {
                offset: self.pos,
                needed: n,
                width: self.width(),
            });
        }
        self.pos += n;
        Ok(())
    }
}
