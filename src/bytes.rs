use crate::{Error, Result};

/// Cursor provides bounded little-endian scalar reads over the input buffer
/// together with an absolute byte position.
///
/// Body decoders move the cursor with [`Cursor::seek_to`] using offsets
/// anchored at a record's data start; there is deliberately no seek-by-delta
/// so that backward seeks cannot pick up sign bugs.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    /// Current absolute offset into the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Move to an absolute offset. An offset equal to the buffer length is
    /// valid (the end-of-buffer position).
    ///
    /// # Errors
    /// [`Error::BufferUnderrun`] if `offset` is past the end of the buffer.
    pub fn seek_to(&mut self, offset: usize) -> Result<()> {
        if offset > self.buf.len() {
            return Err(Error::BufferUnderrun {
                offset: self.pos,
                needed: offset - self.pos,
                available: self.remaining(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Consume `n` bytes and return them as a slice.
    ///
    /// # Errors
    /// [`Error::BufferUnderrun`] if fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::BufferUnderrun {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            });
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let b = self.take(2)?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
