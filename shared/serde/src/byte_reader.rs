use crate::error::SerdeErr;

/// A cursor over a received byte buffer. Every read is bounds-checked;
/// running off the end yields [`SerdeErr`] rather than a panic, since the
/// buffer came off the wire.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let byte = *self.buffer.get(self.cursor).ok_or(SerdeErr)?;
        self.cursor += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'b [u8], SerdeErr> {
        let end = self.cursor.checked_add(len).ok_or(SerdeErr)?;
        let bytes = self.buffer.get(self.cursor..end).ok_or(SerdeErr)?;
        self.cursor = end;
        Ok(bytes)
    }

    /// Number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}
