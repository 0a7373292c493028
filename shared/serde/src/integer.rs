use crate::{byte_reader::ByteReader, byte_writer::ByteWriter, error::SerdeErr, Serde};

/// Variable-width unsigned integer, 7 bits per byte with a continuation
/// flag. Used for object ids, record counts, and length prefixes, which are
/// almost always small.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct VarInt {
    inner: u64,
}

impl VarInt {
    pub fn new<T: Into<u64>>(value: T) -> Self {
        Self {
            inner: value.into(),
        }
    }

    pub fn get(&self) -> u64 {
        self.inner
    }

    /// Length-prefix helper: usize does not implement Into<u64> portably,
    /// so collections go through here.
    pub fn from_len(len: usize) -> Self {
        Self { inner: len as u64 }
    }

    pub fn to_len(&self) -> usize {
        self.inner as usize
    }
}

impl Serde for VarInt {
    fn ser(&self, writer: &mut ByteWriter) {
        let mut value = self.inner;
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            writer.write_byte(byte);
            if value == 0 {
                break;
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            // 10 bytes encode up to 70 bits; an 11th continuation is garbage
            if shift > 63 {
                return Err(SerdeErr);
            }
            let byte = reader.read_byte()?;
            value |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok(Self { inner: value })
    }
}

impl From<u64> for VarInt {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}
