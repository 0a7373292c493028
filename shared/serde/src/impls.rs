use crate::{byte_reader::ByteReader, byte_writer::ByteWriter, error::SerdeErr, Serde, VarInt};

// Scalars. Fixed-width little-endian so that two serializations of the same
// value are byte-identical.

impl Serde for bool {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_byte(*self as u8);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SerdeErr),
        }
    }
}

impl Serde for u8 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_byte(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_byte()
    }
}

macro_rules! impl_serde_le {
    ($type:ty, $len:expr) => {
        impl Serde for $type {
            fn ser(&self, writer: &mut ByteWriter) {
                writer.write_bytes(&self.to_le_bytes());
            }

            fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
                let bytes: [u8; $len] = reader.read_bytes($len)?.try_into().map_err(|_| SerdeErr)?;
                Ok(<$type>::from_le_bytes(bytes))
            }
        }
    };
}

impl_serde_le!(u16, 2);
impl_serde_le!(u32, 4);
impl_serde_le!(u64, 8);
impl_serde_le!(i64, 8);
impl_serde_le!(f32, 4);
impl_serde_le!(f64, 8);

// Collections & compounds

impl Serde for String {
    fn ser(&self, writer: &mut ByteWriter) {
        VarInt::from_len(self.len()).ser(writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let len = VarInt::de(reader)?.to_len();
        let bytes = reader.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr)
    }
}

impl Serde for Vec<u8> {
    fn ser(&self, writer: &mut ByteWriter) {
        VarInt::from_len(self.len()).ser(writer);
        writer.write_bytes(self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let len = VarInt::de(reader)?.to_len();
        Ok(reader.read_bytes(len)?.to_vec())
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut ByteWriter) {
        match self {
            Some(value) => {
                writer.write_byte(1);
                value.ser(writer);
            }
            None => writer.write_byte(0),
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(None),
            1 => Ok(Some(T::de(reader)?)),
            _ => Err(SerdeErr),
        }
    }
}

impl<const N: usize> Serde for [f32; N] {
    fn ser(&self, writer: &mut ByteWriter) {
        for value in self {
            value.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut out = [0.0f32; N];
        for slot in &mut out {
            *slot = f32::de(reader)?;
        }
        Ok(out)
    }
}
