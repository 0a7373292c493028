//! # Lockview Serde
//! Byte-oriented serialization primitives shared between the lockview-master
//! & lockview-slave crates. Scalars are written fixed-width little-endian;
//! ids and lengths use a variable-width encoding.

mod byte_reader;
mod byte_writer;
mod error;
mod impls;
mod integer;

pub use byte_reader::ByteReader;
pub use byte_writer::ByteWriter;
pub use error::SerdeErr;
pub use integer::VarInt;

/// A type that can be written to a [`ByteWriter`] and read back from a
/// [`ByteReader`]. Writing the same value twice produces identical bytes.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut ByteWriter);

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;
}
