use std::{
    io::{BufReader, Read, Write},
    net::{Shutdown, SocketAddr, TcpStream},
};

use log::debug;

use lockview_serde::{ByteReader, ByteWriter, Serde, SerdeErr, VarInt};

use super::error::TransportError;

// Barrier tokens. The master raises the barrier once per frame; the token
// tells the waiting side whether a state block follows.
pub(crate) const SYNC_DATA: u8 = 0xD1;
pub(crate) const SYNC_IDLE: u8 = 0x1D;

/// A point-to-point byte stream to one peer.
///
/// Writes are buffered locally until [`flush`](Self::flush) pushes them onto
/// the wire in one burst; reads block. [`wait`](Self::wait) is the only
/// suspension point in the protocol and has no timeout; deployments assume
/// a trusted, always-available LAN.
///
/// Every value goes over the wire as a frame: varint payload length followed
/// by the payload bytes, so the reading side never has to guess sizes.
pub struct Connection {
    peer: SocketAddr,
    writer: Option<TcpStream>,
    reader: Option<BufReader<TcpStream>>,
    send_buffer: ByteWriter,
}

impl Connection {
    /// Blocks until connected or refused. A refused or unreachable master is
    /// reported as [`TransportError::Connect`] for the caller to check; the
    /// slave maps it to its connect-failure exit code.
    pub fn connect_point(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).map_err(|source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        })?;
        debug!("transport: connected to {addr}");
        Self::from_stream(stream)
    }

    /// Wraps an accepted stream. Used by the group's accept loop.
    pub(crate) fn from_stream(stream: TcpStream) -> Result<Self, TransportError> {
        stream.set_nodelay(true)?;
        let peer = stream.peer_addr()?;
        let read_half = stream.try_clone()?;
        Ok(Self {
            peer,
            writer: Some(stream),
            reader: Some(BufReader::new(read_half)),
            send_buffer: ByteWriter::new(),
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_connected(&self) -> bool {
        self.writer.is_some()
    }

    /// Raises the barrier: the peer's `wait()` returns true and a state
    /// block follows. Buffered like any other write.
    pub fn signal(&mut self) -> Result<(), TransportError> {
        self.ensure_connected()?;
        self.send_buffer.write_byte(SYNC_DATA);
        Ok(())
    }

    /// Raises the barrier with nothing following; the peer's `wait()`
    /// returns false.
    pub fn signal_idle(&mut self) -> Result<(), TransportError> {
        self.ensure_connected()?;
        self.send_buffer.write_byte(SYNC_IDLE);
        Ok(())
    }

    /// Blocks until the peer raises the barrier. Returns whether data
    /// follows. Any other byte in the token position is a protocol fault.
    pub fn wait(&mut self) -> Result<bool, TransportError> {
        match self.read_byte()? {
            SYNC_DATA => Ok(true),
            SYNC_IDLE => Ok(false),
            other => Err(TransportError::BadToken(other)),
        }
    }

    /// Buffers one typed value as a length-framed payload.
    pub fn put_value<T: Serde>(&mut self, value: &T) -> Result<(), TransportError> {
        self.ensure_connected()?;
        let mut payload = ByteWriter::new();
        value.ser(&mut payload);
        VarInt::from_len(payload.len()).ser(&mut self.send_buffer);
        self.send_buffer.write_bytes(payload.as_slice());
        Ok(())
    }

    /// Blocks until one value frame arrives and decodes it. The frame must
    /// be consumed exactly; leftover payload bytes mean the two sides
    /// disagree about the type and that is a fault, not a skew to paper
    /// over.
    pub fn get_value<T: Serde>(&mut self) -> Result<T, TransportError> {
        let len = self.read_varint()? as usize;
        let mut payload = vec![0u8; len];
        let reader = self.reader.as_mut().ok_or(TransportError::NotConnected)?;
        reader.read_exact(&mut payload)?;

        let mut byte_reader = ByteReader::new(&payload);
        let value = T::de(&mut byte_reader)?;
        if !byte_reader.is_exhausted() {
            return Err(TransportError::Serde(SerdeErr));
        }
        Ok(value)
    }

    /// Forces everything buffered onto the wire.
    pub fn flush(&mut self) -> Result<(), TransportError> {
        let writer = self.writer.as_mut().ok_or(TransportError::NotConnected)?;
        let buffered = std::mem::take(&mut self.send_buffer).to_bytes();
        if !buffered.is_empty() {
            writer.write_all(&buffered)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Releases the connection. Idempotent; pending buffered writes are
    /// dropped.
    pub fn disconnect(&mut self) {
        if let Some(stream) = self.writer.take() {
            let _ = stream.shutdown(Shutdown::Both);
            debug!("transport: disconnected from {}", self.peer);
        }
        self.reader = None;
        self.send_buffer = ByteWriter::new();
    }

    fn ensure_connected(&self) -> Result<(), TransportError> {
        if self.writer.is_some() {
            Ok(())
        } else {
            Err(TransportError::NotConnected)
        }
    }

    fn read_byte(&mut self) -> Result<u8, TransportError> {
        let reader = self.reader.as_mut().ok_or(TransportError::NotConnected)?;
        let mut buf = [0u8; 1];
        reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    // Streaming twin of VarInt::de: the length prefix has to be pulled off
    // the socket byte by byte.
    fn read_varint(&mut self) -> Result<u64, TransportError> {
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            if shift > 63 {
                return Err(TransportError::Serde(SerdeErr));
            }
            let byte = self.read_byte()?;
            value |= ((byte & 0x7F) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
