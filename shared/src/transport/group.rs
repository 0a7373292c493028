use std::{
    io,
    net::{SocketAddr, TcpListener},
};

use log::{debug, info};

use lockview_serde::Serde;

use super::{connection::Connection, error::TransportError};

/// Index of one point connection within a [`ConnectionGroup`].
pub type Channel = usize;

/// The master's side of the cluster fabric: one listening endpoint and one
/// point connection per slave, created during startup and never resized.
///
/// Writes (`signal`, `put_value`, `flush`) broadcast to every channel so all
/// slaves observe the same frame; reads are per channel.
pub struct ConnectionGroup {
    listener: Option<TcpListener>,
    channels: Vec<Connection>,
}

impl ConnectionGroup {
    pub fn new() -> Self {
        Self {
            listener: None,
            channels: Vec::new(),
        }
    }

    /// Opens the listening endpoint. An address with an empty host part
    /// (":<port>") binds every interface; only the port matters then.
    pub fn bind(&mut self, addr: &str) -> Result<(), TransportError> {
        if self.listener.is_some() {
            return Err(TransportError::Bind {
                addr: addr.to_string(),
                source: io::Error::new(io::ErrorKind::AddrInUse, "endpoint already bound"),
            });
        }

        let bind_addr = if let Some(port) = addr.strip_prefix(':') {
            format!("0.0.0.0:{port}")
        } else {
            addr.to_string()
        };

        let listener = TcpListener::bind(&bind_addr).map_err(|source| TransportError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
        info!("transport: listening on {bind_addr}");
        self.listener = Some(listener);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.listener.is_some()
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Blocks until one peer connects and returns its channel handle. No
    /// timeout: if the expected peer never shows up, neither does this call
    /// return.
    pub fn accept_point(&mut self) -> Result<Channel, TransportError> {
        let listener = self.listener.as_ref().ok_or(TransportError::NotConnected)?;
        let (stream, peer) = listener.accept()?;
        debug!("transport: accepted connection from {peer}");
        self.channels.push(Connection::from_stream(stream)?);
        Ok(self.channels.len() - 1)
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Raises the barrier on every channel.
    pub fn signal(&mut self) -> Result<(), TransportError> {
        for channel in &mut self.channels {
            channel.signal()?;
        }
        Ok(())
    }

    /// Buffers one typed value for every channel.
    pub fn put_value<T: Serde>(&mut self, value: &T) -> Result<(), TransportError> {
        for channel in &mut self.channels {
            channel.put_value(value)?;
        }
        Ok(())
    }

    /// Blocks on one channel for a single typed value.
    pub fn get_value_from<T: Serde>(&mut self, channel: Channel) -> Result<T, TransportError> {
        self.channels
            .get_mut(channel)
            .ok_or(TransportError::NotConnected)?
            .get_value()
    }

    /// Direct access to one channel, for traffic aimed at a single slave.
    pub fn channel_mut(&mut self, channel: Channel) -> Option<&mut Connection> {
        self.channels.get_mut(channel)
    }

    /// Pushes every channel's buffered writes onto the wire.
    pub fn flush(&mut self) -> Result<(), TransportError> {
        for channel in &mut self.channels {
            channel.flush()?;
        }
        Ok(())
    }

    /// Releases every connection and the listening endpoint. Idempotent.
    pub fn disconnect(&mut self) {
        for channel in &mut self.channels {
            channel.disconnect();
        }
        self.channels.clear();
        self.listener = None;
    }
}

impl Default for ConnectionGroup {
    fn default() -> Self {
        Self::new()
    }
}
