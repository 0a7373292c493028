use std::io;

use lockview_serde::SerdeErr;
use thiserror::Error;

/// Errors that can occur during transport operations. Every variant is
/// terminal for the side that sees it: the slave exits, the master drops its
/// connection group and keeps running unclustered. Nothing here is retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The listening endpoint could not be opened
    #[error("failed to bind listening endpoint {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    /// The master could not be reached. Checked by the slave at startup;
    /// fatal there with its own exit code.
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },

    /// Read or write on an established connection failed
    #[error("transport fault: {0}")]
    Io(#[from] io::Error),

    /// The peer sent something other than a barrier token where one was
    /// expected
    #[error("unexpected barrier token {0:#04x}")]
    BadToken(u8),

    /// A value frame arrived but its payload did not decode
    #[error("malformed value frame: {0}")]
    Serde(#[from] SerdeErr),

    /// Operation requires an established connection
    #[error("connection is not established")]
    NotConnected,
}
