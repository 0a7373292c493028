use thiserror::Error;

use lockview_shared::{exit_codes, ReplicationError, TransportError};

/// A fault on the slave's side of the cluster fabric. Every variant is
/// fatal: the slave never retries or reconnects, it exits with the code for
/// the kind of fault it hit.
#[derive(Debug, Error)]
pub enum SlaveError {
    /// The master could not be reached at startup
    #[error("failed to connect to master: {0}")]
    ConnectFailure(TransportError),

    /// The initial snapshot held no object with the configured root name
    #[error("scene root '{0}' not present in the initial snapshot")]
    RootNotFound(String),

    /// Transport fault after the connection was established
    #[error("communication fault: {0}")]
    Comm(#[from] TransportError),

    /// A received state block did not apply cleanly
    #[error("state replication fault: {0}")]
    Replication(#[from] ReplicationError),
}

impl SlaveError {
    /// The single switch from error kind to process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            SlaveError::ConnectFailure(_) => exit_codes::CONNECT_FAIL,
            SlaveError::RootNotFound(_) => exit_codes::ROOT_NOT_FOUND,
            SlaveError::Comm(_) | SlaveError::Replication(_) => exit_codes::COMM_ERROR,
        }
    }
}
