use thiserror::Error;

use lockview_shared::{ReplicationError, TransportError};

/// A fault on the master's side of the cluster fabric. During startup this
/// propagates to the application; during the frame loop the coordinator
/// swallows it and degrades to unclustered operation instead.
#[derive(Debug, Error)]
pub enum MasterError {
    #[error("transport fault: {0}")]
    Transport(#[from] TransportError),

    #[error("state replication fault: {0}")]
    Replication(#[from] ReplicationError),
}
