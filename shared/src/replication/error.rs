use lockview_serde::SerdeErr;
use thiserror::Error;

use crate::world::ObjectId;

/// Errors raised while applying a received state block. All of these are
/// fatal for the caller: the replication layer never retries, and a
/// coordinator that sees one treats it as a communication fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// The block's bytes could not be decoded
    #[error("malformed state block: {0}")]
    Serde(#[from] SerdeErr),

    /// A record carried a kind tag outside the closed Created/Changed/
    /// Destroyed set
    #[error("record kind tag {0:#04x} is not recognized")]
    UnknownKind(u8),

    /// A Changed or Destroyed record referenced an object that has not been
    /// created. Forward references within one block are not supported.
    #[error("record references object {0:?} before its creation")]
    UnknownObject(ObjectId),

    /// A Created record carried an id that is already live
    #[error("created record for object {0:?} which already exists")]
    DuplicateObject(ObjectId),

    /// Bytes remained after the last record
    #[error("{0} trailing bytes after the last record")]
    TrailingData(usize),
}
