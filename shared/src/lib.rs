//! # Lockview Shared
//! Common functionality shared between the lockview-master & lockview-slave
//! crates: the scene store and its change tracking, the replication context
//! that moves scene state over the wire, and the blocking transport the
//! cluster runs on.

pub use lockview_serde::{ByteReader, ByteWriter, Serde, SerdeErr, VarInt};

pub mod exit_codes;

mod frame_data;
mod replication;
mod transport;
mod world;

pub use frame_data::{MasterFrameData, SlaveFrameData, ViewParams};
pub use replication::{ReplicationContext, ReplicationError, ReplicationHandler};
pub use transport::{Channel, Connection, ConnectionGroup, TransportError};
pub use world::{
    ChangeKind, ChangeRecord, ChangeTracker, FieldSet, FieldValue, ObjectId, SceneObject,
    SceneStore, TypeTag,
};
