//! # Lockview Slave
//! The mirroring side of a lockview render cluster. The coordinator
//! connects to the master, rebuilds the scene from the initial snapshot,
//! anchors itself at a named root object, and then applies one diff per
//! frame in lockstep with every other display.

mod config;
mod coordinator;
mod error;
mod scene_index;

pub use config::SlaveConfig;
pub use coordinator::{FrameOutcome, SlaveCoordinator, SlavePhase};
pub use error::SlaveError;
pub use scene_index::SceneIndex;
