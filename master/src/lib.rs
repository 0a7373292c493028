//! # Lockview Master
//! The authoritative side of a lockview render cluster. The coordinator
//! accepts a fixed set of slave connections at startup, hands each a full
//! scene snapshot, and then broadcasts an incremental diff every frame.

mod config;
mod coordinator;
mod error;

pub use config::MasterConfig;
pub use coordinator::{MasterCoordinator, MasterPhase};
pub use error::MasterError;
