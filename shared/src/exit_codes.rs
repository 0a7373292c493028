//! Process exit codes shared by the master and slave binaries.
//!
//! Every fault in this subsystem is terminal for the side that detects it;
//! the coordinator threads the error kind back to its top level, where one
//! match selects the code. Keeping the codes here, small and consecutive,
//! gives launch scripts a stable contract.

/// Clean shutdown, including a slave leaving on the finish flag.
pub const SUCCESS: i32 = 0;

/// The slave could not reach the master at startup.
pub const CONNECT_FAIL: i32 = 1;

/// A communication fault after the connection was established.
pub const COMM_ERROR: i32 = 2;

/// The configured scene root was not in the initial snapshot.
pub const ROOT_NOT_FOUND: i32 = 3;
