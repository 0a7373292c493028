pub mod cluster;

pub use cluster::{clustered_master, demo_store, free_port, run_slave, SlaveReport};
