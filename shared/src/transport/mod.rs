pub mod connection;
pub mod error;
pub mod group;

pub use connection::Connection;
pub use error::TransportError;
pub use group::{Channel, ConnectionGroup};
