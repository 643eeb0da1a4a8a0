//! API layer - entry points used by the connection layer.

pub mod connections;

pub use connections::{ConnectionError, ConnectionInfo, ConnectionManager};
