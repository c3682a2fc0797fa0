//! Port traits the core consumes; implemented by [`crate::adapters`].

pub mod config_port;
pub mod data_port;
pub mod log_port;
pub mod store_port;
