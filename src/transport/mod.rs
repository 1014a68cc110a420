//! Network transports.

pub mod tcp;

pub use tcp::{serve, spawn_connection};
