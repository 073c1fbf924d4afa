//! Line-delimited JSON over TCP.

pub mod listener;
pub mod router;
pub mod wire;

pub use listener::Server;
