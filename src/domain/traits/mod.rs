//! Domain traits - Abstractions for transport implementations

pub mod connection;

pub use connection::{Connection, MessageSource};
