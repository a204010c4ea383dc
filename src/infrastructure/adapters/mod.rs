//! Transport adapters

pub mod websocket;
