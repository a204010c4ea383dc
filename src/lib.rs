//! Real-time chat relay with dice-rolling chat-ops.
//!
//! Clients connect over WebSocket and exchange JSON chat messages. A single
//! hub worker broadcasts every message to every connected client in the order
//! it was received; messages starting with `@roll ` also get a bot reply with
//! the rolled total.

pub mod application;
pub mod domain;
pub mod infrastructure;
