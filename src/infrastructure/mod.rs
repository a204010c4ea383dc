//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Adapters: Transport integrations (WebSocket)
//! - Server: HTTP routing, static assets, listener

pub mod adapters;
pub mod config;
pub mod server;
