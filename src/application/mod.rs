//! Application layer - Relay logic
//!
//! This layer contains:
//! - Services: Connection registry, broadcast hub, ingestion endpoints
//! - Messaging: Dice parsing and chat-ops command interpretation
//! - Errors: Relay, transport, command and config errors

pub mod errors;
pub mod messaging;
pub mod services;
