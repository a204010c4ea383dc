//! Domain layer - Core types with no transport dependencies
//!
//! This layer contains:
//! - Entities: Chat messages, connection ids, dice expressions, commands
//! - Traits: Abstractions over the duplex channel (Connection, MessageSource)

pub mod entities;
pub mod traits;
