use async_trait::async_trait;

use crate::application::errors::TransportError;
use crate::domain::entities::{ChatMessage, ConnectionId};

/// Outbound half of a live duplex channel with one peer.
///
/// The registry holds these as shared handles; only the party that removes a
/// connection from the registry calls `close`.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Registry key for this connection
    fn id(&self) -> ConnectionId;

    /// Write one message to the peer
    async fn send(&self, message: &ChatMessage) -> Result<(), TransportError>;

    /// Release the channel. Safe to call on an already closed connection.
    ///
    /// Also ends the inbound side: `closed` resolves once this is called.
    async fn close(&self);

    /// Resolves once `close` has been called, immediately if it already was
    async fn closed(&self);
}

/// Inbound half of a live duplex channel, owned by its ingestion endpoint
#[async_trait]
pub trait MessageSource: Send {
    /// Block until the next decoded message arrives.
    ///
    /// Any error is terminal for the connection.
    async fn recv(&mut self) -> Result<ChatMessage, TransportError>;
}
