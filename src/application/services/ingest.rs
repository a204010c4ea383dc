//! Ingestion endpoint - Per-connection read loop feeding the hub

use std::sync::Arc;

use crate::application::errors::TransportError;
use crate::domain::traits::{Connection, MessageSource};
use super::hub::HubHandle;
use super::registry::ConnectionRegistry;

/// Why an ingestion endpoint stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointExit {
    /// The read failed; terminal for this connection
    ReadFailed(TransportError),
    /// The hub stopped accepting messages
    HubClosed,
    /// The connection was closed by whoever removed it from the registry
    Closed,
}

/// Reads one client's messages and submits them to the hub.
///
/// Owns the connection for its lifetime: registers it on start and, on exit,
/// unregisters it and closes it unless the hub already did. Reading stops as
/// soon as the connection is closed, so a removed peer can no longer submit.
pub struct IngestionEndpoint<S> {
    connection: Arc<dyn Connection>,
    source: S,
    registry: Arc<ConnectionRegistry>,
    hub: HubHandle,
}

impl<S: MessageSource> IngestionEndpoint<S> {
    pub fn new(
        connection: Arc<dyn Connection>,
        source: S,
        registry: Arc<ConnectionRegistry>,
        hub: HubHandle,
    ) -> Self {
        Self {
            connection,
            source,
            registry,
            hub,
        }
    }

    pub async fn run(mut self) -> EndpointExit {
        let id = self.connection.id();
        self.registry.register(self.connection.clone());
        tracing::info!("Client {} connected ({} online)", id, self.registry.len());

        let exit = loop {
            let received = tokio::select! {
                biased;
                _ = self.connection.closed() => {
                    tracing::debug!("Client {} closed, stopping reads", id);
                    break EndpointExit::Closed;
                }
                received = self.source.recv() => received,
            };

            match received {
                Ok(message) => {
                    if self.hub.submit(message).await.is_err() {
                        tracing::warn!("Hub closed, dropping client {}", id);
                        break EndpointExit::HubClosed;
                    }
                }
                Err(e) => {
                    if e == TransportError::Disconnected {
                        tracing::debug!("Client {} hung up", id);
                    } else {
                        tracing::warn!("Read from {} failed: {}", id, e);
                    }
                    break EndpointExit::ReadFailed(e);
                }
            }
        };

        if self.registry.unregister(id) {
            self.connection.close().await;
        }
        tracing::info!("Client {} disconnected ({} online)", id, self.registry.len());
        exit
    }
}
