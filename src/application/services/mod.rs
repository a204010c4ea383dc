//! Application services - Connection registry, broadcast hub, ingestion

pub mod hub;
pub mod ingest;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use hub::{BroadcastHub, FanOutReport, HubHandle, DEFAULT_QUEUE_CAPACITY, DEFAULT_SEND_TIMEOUT};
pub use ingest::{EndpointExit, IngestionEndpoint};
pub use registry::ConnectionRegistry;
