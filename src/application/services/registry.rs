//! Connection registry - Tracks the set of live connections

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::entities::ConnectionId;
use crate::domain::traits::Connection;

type Connections = HashMap<ConnectionId, Arc<dyn Connection>>;

/// Membership set of live connections.
///
/// Ingestion endpoints and the hub worker touch it concurrently, so every
/// operation takes the lock. The registry never closes a connection.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<Connections>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Connections> {
        // Every critical section is a single map operation, so a panic
        // elsewhere cannot leave the map half-updated.
        self.connections.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a connection. Registering the same id twice keeps one entry.
    pub fn register(&self, connection: Arc<dyn Connection>) {
        self.guard().insert(connection.id(), connection);
    }

    /// Remove a connection.
    ///
    /// Returns `true` only for the call that actually removed it, so the
    /// caller that gets `true` is the one responsible for closing it.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.guard().remove(&id).is_some()
    }

    /// Current membership, for fan-out
    pub fn snapshot(&self) -> Vec<Arc<dyn Connection>> {
        self.guard().values().cloned().collect()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.guard().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}
