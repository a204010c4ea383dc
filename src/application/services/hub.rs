//! Broadcast hub - Serializes chat messages and fans them out

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::errors::{RelayError, TransportError};
use crate::application::messaging::CommandInterpreter;
use crate::domain::entities::ChatMessage;
use super::registry::ConnectionRegistry;

/// Default bound on one connection's send
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Default capacity of the inbound queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Outcome of delivering one message to the registry membership
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Submits messages to the hub's inbound queue
#[derive(Clone)]
pub struct HubHandle {
    tx: mpsc::Sender<ChatMessage>,
}

impl HubHandle {
    /// Wrap the sending side of a queue drained by `BroadcastHub::run`
    pub fn new(tx: mpsc::Sender<ChatMessage>) -> Self {
        Self { tx }
    }

    /// Enqueue a message, waiting for queue capacity.
    ///
    /// Fails only once the hub worker has stopped.
    pub async fn submit(&self, message: ChatMessage) -> Result<(), RelayError> {
        self.tx.send(message).await.map_err(|_| RelayError::HubClosed)
    }
}

/// Single consumer of the inbound queue.
///
/// Messages are processed one at a time; a message and its bot reply are
/// fully fanned out before the next message is dequeued.
pub struct BroadcastHub {
    registry: Arc<ConnectionRegistry>,
    interpreter: Arc<CommandInterpreter>,
    send_timeout: Duration,
}

impl BroadcastHub {
    pub fn new(registry: Arc<ConnectionRegistry>, interpreter: Arc<CommandInterpreter>) -> Self {
        Self {
            registry,
            interpreter,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Start the worker on the tokio runtime.
    ///
    /// The worker stops after every `HubHandle` is dropped and the queue drains.
    pub fn spawn(self, queue_capacity: usize) -> (HubHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let worker = tokio::spawn(self.run(rx));
        (HubHandle::new(tx), worker)
    }

    pub async fn run(self, mut inbound: mpsc::Receiver<ChatMessage>) {
        tracing::info!("Broadcast hub started");
        while let Some(message) = inbound.recv().await {
            self.process(message).await;
        }
        tracing::info!("Inbound queue closed, broadcast hub stopped");
    }

    /// Broadcast one message, then its bot reply if it was a command
    pub async fn process(&self, message: ChatMessage) {
        self.fan_out(&message).await;

        // Replies go straight to fan-out and never back through the interpreter.
        if let Some(reply) = self.interpreter.process(&message.body) {
            self.fan_out(&ChatMessage::from_bot(reply)).await;
        }
    }

    /// Send `message` to every registered connection.
    ///
    /// Sends run concurrently and are joined before returning. A connection
    /// whose send fails or times out is removed and closed; the others still
    /// receive the message. Closes also run concurrently, so one call takes
    /// at most two send timeouts however many peers stall.
    pub async fn fan_out(&self, message: &ChatMessage) -> FanOutReport {
        let recipients = self.registry.snapshot();
        let timeout = self.send_timeout;

        let results = join_all(recipients.iter().map(|conn| async move {
            let result = match tokio::time::timeout(timeout, conn.send(message)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout),
            };
            (conn, result)
        }))
        .await;

        let mut report = FanOutReport::default();
        let mut removed = Vec::new();
        for (conn, result) in results {
            let Err(e) = result else {
                report.delivered += 1;
                continue;
            };
            report.failed += 1;
            tracing::warn!("Send to {} failed: {}", conn.id(), e);
            if self.registry.unregister(conn.id()) {
                removed.push(conn);
            }
        }

        join_all(removed.into_iter().map(|conn| async move {
            if tokio::time::timeout(timeout, conn.close()).await.is_err() {
                tracing::warn!("Close of {} timed out", conn.id());
            }
            tracing::info!("Removed connection {} after send failure", conn.id());
        }))
        .await;

        tracing::debug!(
            "Broadcast from {}: delivered={} failed={}",
            message.sender_name,
            report.delivered,
            report.failed
        );
        report
    }
}
