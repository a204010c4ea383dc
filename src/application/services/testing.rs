//! In-memory connection fakes shared by the service tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use crate::application::errors::TransportError;
use crate::domain::entities::{ChatMessage, ConnectionId};
use crate::domain::traits::{Connection, MessageSource};

/// Records every message sent to it; can be told to fail or hang.
///
/// A stalled connection hangs in both `send` and `close`.
pub struct MockConnection {
    id: ConnectionId,
    received: Mutex<Vec<ChatMessage>>,
    failing: AtomicBool,
    stalled: AtomicBool,
    closes: AtomicUsize,
    closed: watch::Sender<bool>,
}

impl MockConnection {
    pub fn new() -> Arc<Self> {
        let (closed, _) = watch::channel(false);
        Arc::new(Self {
            id: ConnectionId::new(),
            received: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            stalled: AtomicBool::new(false),
            closes: AtomicUsize::new(0),
            closed,
        })
    }

    pub fn failing() -> Arc<Self> {
        let conn = Self::new();
        conn.set_failing(true);
        conn
    }

    pub fn stalled() -> Arc<Self> {
        let conn = Self::new();
        conn.stalled.store(true, Ordering::SeqCst);
        conn
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn received(&self) -> Vec<ChatMessage> {
        self.received.lock().unwrap().clone()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.received().into_iter().map(|m| m.body).collect()
    }

    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, message: &ChatMessage) -> Result<(), TransportError> {
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::Network("mock send failure".into()));
        }
        self.received.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.closed.send_replace(true);
        if self.stalled.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Message source fed from a channel; a dropped sender reads as a disconnect
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Result<ChatMessage, TransportError>>,
}

impl ChannelSource {
    pub fn new() -> (mpsc::UnboundedSender<Result<ChatMessage, TransportError>>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { rx })
    }

    /// Source that yields `items` and then disconnects
    pub fn scripted(items: Vec<Result<ChatMessage, TransportError>>) -> Self {
        let (tx, source) = Self::new();
        for item in items {
            tx.send(item).unwrap();
        }
        source
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn recv(&mut self) -> Result<ChatMessage, TransportError> {
        self.rx.recv().await.unwrap_or(Err(TransportError::Disconnected))
    }
}
