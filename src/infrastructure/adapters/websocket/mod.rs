//! WebSocket adapter - JSON chat messages over an axum WebSocket

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use chrono::{DateTime, Utc};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::sync::{watch, Mutex};

use crate::application::errors::TransportError;
use crate::domain::entities::{ChatMessage, ConnectionId};
use crate::domain::traits::{Connection, MessageSource};

/// Split a socket into its outbound connection handle and inbound source
pub fn split(socket: WebSocket) -> (WsConnection, WsSource) {
    let (sink, stream) = socket.split();
    (WsConnection::new(sink), WsSource::new(stream))
}

/// Write half of a client WebSocket
pub struct WsConnection {
    id: ConnectionId,
    sink: Mutex<SplitSink<WebSocket, Message>>,
    closed: watch::Sender<bool>,
    connected_at: DateTime<Utc>,
}

impl WsConnection {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            id: ConnectionId::new(),
            sink: Mutex::new(sink),
            closed,
            connected_at: Utc::now(),
        }
    }

    /// Time since the upgrade completed
    pub fn age(&self) -> chrono::Duration {
        Utc::now() - self.connected_at
    }
}

#[async_trait]
impl Connection for WsConnection {
    fn id(&self) -> ConnectionId {
        self.id
    }

    async fn send(&self, message: &ChatMessage) -> Result<(), TransportError> {
        let json = encode(message)?;
        self.sink
            .lock()
            .await
            .send(Message::Text(json.into()))
            .await
            .map_err(|e| TransportError::Network(e.to_string()))
    }

    async fn close(&self) {
        // Stop the reader first; the sink lock may be held by a stalled send.
        self.closed.send_replace(true);

        // Sends a Close frame; errors mean the socket is already gone.
        if let Err(e) = self.sink.lock().await.close().await {
            tracing::debug!("Close of {} after socket ended: {}", self.id, e);
        }
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }
}

/// Read half of a client WebSocket
pub struct WsSource {
    stream: SplitStream<WebSocket>,
}

impl WsSource {
    pub fn new(stream: SplitStream<WebSocket>) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl MessageSource for WsSource {
    async fn recv(&mut self) -> Result<ChatMessage, TransportError> {
        loop {
            let frame = match self.stream.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => return Err(TransportError::Network(e.to_string())),
                None => return Err(TransportError::Disconnected),
            };
            if let Some(decoded) = decode_frame(frame) {
                return decoded;
            }
        }
    }
}

pub fn encode(message: &ChatMessage) -> Result<String, TransportError> {
    serde_json::to_string(message).map_err(|e| TransportError::Malformed(e.to_string()))
}

pub fn decode(text: &str) -> Result<ChatMessage, TransportError> {
    serde_json::from_str(text).map_err(|e| TransportError::Malformed(e.to_string()))
}

/// Decode one frame. Returns `None` for control frames that carry no message.
pub fn decode_frame(frame: Message) -> Option<Result<ChatMessage, TransportError>> {
    match frame {
        Message::Text(text) => Some(decode(text.as_str())),
        Message::Binary(data) => Some(
            std::str::from_utf8(&data)
                .map_err(|e| TransportError::Malformed(e.to_string()))
                .and_then(decode),
        ),
        Message::Close(_) => Some(Err(TransportError::Disconnected)),
        Message::Ping(_) | Message::Pong(_) => None,
    }
}
