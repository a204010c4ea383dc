//! End-to-end relay tests over real WebSocket connections
//! Run with: cargo test --test relay_ws_test

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use roll_relay::domain::entities::ChatMessage;
use roll_relay::infrastructure::config::Config;
use roll_relay::infrastructure::server::{self, build_router, RelayState};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

struct TestRelay {
    addr: SocketAddr,
    state: RelayState,
}

impl TestRelay {
    async fn start() -> Self {
        ensure_init();
        let (state, _worker) = RelayState::start(&Config::default());
        let router = build_router(state.clone(), Path::new("/nonexistent"));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(server::serve(listener, router, std::future::pending()));
        Self { addr, state }
    }

    /// Connect a client and wait until the relay has registered it
    async fn connect(&self) -> Client {
        let before = self.state.registry.len();
        let (client, _) = connect_async(format!("ws://{}/ws", self.addr))
            .await
            .expect("Should complete WebSocket handshake");
        self.wait_for_online(before + 1).await;
        client
    }

    async fn wait_for_online(&self, expected: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.state.registry.len() != expected {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "expected {} online, found {}",
                expected,
                self.state.registry.len()
            )
        });
    }
}

async fn say(client: &mut Client, message: &ChatMessage) {
    let json = serde_json::to_string(message).unwrap();
    client.send(Message::Text(json.into())).await.unwrap();
}

async fn next_message(client: &mut Client) -> ChatMessage {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("Should receive a frame in time")
            .expect("Stream should stay open")
            .expect("Frame should be valid");
        match frame {
            Message::Text(text) => return serde_json::from_str(text.as_str()).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {:?}", other),
        }
    }
}

fn alice(body: &str) -> ChatMessage {
    ChatMessage::new("alice@example.com", "alice", body)
}

#[tokio::test]
async fn both_clients_receive_chat_and_roll_reply() {
    let relay = TestRelay::start().await;
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    say(&mut a, &alice("hello")).await;
    for client in [&mut a, &mut b] {
        assert_eq!(next_message(client).await, alice("hello"));
    }

    say(&mut a, &alice("@roll 1d1")).await;
    for client in [&mut a, &mut b] {
        assert_eq!(next_message(client).await, alice("@roll 1d1"));
        let reply = next_message(client).await;
        assert_eq!(reply, ChatMessage::from_bot("1"));
        assert_eq!(reply.sender_email, "bot@getpantheon.com");
        assert_eq!(reply.sender_name, "Bot");
    }
}

#[tokio::test]
async fn malformed_roll_gets_error_reply() {
    let relay = TestRelay::start().await;
    let mut a = relay.connect().await;

    say(&mut a, &alice("@roll banana")).await;
    assert_eq!(next_message(&mut a).await, alice("@roll banana"));
    assert_eq!(
        next_message(&mut a).await,
        ChatMessage::from_bot("Error: cannot roll banana")
    );

    say(&mut a, &alice("@roll2d6")).await;
    say(&mut a, &alice("after")).await;
    assert_eq!(next_message(&mut a).await, alice("@roll2d6"));
    assert_eq!(next_message(&mut a).await, alice("after"));
}

#[tokio::test]
async fn late_joiner_gets_no_history() {
    let relay = TestRelay::start().await;
    let mut a = relay.connect().await;

    say(&mut a, &alice("before")).await;
    assert_eq!(next_message(&mut a).await, alice("before"));

    let mut b = relay.connect().await;
    say(&mut a, &alice("after")).await;
    assert_eq!(next_message(&mut b).await, alice("after"));
    assert_eq!(next_message(&mut a).await, alice("after"));
}

#[tokio::test]
async fn order_is_identical_for_every_client() {
    let relay = TestRelay::start().await;
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;
    let mut c = relay.connect().await;

    let bob = |body: String| ChatMessage::new("bob@example.com", "bob", body);
    for i in 0..20 {
        say(&mut a, &alice(&format!("a{}", i))).await;
        say(&mut b, &bob(format!("b{}", i))).await;
    }

    let mut seen = Vec::new();
    for client in [&mut a, &mut b, &mut c] {
        let mut order = Vec::new();
        for _ in 0..40 {
            order.push(next_message(client).await.body);
        }
        seen.push(order);
    }
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[1], seen[2]);

    // Each sender's own messages keep their submission order.
    let from_a: Vec<_> = seen[0].iter().filter(|body| body.starts_with('a')).cloned().collect();
    let expected: Vec<_> = (0..20).map(|i| format!("a{}", i)).collect();
    assert_eq!(from_a, expected);
}

#[tokio::test]
async fn malformed_payload_drops_only_that_client() {
    let relay = TestRelay::start().await;
    let mut a = relay.connect().await;
    let mut bad = relay.connect().await;

    bad.send(Message::Text("not json".into())).await.unwrap();
    relay.wait_for_online(1).await;

    say(&mut a, &alice("still here")).await;
    assert_eq!(next_message(&mut a).await, alice("still here"));
}

#[tokio::test]
async fn closed_client_is_unregistered() {
    let relay = TestRelay::start().await;
    let mut a = relay.connect().await;
    let mut b = relay.connect().await;

    b.close(None).await.unwrap();
    relay.wait_for_online(1).await;

    say(&mut a, &alice("anyone?")).await;
    assert_eq!(next_message(&mut a).await, alice("anyone?"));
}
