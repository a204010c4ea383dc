//! HTTP server - WebSocket upgrade, health check, static assets

use std::path::Path;
use std::sync::Arc;

use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::application::errors::RelayError;
use crate::application::messaging::{CommandInterpreter, DiceParser};
use crate::application::services::{BroadcastHub, ConnectionRegistry, HubHandle, IngestionEndpoint};
use crate::domain::traits::Connection;
use crate::infrastructure::adapters::websocket;
use crate::infrastructure::config::Config;

/// State shared by every request handler
#[derive(Clone)]
pub struct RelayState {
    pub registry: Arc<ConnectionRegistry>,
    pub hub: HubHandle,
}

impl RelayState {
    /// Build the registry and start the hub worker
    pub fn start(config: &Config) -> (Self, JoinHandle<()>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let interpreter = Arc::new(CommandInterpreter::new(DiceParser::new(config.dice.max_count)));
        let (hub, worker) = BroadcastHub::new(registry.clone(), interpreter)
            .with_send_timeout(config.hub.send_timeout())
            .spawn(config.hub.queue_capacity);
        (Self { registry, hub }, worker)
    }
}

pub fn build_router(state: RelayState, static_dir: &Path) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok\n" }))
        .route("/ws", get(ws_session))
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
}

async fn ws_session(ws: WebSocketUpgrade, State(state): State<RelayState>) -> Response {
    // Any origin is accepted.
    ws.on_upgrade(move |socket| ws_session_task(socket, state))
}

async fn ws_session_task(socket: WebSocket, state: RelayState) {
    let (connection, source) = websocket::split(socket);
    let connection = Arc::new(connection);

    let exit = IngestionEndpoint::new(connection.clone(), source, state.registry, state.hub)
        .run()
        .await;

    tracing::debug!(
        "Session {} ended after {}s: {:?}",
        connection.id(),
        connection.age().num_seconds(),
        exit
    );
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> Result<(), RelayError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Bind the configured address and run the relay until Ctrl-C
pub async fn run(config: Config) -> Result<(), RelayError> {
    let (state, worker) = RelayState::start(&config);
    let router = build_router(state, &config.server.static_dir);

    let listener = TcpListener::bind(&config.server.bind).await?;
    tracing::info!(
        "http server started on {} (static files from {})",
        listener.local_addr()?,
        config.server.static_dir.display()
    );

    serve(listener, router, shutdown_signal()).await?;
    worker.abort();
    tracing::info!("Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
