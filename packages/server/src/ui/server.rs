//! Server construction and run loop.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    domain::{CHAT_CHANNEL, ChannelName, EventName, MESSAGE_SENT_EVENT, ValueObjectError},
    infrastructure::hub::{HubConfig, InMemoryBroadcastHub},
    ui::{
        handler::{health_check, list_channels, send_message, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Server settings, usually built from CLI arguments
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Channel the ingress endpoint publishes to
    pub channel: String,
    /// Event name attached to ingress messages
    pub event: String,
    pub hub: HubConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            channel: CHAT_CHANNEL.to_string(),
            event: MESSAGE_SENT_EVENT.to_string(),
            hub: HubConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ValueObjectError),

    #[error("queue capacity must be greater than zero")]
    ZeroQueueCapacity,

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/chat/send", post(send_message))
        .route("/api/channels", get(list_channels))
        .route("/ws", get(websocket_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Broadcast relay server.
///
/// Owns the single hub instance and hands it to every handler through
/// [`AppState`].
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Validate `config` and build the hub.
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if config.hub.queue_capacity == 0 {
            return Err(ServerError::ZeroQueueCapacity);
        }
        let ingress_channel = ChannelName::new(config.channel.clone())?;
        let ingress_event = EventName::new(config.event.clone())?;

        let state = Arc::new(AppState {
            hub: Arc::new(InMemoryBroadcastHub::new(config.hub)),
            ingress_channel,
            ingress_event,
            queue_capacity: config.hub.queue_capacity,
        });

        Ok(Self { config, state })
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Bind the configured address and serve until Ctrl-C / SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(local) = listener.local_addr() {
            tracing::info!("Listening on http://{}", local);
        }
        tracing::info!(
            "Publishing ingress messages to '{}' as '{}' (send timeout {:?}, queue capacity {})",
            self.state.ingress_channel,
            self.state.ingress_event,
            self.config.hub.send_timeout,
            self.config.hub.queue_capacity
        );

        axum::serve(listener, create_router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)
    }
}
