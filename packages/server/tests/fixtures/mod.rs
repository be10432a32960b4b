//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use dengon_server::{Server, ServerConfig};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::oneshot};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a frame it expects
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// How long a test waits to conclude that no frame arrives
pub const SILENCE: Duration = Duration::from_millis(300);

/// Relay server running in the background on an ephemeral port.
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    pub async fn start_with(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let server = Server::new(config).expect("Failed to build server");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let shutdown = async {
                let _ = shutdown_rx.await;
            };
            if let Err(e) = server.serve(listener, shutdown).await {
                eprintln!("test server stopped: {e}");
            }
        });

        Self {
            addr,
            shutdown: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// POST a raw JSON body to the ingress endpoint.
    pub async fn send(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/api/chat/send", self.base_url()))
            .json(&body)
            .send()
            .await
            .expect("Failed to send request")
    }

    /// Connect and subscribe to `channel` through the query string.
    ///
    /// Consumes the greeting frames, so the next frame is a broadcast.
    pub async fn subscriber(&self, channel: &str) -> WsClient {
        let (mut ws, _) = connect_async(format!("{}?channel={}", self.ws_url(), channel))
            .await
            .expect("Failed to connect WebSocket");
        let established = next_json(&mut ws).await;
        assert_eq!(established["event"], "dengon:connection_established");
        let subscribed = next_json(&mut ws).await;
        assert_eq!(subscribed["event"], "dengon:subscription_succeeded");
        assert_eq!(subscribed["channel"], channel);
        ws
    }

    /// Connect without subscribing. Consumes the greeting frame.
    pub async fn connection(&self) -> WsClient {
        let (mut ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect WebSocket");
        let established = next_json(&mut ws).await;
        assert_eq!(established["event"], "dengon:connection_established");
        ws
    }

    /// Subscriber count of `channel` as reported by `/api/channels`.
    pub async fn subscriber_count(&self, channel: &str) -> u64 {
        let body: serde_json::Value = reqwest::get(format!("{}/api/channels", self.base_url()))
            .await
            .expect("Failed to list channels")
            .json()
            .await
            .expect("Failed to parse JSON");
        body.as_array()
            .expect("Response should be an array")
            .iter()
            .find(|c| c["name"] == channel)
            .and_then(|c| c["subscribers"].as_u64())
            .unwrap_or(0)
    }

    /// Poll until `channel` has `expected` subscribers.
    pub async fn wait_for_subscribers(&self, channel: &str, expected: u64) {
        for _ in 0..50 {
            if self.subscriber_count(channel).await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("channel '{channel}' never reached {expected} subscriber(s)");
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Next text frame parsed as JSON.
pub async fn next_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("WebSocket closed")
            .expect("WebSocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

/// Assert no text frame arrives within [`SILENCE`].
pub async fn assert_silent(ws: &mut WsClient) {
    let deadline = tokio::time::Instant::now() + SILENCE;
    loop {
        match tokio::time::timeout_at(deadline, ws.next()).await {
            Err(_) => return,
            Ok(Some(Ok(Message::Text(text)))) => panic!("unexpected frame: {}", text.as_str()),
            Ok(Some(Ok(_))) => continue,
            Ok(_) => return,
        }
    }
}

/// Send a control frame.
pub async fn send_frame(ws: &mut WsClient, frame: serde_json::Value) {
    ws.send(Message::text(frame.to_string()))
        .await
        .expect("Failed to send frame");
}
