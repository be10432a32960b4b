//! WebSocket connection handlers.
//!
//! Each connection gets two tasks: a writer draining the hub queue (and
//! control replies) into the socket, and a reader handling control frames.
//! When either ends the other is aborted and the connection is removed from
//! the hub.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ChannelName, ConnectionId},
    infrastructure::dto::websocket::{
        ClientFrame, ConnectQuery, ConnectionEstablishedData, ServerFrame,
    },
    ui::state::AppState,
    usecase::{
        ConnectSubscriberUseCase, DisconnectSubscriberUseCase,
        SubscribeChannelUseCase,
    },
};

/// Capacity of the per-connection control reply queue
const REPLY_QUEUE_CAPACITY: usize = 16;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Reject a bad initial channel before upgrading
    if let Some(channel) = query.channel.as_deref()
        && let Err(e) = ChannelName::try_from(channel)
    {
        tracing::warn!("Rejected connection: {}", e);
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, query.channel)))
}

/// Register an upgraded socket in the hub; `None` when registration failed.
async fn register(
    state: &AppState,
    initial_channel: Option<&str>,
) -> Option<(ConnectionId, mpsc::Receiver<String>)> {
    // Create the bounded queue the hub delivers broadcasts into
    let (tx, rx) = mpsc::channel(state.queue_capacity);

    let connect_usecase = ConnectSubscriberUseCase::new(state.hub.clone());
    match connect_usecase.execute(tx, initial_channel).await {
        Ok(connection_id) => {
            tracing::info!("Connection '{}' registered", connection_id);
            Some((connection_id, rx))
        }
        Err(e) => {
            tracing::error!("Failed to register connection: {}", e);
            None
        }
    }
}

fn encode(frame: &ServerFrame) -> Option<String> {
    match serde_json::to_string(frame) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize control frame: {}", e);
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, initial_channel: Option<String>) {
    let Some((connection_id, mut rx)) = register(&state, initial_channel.as_deref()).await else {
        return;
    };
    let (mut sender, mut receiver) = socket.split();
    let (reply_tx, mut reply_rx) = mpsc::channel::<String>(REPLY_QUEUE_CAPACITY);

    let mut greeting = vec![ServerFrame::ConnectionEstablished {
        data: ConnectionEstablishedData {
            connection_id: connection_id.as_str().to_string(),
        },
    }];
    if let Some(channel) = initial_channel {
        greeting.push(ServerFrame::SubscriptionSucceeded { channel });
    }
    for frame in greeting.iter().filter_map(encode) {
        if let Err(e) = sender.send(Message::Text(frame.into())).await {
            tracing::error!("Failed to greet '{}': {}", connection_id, e);
            DisconnectSubscriberUseCase::new(state.hub.clone())
                .execute(&connection_id)
                .await;
            return;
        }
    }

    let reader_id = connection_id.clone();
    let reader_state = state.clone();

    // Spawn a task to receive control frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", reader_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received frame from '{}': {}", reader_id, text.as_str());
                    let reply = handle_client_frame(&reader_state, &reader_id, text.as_str()).await;
                    if let Some(json) = reply.as_ref().and_then(encode)
                        && reply_tx.send(json).await.is_err()
                    {
                        break;
                    }
                }
                Message::Binary(_) => {
                    tracing::debug!("Ignoring binary frame from '{}'", reader_id);
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", reader_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    let writer_id = connection_id.clone();

    // Spawn a task to forward broadcasts and replies to this client
    let mut send_task = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                broadcast = rx.recv() => match broadcast {
                    Some(frame) => frame,
                    None => {
                        // The hub dropped our sender: disconnected or evicted
                        tracing::info!("Queue of '{}' closed by hub", writer_id);
                        break;
                    }
                },
                reply = reply_rx.recv() => match reply {
                    Some(frame) => frame,
                    None => break,
                },
            };
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.send(Message::Close(None)).await;
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    DisconnectSubscriberUseCase::new(state.hub.clone())
        .execute(&connection_id)
        .await;
    tracing::info!("Connection '{}' closed", connection_id);
}

/// Apply one client control frame; returns the reply to send, if any.
async fn handle_client_frame(
    state: &AppState,
    connection_id: &ConnectionId,
    text: &str,
) -> Option<ServerFrame> {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!("Unrecognized frame from '{}': {}", connection_id, e);
            return Some(ServerFrame::error(format!("unrecognized frame: {e}")));
        }
    };

    let usecase = SubscribeChannelUseCase::new(state.hub.clone());
    match frame {
        ClientFrame::Subscribe { channel } => {
            match usecase.subscribe(connection_id, &channel).await {
                Ok(channel) => Some(ServerFrame::SubscriptionSucceeded {
                    channel: channel.into_string(),
                }),
                Err(e) => Some(ServerFrame::error(e.to_string())),
            }
        }
        ClientFrame::Unsubscribe { channel } => {
            match usecase.unsubscribe(connection_id, &channel).await {
                Ok(_) => None,
                Err(e) => Some(ServerFrame::error(e.to_string())),
            }
        }
        ClientFrame::Ping => Some(ServerFrame::Pong),
    }
}
