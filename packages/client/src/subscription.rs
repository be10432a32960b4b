//! Live channel subscription over WebSocket.
//!
//! Drives the [`ConnectionIndicator`] state machine and reports every state
//! change and incoming message as a [`ClientEvent`]. Reconnection follows the
//! configured [`crate::reconnect::ReconnectPolicy`] and is always bounded.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, Message, error::ProtocolError},
};

use crate::{
    config::ClientConfig,
    error::ClientError,
    protocol::{self, IncomingFrame},
    state::{ConnectionIndicator, ConnectionState, TransportFailure},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    StateChanged {
        state: ConnectionState,
        failure: Option<TransportFailure>,
    },
    Message {
        channel: String,
        event: String,
        text: String,
    },
    /// Reconnect policy exhausted; the subscription has stopped
    GaveUp { attempts: u32 },
}

enum SessionEnd {
    /// The event receiver is gone; nobody is listening anymore
    Stopped,
    Failed {
        failure: TransportFailure,
        was_connected: bool,
    },
}

fn classify(error: &tungstenite::Error) -> TransportFailure {
    match error {
        tungstenite::Error::ConnectionClosed
        | tungstenite::Error::AlreadyClosed
        | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
            TransportFailure::ConnectionLost
        }
        tungstenite::Error::Io(io)
            if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ) =>
        {
            TransportFailure::ConnectionLost
        }
        other => TransportFailure::Error(other.to_string()),
    }
}

fn state_event(indicator: &ConnectionIndicator) -> ClientEvent {
    ClientEvent::StateChanged {
        state: indicator.state(),
        failure: indicator.last_failure().cloned(),
    }
}

/// Keep a subscription to `config.channel` alive, forwarding events to `events`.
///
/// Returns `Ok(())` when `events` is closed, or `Err(ClientError::Transport)`
/// once the reconnect policy gives up.
pub async fn run_subscription(
    config: ClientConfig,
    events: mpsc::UnboundedSender<ClientEvent>,
) -> Result<(), ClientError> {
    let mut indicator = ConnectionIndicator::new();
    let mut retries: u32 = 0;

    loop {
        indicator.begin_connecting()?;
        if events.send(state_event(&indicator)).is_err() {
            return Ok(());
        }

        let (failure, was_connected) = match session(&config, &mut indicator, &events).await {
            SessionEnd::Stopped => return Ok(()),
            SessionEnd::Failed {
                failure,
                was_connected,
            } => (failure, was_connected),
        };

        match &failure {
            TransportFailure::ConnectionLost => tracing::warn!("Connection to relay lost"),
            other => tracing::error!("WebSocket error: {}", other),
        }
        indicator.transport_error(failure.clone());
        if events.send(state_event(&indicator)).is_err() {
            return Ok(());
        }

        if was_connected {
            retries = 0;
        }
        let Some(delay) = config.reconnect.next_delay(retries) else {
            let _ = events.send(ClientEvent::GaveUp { attempts: retries });
            return Err(ClientError::Transport(failure.to_string()));
        };
        retries += 1;
        tracing::info!(
            "Reconnecting in {:?} (attempt {}/{})",
            delay,
            retries,
            config.reconnect.max_attempts
        );
        tokio::time::sleep(delay).await;
    }
}

async fn session(
    config: &ClientConfig,
    indicator: &mut ConnectionIndicator,
    events: &mpsc::UnboundedSender<ClientEvent>,
) -> SessionEnd {
    let failed = |failure, was_connected| SessionEnd::Failed {
        failure,
        was_connected,
    };

    let (mut ws, _) = match connect_async(config.ws_url()).await {
        Ok(connection) => connection,
        Err(e) => return failed(classify(&e), false),
    };
    if let Err(e) = ws
        .send(Message::text(protocol::subscribe_frame(&config.channel)))
        .await
    {
        return failed(classify(&e), false);
    }

    let mut connected = false;
    while let Some(msg) = ws.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => return failed(classify(&e), connected),
        };

        match msg {
            Message::Text(text) => match protocol::parse_frame(text.as_str()) {
                Ok(IncomingFrame::Envelope(envelope)) => {
                    tracing::debug!("Received '{}' on '{}'", envelope.event, envelope.channel);
                    let event = ClientEvent::Message {
                        channel: envelope.channel,
                        event: envelope.event,
                        text: envelope.payload.message,
                    };
                    if events.send(event).is_err() {
                        return SessionEnd::Stopped;
                    }
                }
                Ok(IncomingFrame::Control(frame)) => match frame.event.as_str() {
                    protocol::SUBSCRIPTION_SUCCEEDED
                        if frame.channel.as_deref() == Some(config.channel.as_str()) =>
                    {
                        if !connected && indicator.connected().is_ok() {
                            connected = true;
                            tracing::info!("Subscribed to '{}'", config.channel);
                            if events.send(state_event(indicator)).is_err() {
                                return SessionEnd::Stopped;
                            }
                        }
                    }
                    protocol::CONNECTION_ESTABLISHED => {
                        tracing::debug!("Connection established: {:?}", frame.data);
                    }
                    protocol::ERROR => {
                        tracing::warn!("Relay reported an error: {:?}", frame.data);
                    }
                    other => tracing::debug!("Control frame: {}", other),
                },
                Err(e) => tracing::warn!("Ignoring malformed frame: {}", e),
            },
            Message::Close(frame) => {
                let reason = frame.map(|f| f.reason.to_string()).unwrap_or_default();
                return failed(TransportFailure::Closed(reason), connected);
            }
            _ => {}
        }
    }

    // Stream ended without a close frame
    failed(TransportFailure::ConnectionLost, connected)
}
