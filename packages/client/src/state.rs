//! Connection state machine behind the connectivity indicator.
//!
//! ```text
//! Disconnected ──begin_connecting──▶ Connecting ──connected──▶ Connected
//!      ▲                                  │                        │
//!      └──────────── transport_error ─────┴────────────────────────┘
//! ```

use std::fmt;

use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Why the connection went down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// Abnormal closure (WebSocket code 1006): the socket dropped without a close handshake
    ConnectionLost,
    /// The server closed the connection
    Closed(String),
    /// Connect or protocol error
    Error(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionLost => write!(f, "connection lost"),
            Self::Closed(reason) if reason.is_empty() => write!(f, "closed by server"),
            Self::Closed(reason) => write!(f, "closed by server: {reason}"),
            Self::Error(e) => write!(f, "{e}"),
        }
    }
}

/// Tracks the connection state and the failure that last took it offline.
#[derive(Debug, Clone)]
pub struct ConnectionIndicator {
    state: ConnectionState,
    last_failure: Option<TransportFailure>,
}

impl Default for ConnectionIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionIndicator {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            last_failure: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_online(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn last_failure(&self) -> Option<&TransportFailure> {
        self.last_failure.as_ref()
    }

    /// `Disconnected → Connecting`
    pub fn begin_connecting(&mut self) -> Result<(), ClientError> {
        self.transition(ConnectionState::Disconnected, ConnectionState::Connecting)
    }

    /// `Connecting → Connected`; clears the last failure.
    pub fn connected(&mut self) -> Result<(), ClientError> {
        self.transition(ConnectionState::Connecting, ConnectionState::Connected)?;
        self.last_failure = None;
        Ok(())
    }

    /// Any state → `Disconnected`. Every transport error lands here.
    pub fn transport_error(&mut self, failure: TransportFailure) {
        self.state = ConnectionState::Disconnected;
        self.last_failure = Some(failure);
    }

    fn transition(
        &mut self,
        from: ConnectionState,
        to: ConnectionState,
    ) -> Result<(), ClientError> {
        if self.state != from {
            return Err(ClientError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
