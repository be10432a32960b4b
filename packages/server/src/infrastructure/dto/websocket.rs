//! WebSocket control frame DTOs.
//!
//! Broadcasts are sent as [`crate::domain::Envelope`] JSON. Control frames
//! are tagged by `event` with a `dengon:` prefix so they can never be
//! mistaken for an application event.

use serde::{Deserialize, Serialize};

/// Frames a client may send over the socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ClientFrame {
    #[serde(rename = "dengon:subscribe")]
    Subscribe { channel: String },
    #[serde(rename = "dengon:unsubscribe")]
    Unsubscribe { channel: String },
    #[serde(rename = "dengon:ping")]
    Ping,
}

/// Control frames the server sends besides broadcasts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ServerFrame {
    #[serde(rename = "dengon:connection_established")]
    ConnectionEstablished { data: ConnectionEstablishedData },
    #[serde(rename = "dengon:subscription_succeeded")]
    SubscriptionSucceeded { channel: String },
    #[serde(rename = "dengon:pong")]
    Pong,
    #[serde(rename = "dengon:error")]
    Error { data: ErrorData },
}

impl ServerFrame {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            data: ErrorData {
                message: message.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEstablishedData {
    pub connection_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub message: String,
}

/// Query parameters for WebSocket connection
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    /// Channel to subscribe to right after the upgrade
    pub channel: Option<String>,
}
