//! Client error definitions.

use thiserror::Error;

use crate::state::ConnectionState;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{0}': expected http://, https://, ws:// or wss://")]
    InvalidUrl(String),

    #[error("invalid connection state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: ConnectionState,
        to: ConnectionState,
    },

    /// Subscription gave up after the reconnect policy was exhausted
    #[error("transport error: {0}")]
    Transport(String),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("message rejected by server ({status}): {reason}")]
    Rejected { status: u16, reason: String },

    #[error("malformed frame: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}
