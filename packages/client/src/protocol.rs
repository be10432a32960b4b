//! Wire frames exchanged with the relay's `/ws` endpoint.

use serde::Deserialize;
use serde_json::json;

pub const SUBSCRIBE: &str = "dengon:subscribe";
pub const CONNECTION_ESTABLISHED: &str = "dengon:connection_established";
pub const SUBSCRIPTION_SUCCEEDED: &str = "dengon:subscription_succeeded";
pub const ERROR: &str = "dengon:error";

/// Broadcast delivered on a channel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Envelope {
    pub channel: String,
    pub event: String,
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Payload {
    pub message: String,
}

/// Control frame (`dengon:*` events)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ControlFrame {
    pub event: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IncomingFrame {
    Envelope(Envelope),
    Control(ControlFrame),
}

pub fn parse_frame(text: &str) -> Result<IncomingFrame, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn subscribe_frame(channel: &str) -> String {
    json!({"event": SUBSCRIBE, "channel": channel}).to_string()
}
