//! Server state shared by all handlers.

use std::sync::Arc;

use crate::domain::{BroadcastHub, ChannelName, EventName};

/// Shared application state
pub struct AppState {
    /// Hub instance owned by the server (no process-wide singleton)
    pub hub: Arc<dyn BroadcastHub>,
    /// Channel the ingress endpoint publishes to
    pub ingress_channel: ChannelName,
    /// Event name attached to ingress messages
    pub ingress_event: EventName,
    /// Capacity of each connection's outbound queue
    pub queue_capacity: usize,
}
