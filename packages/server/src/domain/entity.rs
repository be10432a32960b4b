//! Core domain models for the broadcast relay.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::value_object::{ChannelName, ConnectionId, EventName, MessageText, Timestamp};

/// A chat message accepted at the ingress endpoint.
///
/// Immutable; consumed by routing and discarded after broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: MessageText,
    timestamp: Timestamp,
}

impl Message {
    pub fn new(text: MessageText, timestamp: Timestamp) -> Self {
        Self { text, timestamp }
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn into_text(self) -> MessageText {
        self.text
    }
}

/// Event payload delivered to subscribers: `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    pub message: String,
}

/// The wire unit delivered to subscribers.
///
/// ```json
/// {"channel":"chat","event":"message.sent","payload":{"message":"hello"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    channel: ChannelName,
    event: EventName,
    payload: Payload,
}

impl Envelope {
    /// Wrap a message for delivery on `channel` under `event`.
    pub fn new(channel: ChannelName, event: EventName, message: Message) -> Self {
        Self {
            channel,
            event,
            payload: Payload {
                message: message.into_text().into_string(),
            },
        }
    }

    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    pub fn event(&self) -> &EventName {
        &self.event
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// A named channel and the connections currently subscribed to it.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: ChannelName,
    subscribers: HashSet<ConnectionId>,
}

impl Channel {
    /// Create an empty channel
    pub fn new(name: ChannelName) -> Self {
        Self {
            name,
            subscribers: HashSet::new(),
        }
    }

    /// Add a subscriber. Returns `false` if it was already subscribed.
    pub fn subscribe(&mut self, connection_id: ConnectionId) -> bool {
        self.subscribers.insert(connection_id)
    }

    /// Remove a subscriber. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, connection_id: &ConnectionId) -> bool {
        self.subscribers.remove(connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.subscribers.contains(connection_id)
    }

    pub fn subscriber_ids(&self) -> impl Iterator<Item = &ConnectionId> {
        self.subscribers.iter()
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn summary(&self) -> ChannelSummary {
        ChannelSummary {
            name: self.name.clone(),
            subscribers: self.len(),
        }
    }
}

/// Read model of a channel for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSummary {
    pub name: ChannelName,
    pub subscribers: usize,
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub channel: ChannelName,
    /// Size of the subscriber snapshot
    pub attempted: usize,
    /// Enqueued immediately
    pub delivered: usize,
    /// Queue was full; the envelope waits in the subscriber's backlog
    pub deferred: Vec<ConnectionId>,
    /// Subscribers whose enqueue failed; they have been disconnected
    pub failed: Vec<ConnectionId>,
}

impl PublishReport {
    /// Report for a channel nobody is subscribed to.
    pub fn empty(channel: ChannelName) -> Self {
        Self {
            channel,
            attempted: 0,
            delivered: 0,
            deferred: Vec::new(),
            failed: Vec::new(),
        }
    }
}
