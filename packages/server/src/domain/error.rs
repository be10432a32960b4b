//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ConnectionId is not a UUID
    #[error("ConnectionId must be a valid UUID format (got: {0})")]
    ConnectionIdInvalidFormat(String),

    #[error("ChannelName cannot be empty")]
    ChannelNameEmpty,

    #[error("ChannelName cannot exceed {max} characters (got {actual})")]
    ChannelNameTooLong { max: usize, actual: usize },

    /// Channel names share the Pusher alphabet: `[A-Za-z0-9_\-=@,.;]`
    #[error("ChannelName contains invalid character '{0}'")]
    ChannelNameInvalidCharacter(char),

    #[error("EventName cannot be empty")]
    EventNameEmpty,

    #[error("EventName cannot exceed {max} characters (got {actual})")]
    EventNameTooLong { max: usize, actual: usize },

    /// Empty or whitespace-only message text
    #[error("message cannot be empty")]
    MessageTextEmpty,
}

/// Errors raised by the broadcast hub's registry operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("Connection '{0}' is already registered")]
    DuplicateConnection(ConnectionId),

    #[error("Connection '{0}' is not registered")]
    ConnectionNotFound(ConnectionId),

    #[error("Failed to serialize envelope: {0}")]
    Serialization(String),
}

/// Failure to hand an envelope to a single subscriber.
///
/// Never surfaced to the publisher; the hub logs it and drops the subscriber.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The subscriber's queue receiver is gone (socket closed)
    #[error("subscriber queue is closed")]
    Closed,

    /// The subscriber's queue stayed full for the whole send timeout
    #[error("subscriber queue stayed full for {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Too many envelopes are already waiting for the full queue
    #[error("subscriber backlog exceeded {limit} envelopes")]
    BacklogFull { limit: usize },
}
