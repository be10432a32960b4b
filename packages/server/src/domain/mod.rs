//! Domain layer for the broadcast relay.
//!
//! This module contains the channel/event model and the broadcast contract,
//! independent of HTTP, WebSocket and storage concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod hub;
pub mod router;
pub mod value_object;

pub use entity::{Channel, ChannelSummary, Envelope, Message, Payload, PublishReport};
pub use error::{DeliveryError, HubError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use hub::BroadcastHub;
pub use router::{CHAT_CHANNEL, EventRouter, MESSAGE_SENT_EVENT};
pub use value_object::{ChannelName, ConnectionId, EventName, MessageText, Timestamp};
