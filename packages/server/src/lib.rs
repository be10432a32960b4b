//! Real-time chat broadcast relay.
//!
//! Messages posted to `POST /api/chat/send` are wrapped in an event envelope
//! and fanned out to every WebSocket connection subscribed to the channel.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub use ui::{Server, ServerConfig, ServerError};
