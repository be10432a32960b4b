//! Channel/Event Router.
//!
//! Validates an inbound message and shapes it into an [`Envelope`]. No other
//! transformation happens here: the text is carried as submitted.

use dengon_shared::time::timestamp_to_jst_rfc3339;

use super::{
    entity::{Envelope, Message},
    error::ValueObjectError,
    value_object::{ChannelName, EventName, MessageText, Timestamp},
};

/// Channel the ingress endpoint publishes chat messages to.
pub const CHAT_CHANNEL: &str = "chat";

/// Event name attached to chat messages.
pub const MESSAGE_SENT_EVENT: &str = "message.sent";

pub struct EventRouter;

impl EventRouter {
    /// Route raw message text to `channel` under `event_name`.
    ///
    /// # Errors
    ///
    /// `MessageTextEmpty` if the text is blank after trimming, plus the
    /// validation errors of [`ChannelName`] and [`EventName`].
    pub fn route(
        raw_message: &str,
        channel: &str,
        event_name: &str,
    ) -> Result<Envelope, ValueObjectError> {
        let text = MessageText::new(raw_message.to_string())?;
        let channel = ChannelName::try_from(channel)?;
        let event = EventName::try_from(event_name)?;

        let message = Message::new(text, Timestamp::now());
        tracing::debug!(
            "Routing message received at {} to channel '{}' as '{}'",
            timestamp_to_jst_rfc3339(message.timestamp().value()),
            channel,
            event
        );
        Ok(Self::route_message(message, channel, event))
    }

    /// Route to the `"chat"` channel as `"message.sent"`.
    pub fn chat(raw_message: &str) -> Result<Envelope, ValueObjectError> {
        Self::route(raw_message, CHAT_CHANNEL, MESSAGE_SENT_EVENT)
    }

    /// Wrap an already validated message.
    pub fn route_message(message: Message, channel: ChannelName, event: EventName) -> Envelope {
        Envelope::new(channel, event, message)
    }
}
