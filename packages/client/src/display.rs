//! Terminal rendering of chat events and the connectivity indicator.

use crate::{
    state::{ConnectionState, TransportFailure},
    subscription::ClientEvent,
};

pub fn render_state(state: ConnectionState, failure: Option<&TransportFailure>) -> String {
    match (state, failure) {
        (ConnectionState::Connected, _) => "● online".to_string(),
        (ConnectionState::Connecting, _) => "◌ connecting...".to_string(),
        (ConnectionState::Disconnected, Some(failure)) => format!("○ offline ({failure})"),
        (ConnectionState::Disconnected, None) => "○ offline".to_string(),
    }
}

pub fn render_message(channel: &str, text: &str) -> String {
    format!("[{channel}] {text}")
}

/// One line of output per event.
pub fn render_event(event: &ClientEvent) -> String {
    match event {
        ClientEvent::StateChanged { state, failure } => render_state(*state, failure.as_ref()),
        ClientEvent::Message { channel, text, .. } => render_message(channel, text),
        ClientEvent::GaveUp { attempts } => format!(
            "○ offline: gave up after {attempts} reconnect attempt(s); restart to reconnect"
        ),
    }
}
