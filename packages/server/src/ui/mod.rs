//! UI layer: HTTP and WebSocket endpoints of the relay.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::{Server, ServerConfig, ServerError, create_router};
