//! CLI chat client for Dengon.
//!
//! Keeps a live subscription to a channel over WebSocket, renders incoming
//! envelopes with a connectivity indicator, and sends messages through the
//! relay's HTTP endpoint.

pub mod config;
pub mod display;
pub mod error;
pub mod protocol;
pub mod reconnect;
pub mod runner;
pub mod sender;
pub mod state;
pub mod subscription;

pub use config::ClientConfig;
pub use error::ClientError;
pub use runner::run_client;
