//! Shared utilities for Dengon server and client.

pub mod logger;
pub mod time;
