//! Dengon chat client.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-client -- --url http://127.0.0.1:8080
//! ```

use std::time::Duration;

use clap::Parser;
use dengon_client::{
    ClientConfig,
    config::{DEFAULT_CHANNEL, DEFAULT_SERVER_URL},
    reconnect::{DEFAULT_MAX_ATTEMPTS, ReconnectPolicy},
    run_client,
};
use dengon_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "dengon-client", version, about = "Dengon chat client")]
struct Args {
    /// Relay base URL (http(s):// or ws(s)://)
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    url: String,

    /// Channel to subscribe to
    #[arg(long, default_value = DEFAULT_CHANNEL)]
    channel: String,

    /// Reconnect attempts per outage (0 disables reconnection)
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    max_reconnects: u32,

    /// Delay between reconnect attempts
    #[arg(long, default_value_t = 2000)]
    reconnect_delay_ms: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let reconnect = ReconnectPolicy {
        max_attempts: args.max_reconnects,
        delay: Duration::from_millis(args.reconnect_delay_ms),
    };
    let config = match ClientConfig::new(&args.url, args.channel, reconnect) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run_client(config).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
