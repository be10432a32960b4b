//! Broadcast relay server.
//!
//! Accepts chat messages over HTTP and broadcasts them to WebSocket subscribers.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-server -- --port 8080
//! ```

use std::time::Duration;

use clap::Parser;
use dengon_server::{
    Server, ServerConfig,
    infrastructure::hub::{DEFAULT_QUEUE_CAPACITY, HubConfig},
};
use dengon_shared::logger::setup_logger;

#[derive(Debug, Parser)]
#[command(name = "dengon-server", version, about = "Dengon chat broadcast relay")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Channel that POST /api/chat/send publishes to
    #[arg(long, default_value = "chat")]
    channel: String,

    /// Event name attached to published messages
    #[arg(long, default_value = "message.sent")]
    event: String,

    /// How long a publish waits on one slow subscriber before dropping it
    #[arg(long, default_value_t = 500)]
    send_timeout_ms: u64,

    /// Outbound queue capacity per connection
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    log_level: String,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            channel: args.channel,
            event: args.event,
            hub: HubConfig {
                send_timeout: Duration::from_millis(args.send_timeout_ms),
                queue_capacity: args.queue_capacity,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let server = match Server::new(args.into()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    // Run the server
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
