//! Logger setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for a binary.
///
/// Crate names use `_` in tracing targets, so `dengon-server` becomes `dengon_server`.
pub fn default_directive(bin_name: &str, level: &str) -> String {
    let target = bin_name.replace('-', "_");
    format!("{target}={level},dengon_shared={level},tower_http={level}")
}

/// Initialize tracing for a binary.
///
/// `RUST_LOG` wins when set; otherwise the binary, its library crate and
/// `tower_http` log at `level`.
pub fn setup_logger(bin_name: &str, level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
