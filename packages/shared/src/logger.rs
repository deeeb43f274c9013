//! Logging setup for the yoriai binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Library crates whose spans and events should be visible by default.
const WORKSPACE_CRATES: [&str; 3] = ["yoriai_shared", "yoriai_server", "yoriai_client"];

/// Build the default filter directives for a binary.
///
/// Every workspace crate and the binary itself log at `default_log_level`;
/// everything else (axum, hyper, tungstenite, ...) stays at the global default.
pub fn default_directives(binary_name: &str, default_log_level: &str) -> String {
    WORKSPACE_CRATES
        .iter()
        .copied()
        .chain(std::iter::once(binary_name))
        .map(|target| format!("{}={}", target.replace('-', "_"), default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the defaults built by [`default_directives`].
///
/// # Examples
///
/// ```no_run
/// use yoriai_shared::logger::setup_logger;
///
/// setup_logger("yoriai-server", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(binary_name, default_log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
