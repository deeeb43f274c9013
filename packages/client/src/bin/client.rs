//! Terminal chat client for yoriai.
//!
//! Connects to the chat server, joins under the given display name and relays
//! typed lines as chat messages. `/status` shows the connection state and
//! `/exit` leaves. Reconnects on connection loss (max 5 attempts with 5 second
//! interval) and joins again under the last accepted name.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yoriai-client -- --username Alice
//! cargo run --bin yoriai-client -- -n Bob -u ws://127.0.0.1:8080/ws
//! ```

use clap::Parser;

use yoriai_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "yoriai-client")]
#[command(about = "Terminal client for the yoriai chat room", long_about = None)]
struct Args {
    /// Display name to join with (must not be in use)
    #[arg(short = 'n', long)]
    username: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = yoriai_client::run_client(args.url, args.username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
