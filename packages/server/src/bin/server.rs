//! Single-room WebSocket chat server.
//!
//! Clients claim a display name with `join_chat`, then every `send_message`
//! is relayed to everyone else in the room. Departures are announced with
//! `disconnect_notice`.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin yoriai-server
//! cargo run --bin yoriai-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use yoriai_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemorySessionRepository},
    ui::Server,
    usecase::{
        DisconnectParticipantUseCase, GetParticipantsUseCase, JoinChatUseCase,
        OpenConnectionUseCase, SendMessageUseCase,
    },
};
use yoriai_shared::{
    logger::setup_logger,
    time::{Clock, SystemClock},
};

#[derive(Parser, Debug)]
#[command(name = "yoriai-server")]
#[command(about = "Single-room WebSocket chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases
    // 4. Server

    // 1. Create Repository (in-memory session registry)
    let repository = Arc::new(InMemorySessionRepository::default());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::default());

    // 3. Create UseCases
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let open_connection_usecase = Arc::new(OpenConnectionUseCase::new(message_pusher.clone()));
    let join_chat_usecase = Arc::new(JoinChatUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_participant_usecase = Arc::new(DisconnectParticipantUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let get_participants_usecase = Arc::new(GetParticipantsUseCase::new(repository));

    // 4. Create and run the server
    let server = Server::new(
        open_connection_usecase,
        join_chat_usecase,
        send_message_usecase,
        disconnect_participant_usecase,
        get_participants_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
