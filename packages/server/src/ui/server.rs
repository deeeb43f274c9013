//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::{
    DisconnectParticipantUseCase, GetParticipantsUseCase, JoinChatUseCase, OpenConnectionUseCase,
    SendMessageUseCase,
};

use super::{
    handler::{get_participants, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     open_connection_usecase,
///     join_chat_usecase,
///     send_message_usecase,
///     disconnect_participant_usecase,
///     get_participants_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
}

impl Server {
    pub fn new(
        open_connection_usecase: Arc<OpenConnectionUseCase>,
        join_chat_usecase: Arc<JoinChatUseCase>,
        send_message_usecase: Arc<SendMessageUseCase>,
        disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
        get_participants_usecase: Arc<GetParticipantsUseCase>,
    ) -> Self {
        Self {
            app_state: Arc::new(AppState {
                open_connection_usecase,
                join_chat_usecase,
                send_message_usecase,
                disconnect_participant_usecase,
                get_participants_usecase,
            }),
        }
    }

    /// Build the axum router.
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/participants", get(get_participants))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Serve on an already bound listener until Ctrl+C / SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        tracing::info!(
            "WebSocket chat server listening on {}",
            listener.local_addr()?
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Bind to `host:port` and serve.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> std::io::Result<()> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }
}
