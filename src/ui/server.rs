//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::domain::EventPusher;
use crate::usecase::{
    DisconnectUseCase, ForwardSignalUseCase, GetRoomsUseCase, JoinCallUseCase, SendChatUseCase,
};

use super::{
    handler::{get_rooms, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebRTC signaling relay server
///
/// This struct encapsulates the server configuration and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     pusher,
///     join_call_usecase,
///     forward_signal_usecase,
///     send_chat_usecase,
///     disconnect_usecase,
///     get_rooms_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    pusher: Arc<dyn EventPusher>,
    join_call_usecase: Arc<JoinCallUseCase>,
    forward_signal_usecase: Arc<ForwardSignalUseCase>,
    send_chat_usecase: Arc<SendChatUseCase>,
    disconnect_usecase: Arc<DisconnectUseCase>,
    get_rooms_usecase: Arc<GetRoomsUseCase>,
}

impl Server {
    /// Create a new Server instance from its wired dependencies.
    pub fn new(
        pusher: Arc<dyn EventPusher>,
        join_call_usecase: Arc<JoinCallUseCase>,
        forward_signal_usecase: Arc<ForwardSignalUseCase>,
        send_chat_usecase: Arc<SendChatUseCase>,
        disconnect_usecase: Arc<DisconnectUseCase>,
        get_rooms_usecase: Arc<GetRoomsUseCase>,
    ) -> Self {
        Self {
            pusher,
            join_call_usecase,
            forward_signal_usecase,
            send_chat_usecase,
            disconnect_usecase,
            get_rooms_usecase,
        }
    }

    /// Build the axum router for this server.
    ///
    /// Exposed separately from [`Server::run`] so tests can serve the router
    /// on an ephemeral port.
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            pusher: self.pusher,
            join_call_usecase: self.join_call_usecase,
            forward_signal_usecase: self.forward_signal_usecase,
            send_chat_usecase: self.send_chat_usecase,
            disconnect_usecase: self.disconnect_usecase,
            get_rooms_usecase: self.get_rooms_usecase,
        });

        Router::new()
            // WebSocket endpoint (the signaling channel)
            .route("/ws", get(websocket_handler))
            // HTTP endpoints (observability)
            .route("/api/health", get(health_check))
            .route("/api/rooms", get(get_rooms))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the signaling relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Signaling relay server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
