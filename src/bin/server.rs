//! WebRTC signaling relay server.
//!
//! Relays opaque WebRTC negotiation payloads between browser clients and
//! carries a room-scoped chat with history replay for late joiners.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use huddle::{
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{pusher::WebSocketEventPusher, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        DisconnectUseCase, ForwardSignalUseCase, GetRoomsUseCase, JoinCallUseCase, SendChatUseCase,
    },
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "WebRTC signaling relay server", long_about = None)]
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
    // 1. Registry
    // 2. EventPusher
    // 3. UseCases
    // 4. Server

    // 1. Create the registry (single source of truth, constructed once and
    //    passed by handle so no ambient module-level state exists)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 2. Create the pusher (WebSocket implementation)
    let pusher = Arc::new(WebSocketEventPusher::new());

    // 3. Create UseCases
    let clock = Arc::new(SystemClock);
    let join_call_usecase = Arc::new(JoinCallUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let forward_signal_usecase = Arc::new(ForwardSignalUseCase::new(pusher.clone()));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(registry.clone(), pusher.clone()));
    let disconnect_usecase = Arc::new(DisconnectUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock,
    ));
    let get_rooms_usecase = Arc::new(GetRoomsUseCase::new(registry));

    // 4. Create and run the server
    let server = Server::new(
        pusher,
        join_call_usecase,
        forward_signal_usecase,
        send_chat_usecase,
        disconnect_usecase,
        get_rooms_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
