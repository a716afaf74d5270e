//! WebSocket connection handler: the transport side of the signaling relay.
//!
//! Accepts a connection, assigns it an opaque connection id, registers its
//! outbound channel, and dispatches every inbound event to the matching use
//! case. Outbound event JSON is assembled here; the use cases only see domain
//! values and pre-serialized strings.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, RoomKey},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    ui::state::AppState,
    usecase::JoinError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives events from the rx channel and pushes them to
/// the WebSocket sender.
///
/// This is the outbound half of the connection: events addressed to this
/// connection (signals, chat, presence) arrive on the channel and are written
/// to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if sender.send(Message::Text(event.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    // The transport layer assigns the connection id; clients never pick one.
    let connection_id = ConnectionId::generate();
    tracing::info!("Connection '{}' accepted", connection_id.as_str());

    let (sender, mut receiver) = socket.split();

    // Register the outbound channel (the implicit connect event).
    let (tx, rx) = mpsc::unbounded_channel();
    state.pusher.register(connection_id.clone(), tx).await;

    let conn_for_recv = connection_id.clone();
    let state_for_recv = state.clone();

    // Inbound half: parse and dispatch events from this client.
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                    Ok(event) => dispatch_event(&state_for_recv, &conn_for_recv, event).await,
                    Err(e) => {
                        tracing::warn!(
                            "Dropping unparseable frame from '{}': {}",
                            conn_for_recv.as_str(),
                            e
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", conn_for_recv.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Outbound half.
    let mut send_task = pusher_loop(rx, sender);

    // If either half finishes, the connection is over; abort the other.
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    handle_disconnect(&state, &connection_id).await;
}

/// Route one inbound event to its use case.
async fn dispatch_event(state: &Arc<AppState>, connection_id: &ConnectionId, event: ClientEvent) {
    match event {
        ClientEvent::JoinCall { room } => {
            handle_join_call(state, connection_id, RoomKey::new(room)).await;
        }
        ClientEvent::Signal { to, payload } => {
            handle_signal(state, connection_id, ConnectionId::new(to), payload).await;
        }
        ClientEvent::ChatMessage {
            payload,
            display_name,
        } => {
            handle_chat_message(state, connection_id, payload, display_name).await;
        }
    }
}

async fn handle_join_call(state: &Arc<AppState>, connection_id: &ConnectionId, room: RoomKey) {
    let snapshot = match state
        .join_call_usecase
        .execute(connection_id.clone(), room.clone())
        .await
    {
        Ok(snapshot) => snapshot,
        Err(JoinError::AlreadyJoined { room: existing, .. }) => {
            tracing::warn!(
                "Connection '{}' sent join-call while already in room '{}', ignoring",
                connection_id.as_str(),
                existing
            );
            return;
        }
    };

    // user-joined goes to every member including the joiner, carrying the
    // full roster.
    let joined_event = serde_json::to_string(&ServerEvent::UserJoined {
        id: connection_id.as_str().to_string(),
        members: snapshot
            .members
            .iter()
            .map(|m| m.as_str().to_string())
            .collect(),
    })
    .unwrap();
    if let Err(e) = state
        .join_call_usecase
        .broadcast_user_joined(snapshot.members.clone(), &joined_event)
        .await
    {
        tracing::warn!("Failed to broadcast user-joined: {}", e);
    }

    // History replay to the joiner only, after the join broadcast, in the
    // order the entries were appended.
    let replay: Vec<String> = snapshot
        .history
        .iter()
        .map(|entry| {
            serde_json::to_string(&ServerEvent::ChatMessage {
                payload: entry.payload.clone(),
                display_name: entry.display_name.clone(),
                from: entry.sender.as_str().to_string(),
            })
            .unwrap()
        })
        .collect();
    state
        .join_call_usecase
        .replay_history(connection_id, &replay)
        .await;

    tracing::info!(
        "Connection '{}' joined room '{}' ({} members, {} replayed messages)",
        connection_id.as_str(),
        room.as_str(),
        snapshot.members.len(),
        snapshot.history.len()
    );
}

async fn handle_signal(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    target: ConnectionId,
    payload: serde_json::Value,
) {
    // The payload travels through unmodified; only the sender id is attached.
    let event = serde_json::to_string(&ServerEvent::Signal {
        from: connection_id.as_str().to_string(),
        payload,
    })
    .unwrap();
    state.forward_signal_usecase.execute(&target, &event).await;
}

async fn handle_chat_message(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: String,
    display_name: String,
) {
    let broadcast = match state
        .send_chat_usecase
        .execute(connection_id, display_name.clone(), payload.clone())
        .await
    {
        Some(broadcast) => broadcast,
        // Sender not in any room: the message is dropped.
        None => return,
    };

    let event = serde_json::to_string(&ServerEvent::ChatMessage {
        payload,
        display_name,
        from: connection_id.as_str().to_string(),
    })
    .unwrap();
    if let Err(e) = state
        .send_chat_usecase
        .broadcast_chat(broadcast.targets, &event)
        .await
    {
        tracing::warn!("Failed to broadcast chat-message: {}", e);
    }

    tracing::info!(
        "Chat in room '{}' from '{}'",
        broadcast.room.as_str(),
        connection_id.as_str()
    );
}

async fn handle_disconnect(state: &Arc<AppState>, connection_id: &ConnectionId) {
    let outcome = state.disconnect_usecase.execute(connection_id).await;
    tracing::info!("Connection '{}' disconnected", connection_id.as_str());

    let left_event = serde_json::to_string(&ServerEvent::UserLeft {
        id: connection_id.as_str().to_string(),
    })
    .unwrap();
    for departure in outcome.departures {
        if let Err(e) = state
            .disconnect_usecase
            .broadcast_user_left(departure.remaining, &left_event)
            .await
        {
            tracing::warn!(
                "Failed to broadcast user-left for room '{}': {}",
                departure.room.as_str(),
                e
            );
        }
    }
}
