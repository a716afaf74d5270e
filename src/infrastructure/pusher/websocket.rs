//! WebSocket-backed EventPusher implementation.
//!
//! Owns the map of per-connection `UnboundedSender`s. The WebSocket itself is
//! accepted and split in the UI layer; this implementation only receives the
//! outbound half and uses it for delivery, so connection acceptance and event
//! delivery stay separated.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, EventPushError, EventPusher, PusherChannel};

/// EventPusher over per-connection WebSocket sender channels.
pub struct WebSocketEventPusher {
    /// Outbound channels of the currently connected clients.
    connections: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketEventPusher {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for WebSocketEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for WebSocketEventPusher {
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut connections = self.connections.lock().await;
        tracing::debug!("Connection '{}' registered to pusher", connection_id.as_str());
        connections.insert(connection_id, sender);
    }

    async fn unregister(&self, connection_id: &ConnectionId) {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id);
        tracing::debug!(
            "Connection '{}' unregistered from pusher",
            connection_id.as_str()
        );
    }

    async fn send_to(
        &self,
        connection_id: &ConnectionId,
        event: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        if let Some(sender) = connections.get(connection_id) {
            sender
                .send(event.to_string())
                .map_err(|e| EventPushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed event to connection '{}'", connection_id.as_str());
            Ok(())
        } else {
            Err(EventPushError::ConnectionNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &str,
    ) -> Result<(), EventPushError> {
        let connections = self.connections.lock().await;

        for target in targets {
            if let Some(sender) = connections.get(&target) {
                // Individual send failures are tolerated during fan-out.
                if let Err(e) = sender.send(event.to_string()) {
                    tracing::warn!(
                        "Failed to push event to connection '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted event to connection '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}
