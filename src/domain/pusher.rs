//! EventPusher trait definition.
//!
//! Abstracts the outbound half of the transport: delivering serialized
//! events to one connection or fanning them out to a membership snapshot.
//! The WebSocket implementation lives in the infrastructure layer.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ConnectionId;

/// Channel used to push serialized events to a single connection.
pub type PusherChannel = mpsc::UnboundedSender<String>;

/// Errors reported when pushing an event to a connection.
#[derive(Debug, Error)]
pub enum EventPushError {
    /// No live channel is registered for the target connection.
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),
    /// The channel exists but the send failed (receiver task gone).
    #[error("push failed: {0}")]
    PushFailed(String),
}

/// Outbound event delivery.
///
/// All sends are fire-and-forget: an event addressed to a connection that
/// dropped in the meantime simply fails to arrive, with no retry.
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Register the outbound channel of a newly accepted connection.
    async fn register(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Remove a connection's channel after it disconnected.
    async fn unregister(&self, connection_id: &ConnectionId);

    /// Deliver an event to exactly one connection.
    async fn send_to(&self, connection_id: &ConnectionId, event: &str)
    -> Result<(), EventPushError>;

    /// Deliver an event to every connection in `targets`.
    ///
    /// Individual misses are tolerated; the call only reports failure when
    /// the fan-out as a whole could not be attempted.
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &str,
    ) -> Result<(), EventPushError>;
}
