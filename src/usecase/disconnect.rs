//! UseCase: connection disconnect.
//!
//! Removes the connection from the registry (deleting any room it empties),
//! unregisters its outbound channel, and logs the online duration recorded
//! at join time. The duration is purely a diagnostic; no business decision
//! depends on it.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{ConnectionId, EventPusher, LeaveOutcome, RoomRegistry, Timestamp};

pub struct DisconnectUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl DisconnectUseCase {
    pub fn new(
        registry: Arc<dyn RoomRegistry>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// Remove a disconnected connection from the registry and the pusher.
    ///
    /// # Returns
    ///
    /// The rooms left, each with the membership that must receive a
    /// `user-left` notification. Idempotent for unknown connections.
    pub async fn execute(&self, connection_id: &ConnectionId) -> LeaveOutcome {
        let outcome = self.registry.leave(connection_id).await;
        self.pusher.unregister(connection_id).await;

        if let Some(joined_at) = outcome.joined_at {
            let online_ms = joined_at.elapsed_until(Timestamp::new(self.clock.now_millis()));
            tracing::info!(
                "Connection '{}' was online for {} ms",
                connection_id.as_str(),
                online_ms
            );
        }

        outcome
    }

    /// Broadcast a pre-serialized `user-left` event to the remaining members.
    pub async fn broadcast_user_left(
        &self,
        targets: Vec<ConnectionId>,
        event: &str,
    ) -> Result<(), String> {
        self.pusher
            .broadcast(targets, event)
            .await
            .map_err(|e| e.to_string())
    }
}
