//! UseCase: joining a room.
//!
//! Registers the connection in the requested room and hands the caller the
//! membership/history snapshot taken in the same atomic registry step. The
//! caller broadcasts `user-joined` to the snapshot membership (including the
//! joiner) first, then replays the history snapshot to the joiner, so the
//! join notification always happens before the replayed messages.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{ConnectionId, EventPusher, JoinSnapshot, RoomKey, RoomRegistry, Timestamp};

use super::error::JoinError;

pub struct JoinCallUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl JoinCallUseCase {
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

    /// Join a room, recording the join timestamp.
    ///
    /// # Returns
    ///
    /// * `Ok(JoinSnapshot)` - membership (broadcast targets, joiner included)
    ///   and history (replay source) taken under one registry lock
    /// * `Err(JoinError::AlreadyJoined)` - the connection is already in a
    ///   room; treated as a benign no-op by the caller
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        room: RoomKey,
    ) -> Result<JoinSnapshot, JoinError> {
        let joined_at = Timestamp::new(self.clock.now_millis());
        let snapshot = self.registry.join(room, connection_id, joined_at).await?;
        Ok(snapshot)
    }

    /// Broadcast a pre-serialized `user-joined` event to the room snapshot.
    pub async fn broadcast_user_joined(
        &self,
        targets: Vec<ConnectionId>,
        event: &str,
    ) -> Result<(), String> {
        self.pusher
            .broadcast(targets, event)
            .await
            .map_err(|e| e.to_string())
    }

    /// Replay pre-serialized chat events to the joiner, in order.
    ///
    /// A joiner that dropped between join and replay is a benign miss.
    pub async fn replay_history(&self, joiner: &ConnectionId, events: &[String]) {
        for event in events {
            if let Err(e) = self.pusher.send_to(joiner, event).await {
                tracing::debug!(
                    "History replay to '{}' stopped: {}",
                    joiner.as_str(),
                    e
                );
                return;
            }
        }
    }
}
