//! UseCase: room-scoped chat.
//!
//! Routes a chat message to the sender's current room via the registry's
//! reverse lookup, appends it to the room history, and returns the broadcast
//! target snapshot (sender included). A sender that is not in any room, or
//! whose room vanished in a disconnect race, has its message dropped.

use std::sync::Arc;

use crate::domain::{ChatEntry, ConnectionId, EventPusher, RoomKey, RoomRegistry};

/// Routing result of a recorded chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBroadcast {
    /// Room the message was recorded into.
    pub room: RoomKey,
    /// Membership snapshot at record time, including the sender.
    pub targets: Vec<ConnectionId>,
}

pub struct SendChatUseCase {
    registry: Arc<dyn RoomRegistry>,
    pusher: Arc<dyn EventPusher>,
}

impl SendChatUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// Record a chat message into the sender's room.
    ///
    /// # Returns
    ///
    /// * `Some(ChatBroadcast)` - the message was recorded; broadcast targets
    ///   include the sender so its UI reflects confirmed delivery
    /// * `None` - the sender is in no room (or the room just vanished); the
    ///   message is dropped
    pub async fn execute(
        &self,
        sender: &ConnectionId,
        display_name: String,
        payload: String,
    ) -> Option<ChatBroadcast> {
        let room = match self.registry.room_of(sender).await {
            Some(room) => room,
            None => {
                tracing::debug!(
                    "Chat from '{}' dropped: not a member of any room",
                    sender.as_str()
                );
                return None;
            }
        };

        let entry = ChatEntry {
            display_name,
            payload,
            sender: sender.clone(),
        };
        let targets = self.registry.record_chat(&room, entry).await;
        if targets.is_empty() {
            // Disconnect race deleted the room between lookup and record.
            tracing::debug!(
                "Chat from '{}' dropped: room '{}' no longer exists",
                sender.as_str(),
                room.as_str()
            );
            return None;
        }

        Some(ChatBroadcast { room, targets })
    }

    /// Broadcast a pre-serialized `chat-message` event to the room snapshot.
    pub async fn broadcast_chat(
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
