//! In-memory RoomRegistry implementation.
//!
//! All registry state lives in one struct guarded by a single
//! `tokio::sync::Mutex`. Every trait operation is exactly one lock
//! acquisition, which makes each call linearizable with respect to all other
//! registry operations and guarantees that the snapshots an operation returns
//! were taken at the same instant as its mutation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatEntry, ConnectionId, Departure, JoinSnapshot, LeaveOutcome, RegistryError, RoomKey,
    RoomRegistry, RoomSummary, Timestamp,
};

/// Mutable registry state. Mutated only while holding the registry mutex.
///
/// `room_index` is a reverse index over `rooms` (connection → room) and is
/// updated in the same critical section as every `rooms` mutation, so the
/// two maps are always consistent.
#[derive(Debug, Default)]
struct RegistryState {
    /// Room key → member connections, in join order.
    rooms: HashMap<RoomKey, Vec<ConnectionId>>,
    /// Room key → stored chat entries, in append order.
    histories: HashMap<RoomKey, Vec<ChatEntry>>,
    /// Connection → timestamp recorded when it joined its room.
    joined_at: HashMap<ConnectionId, Timestamp>,
    /// Connection → room it belongs to (reverse index over `rooms`).
    room_index: HashMap<ConnectionId, RoomKey>,
}

/// In-memory registry, the single source of truth for room membership and
/// chat history.
pub struct InMemoryRoomRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl InMemoryRoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(RegistryState::default())),
        }
    }
}

impl Default for InMemoryRoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRoomRegistry {
    async fn join(
        &self,
        room: RoomKey,
        connection_id: ConnectionId,
        joined_at: Timestamp,
    ) -> Result<JoinSnapshot, RegistryError> {
        let mut state = self.state.lock().await;

        // A connection belongs to at most one room; a second join (same room
        // or another one) is rejected without mutating anything.
        if let Some(existing) = state.room_index.get(&connection_id) {
            return Err(RegistryError::AlreadyJoined {
                connection: connection_id.as_str().to_string(),
                room: existing.as_str().to_string(),
            });
        }

        let members = {
            let room_members = state.rooms.entry(room.clone()).or_default();
            room_members.push(connection_id.clone());
            room_members.clone()
        };
        state.joined_at.insert(connection_id.clone(), joined_at);
        state.room_index.insert(connection_id, room.clone());

        // History snapshot under the same lock acquisition as the membership
        // mutation: the caller's user-joined broadcast and history replay
        // observe one consistent instant.
        let history = state.histories.get(&room).cloned().unwrap_or_default();

        Ok(JoinSnapshot { members, history })
    }

    async fn leave(&self, connection_id: &ConnectionId) -> LeaveOutcome {
        let mut state = self.state.lock().await;

        // The reverse index pins a connection to one room, but removal is
        // defensive and scans every room the connection appears in.
        let mut departures = Vec::new();
        let mut emptied = Vec::new();
        for (key, members) in state.rooms.iter_mut() {
            let before = members.len();
            members.retain(|m| m != connection_id);
            if members.len() != before {
                departures.push(Departure {
                    room: key.clone(),
                    remaining: members.clone(),
                });
                if members.is_empty() {
                    emptied.push(key.clone());
                }
            }
        }

        // A room with zero members does not persist; its history goes with it.
        for key in emptied {
            state.rooms.remove(&key);
            state.histories.remove(&key);
        }

        state.room_index.remove(connection_id);
        let joined_at = state.joined_at.remove(connection_id);

        LeaveOutcome {
            departures,
            joined_at,
        }
    }

    async fn record_chat(&self, room: &RoomKey, entry: ChatEntry) -> Vec<ConnectionId> {
        let mut state = self.state.lock().await;

        // A disconnect race may have deleted the room between routing and
        // recording; the message is silently dropped in that case.
        let members = match state.rooms.get(room) {
            Some(members) => members.clone(),
            None => return Vec::new(),
        };

        state.histories.entry(room.clone()).or_default().push(entry);
        members
    }

    async fn history(&self, room: &RoomKey) -> Vec<ChatEntry> {
        let state = self.state.lock().await;
        state.histories.get(room).cloned().unwrap_or_default()
    }

    async fn members(&self, room: &RoomKey) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state.rooms.get(room).cloned().unwrap_or_default()
    }

    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomKey> {
        let state = self.state.lock().await;
        state.room_index.get(connection_id).cloned()
    }

    async fn rooms(&self) -> Vec<RoomSummary> {
        let state = self.state.lock().await;
        state
            .rooms
            .iter()
            .map(|(key, members)| RoomSummary {
                key: key.clone(),
                members: members.clone(),
                message_count: state.histories.get(key).map_or(0, |h| h.len()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string())
    }

    fn room(key: &str) -> RoomKey {
        RoomKey::new(key.to_string())
    }

    fn entry(name: &str, payload: &str, sender: &str) -> ChatEntry {
        ChatEntry {
            display_name: name.to_string(),
            payload: payload.to_string(),
            sender: conn(sender),
        }
    }

    #[tokio::test]
    async fn test_join_creates_room_and_returns_snapshot() {
        // given:
        let registry = InMemoryRoomRegistry::new();

        // when:
        let snapshot = registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();

        // then: the joiner itself is part of the membership snapshot
        assert_eq!(snapshot.members, vec![conn("a")]);
        assert!(snapshot.history.is_empty());
        assert_eq!(registry.members(&room("room1")).await, vec![conn("a")]);
    }

    #[tokio::test]
    async fn test_join_preserves_join_order() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join(room("room1"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();

        // when:
        let snapshot = registry
            .join(room("room1"), conn("c"), Timestamp::new(3000))
            .await
            .unwrap();

        // then:
        assert_eq!(snapshot.members, vec![conn("a"), conn("b"), conn("c")]);
    }

    #[tokio::test]
    async fn test_member_count_equals_number_of_successful_joins() {
        // given:
        let registry = InMemoryRoomRegistry::new();

        // when:
        for i in 0..5 {
            registry
                .join(room("room1"), conn(&format!("c{i}")), Timestamp::new(1000))
                .await
                .unwrap();
        }

        // then:
        assert_eq!(registry.members(&room("room1")).await.len(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_join_same_room_is_rejected() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();

        // when:
        let result = registry
            .join(room("room1"), conn("a"), Timestamp::new(2000))
            .await;

        // then: no duplicate membership is created
        assert_eq!(
            result,
            Err(RegistryError::AlreadyJoined {
                connection: "a".to_string(),
                room: "room1".to_string(),
            })
        );
        assert_eq!(registry.members(&room("room1")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_second_join_to_different_room_is_rejected() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();

        // when:
        let result = registry
            .join(room("room2"), conn("a"), Timestamp::new(2000))
            .await;

        // then: the connection stays a member of its first room only
        assert!(result.is_err());
        assert!(registry.members(&room("room2")).await.is_empty());
        assert_eq!(registry.room_of(&conn("a")).await, Some(room("room1")));
    }

    #[tokio::test]
    async fn test_join_replays_existing_history_in_order() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .record_chat(&room("room1"), entry("Alice", "hi", "a"))
            .await;
        registry
            .record_chat(&room("room1"), entry("Alice", "anyone here?", "a"))
            .await;

        // when:
        let snapshot = registry
            .join(room("room1"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();

        // then: history arrives in append order, no gaps, no duplicates
        assert_eq!(
            snapshot.history,
            vec![
                entry("Alice", "hi", "a"),
                entry("Alice", "anyone here?", "a"),
            ]
        );
    }

    #[tokio::test]
    async fn test_leave_reports_remaining_members() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join(room("room1"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();
        registry
            .join(room("room1"), conn("c"), Timestamp::new(3000))
            .await
            .unwrap();

        // when:
        let outcome = registry.leave(&conn("b")).await;

        // then:
        assert_eq!(outcome.departures.len(), 1);
        assert_eq!(outcome.departures[0].room, room("room1"));
        assert_eq!(outcome.departures[0].remaining, vec![conn("a"), conn("c")]);
        assert_eq!(outcome.joined_at, Some(Timestamp::new(2000)));
        assert_eq!(registry.members(&room("room1")).await, vec![conn("a"), conn("c")]);
    }

    #[tokio::test]
    async fn test_leave_deletes_emptied_room_and_its_history() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .record_chat(&room("room1"), entry("Alice", "hi", "a"))
            .await;

        // when:
        let outcome = registry.leave(&conn("a")).await;

        // then: room deletion is atomic with the removal of its last member
        assert_eq!(outcome.departures.len(), 1);
        assert!(outcome.departures[0].remaining.is_empty());
        assert!(registry.members(&room("room1")).await.is_empty());
        assert!(registry.history(&room("room1")).await.is_empty());
        assert!(registry.rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_leave_unknown_connection_is_a_no_op() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();

        // when:
        let outcome = registry.leave(&conn("ghost")).await;

        // then:
        assert!(outcome.departures.is_empty());
        assert!(outcome.joined_at.is_none());
        assert_eq!(registry.members(&room("room1")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_record_chat_returns_membership_snapshot() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join(room("room1"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();

        // when:
        let targets = registry
            .record_chat(&room("room1"), entry("Alice", "hi", "a"))
            .await;

        // then: the snapshot includes the sender
        assert_eq!(targets, vec![conn("a"), conn("b")]);
        assert_eq!(registry.history(&room("room1")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_record_chat_into_missing_room_is_dropped() {
        // given:
        let registry = InMemoryRoomRegistry::new();

        // when:
        let targets = registry
            .record_chat(&room("gone"), entry("Alice", "hi", "a"))
            .await;

        // then: nothing recorded, nothing to broadcast
        assert!(targets.is_empty());
        assert!(registry.history(&room("gone")).await.is_empty());
    }

    #[tokio::test]
    async fn test_room_of_uses_reverse_index() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join(room("room2"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();

        // when / then:
        assert_eq!(registry.room_of(&conn("a")).await, Some(room("room1")));
        assert_eq!(registry.room_of(&conn("b")).await, Some(room("room2")));
        assert_eq!(registry.room_of(&conn("c")).await, None);

        // leaving clears the index entry
        registry.leave(&conn("a")).await;
        assert_eq!(registry.room_of(&conn("a")).await, None);
    }

    #[tokio::test]
    async fn test_rooms_summaries() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join(room("room1"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();
        registry
            .record_chat(&room("room1"), entry("Alice", "hi", "a"))
            .await;

        // when:
        let summaries = registry.rooms().await;

        // then:
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].key, room("room1"));
        assert_eq!(summaries[0].members, vec![conn("a"), conn("b")]);
        assert_eq!(summaries[0].message_count, 1);
    }

    #[tokio::test]
    async fn test_histories_are_isolated_per_room() {
        // given:
        let registry = InMemoryRoomRegistry::new();
        registry
            .join(room("room1"), conn("a"), Timestamp::new(1000))
            .await
            .unwrap();
        registry
            .join(room("room2"), conn("b"), Timestamp::new(2000))
            .await
            .unwrap();

        // when:
        registry
            .record_chat(&room("room1"), entry("Alice", "hi", "a"))
            .await;

        // then:
        assert_eq!(registry.history(&room("room1")).await.len(), 1);
        assert!(registry.history(&room("room2")).await.is_empty());
    }
}
