//! RoomRegistry trait definition.
//!
//! The registry is the single source of truth for room membership, join
//! timestamps, and chat history. Every operation must be atomic with respect
//! to every other operation: callers observe no partial updates, and the
//! snapshots returned here are taken under the same exclusion as the
//! mutation they accompany.

use async_trait::async_trait;

use super::{ChatEntry, ConnectionId, RegistryError, RoomKey, RoomSummary, Timestamp};

/// Snapshot returned by a successful join, taken under one lock acquisition.
///
/// `members` (including the joiner, in join order) is the `user-joined`
/// broadcast target list; `history` is replayed to the joiner afterwards.
/// Both reflect the same instant, so a concurrent join/leave/chat cannot
/// wedge itself between the broadcast and the replay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSnapshot {
    pub members: Vec<ConnectionId>,
    pub history: Vec<ChatEntry>,
}

/// One room a connection was removed from on leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: RoomKey,
    /// Pre-removal membership minus the leaver: the connections that must
    /// receive a `user-left` notification.
    pub remaining: Vec<ConnectionId>,
}

/// Result of removing a connection from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LeaveOutcome {
    /// Rooms the connection was removed from. At most one under normal
    /// operation, but `leave` is defensive and reports every room the
    /// connection appeared in.
    pub departures: Vec<Departure>,
    /// Join timestamp recorded for the connection, if it ever joined.
    /// Used only for the online-duration diagnostic on disconnect.
    pub joined_at: Option<Timestamp>,
}

/// Connection registry contract.
///
/// Implementations must make each call linearizable with respect to all
/// other registry calls; a single mutex around the whole state is sufficient.
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Add a connection to a room, creating the room if absent.
    ///
    /// Records the join timestamp and returns the membership and history
    /// snapshot taken in the same atomic step. Fails with
    /// [`RegistryError::AlreadyJoined`] if the connection is already a
    /// member of any room.
    async fn join(
        &self,
        room: RoomKey,
        connection_id: ConnectionId,
        joined_at: Timestamp,
    ) -> Result<JoinSnapshot, RegistryError>;

    /// Remove a connection from every room it appears in, deleting any room
    /// (and its history) left with zero members in the same atomic step.
    /// Idempotent: leaving a connection that is nowhere returns an empty
    /// outcome.
    async fn leave(&self, connection_id: &ConnectionId) -> LeaveOutcome;

    /// Append a chat entry to a room's history and return the membership
    /// snapshot for broadcast. Returns an empty list without recording
    /// anything if the room no longer exists (a disconnect may have removed
    /// it between routing and recording).
    async fn record_chat(&self, room: &RoomKey, entry: ChatEntry) -> Vec<ConnectionId>;

    /// Ordered chat history of a room; empty if the room is absent.
    async fn history(&self, room: &RoomKey) -> Vec<ChatEntry>;

    /// Ordered membership of a room; empty if the room is absent.
    async fn members(&self, room: &RoomKey) -> Vec<ConnectionId>;

    /// Room the connection currently belongs to, if any.
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomKey>;

    /// Summaries of all live rooms, for the observability API.
    async fn rooms(&self) -> Vec<RoomSummary>;
}
