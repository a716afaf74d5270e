//! Core value objects and entities of the signaling domain.

use serde::Serialize;
use uuid::Uuid;

/// Opaque identifier of a live connection.
///
/// Assigned by the transport layer when a WebSocket connection is accepted;
/// clients never choose their own id. Ids received over the wire (the target
/// of a `signal` event) are wrapped without validation — an unknown id is a
/// benign miss, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Wrap an existing id (ids arriving over the wire, tests).
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh id for a newly accepted connection.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Key of a room: the arbitrary path string the client joined with.
///
/// No validation is applied; any string names a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomKey(String);

impl RoomKey {
    pub fn new(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Elapsed milliseconds between this timestamp and a later one.
    pub fn elapsed_until(&self, later: Timestamp) -> i64 {
        (later.0 - self.0).abs()
    }
}

/// One chat message stored in a room's history.
///
/// Entries are immutable once appended and are replayed in append order to
/// every late joiner. The payload is opaque to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Display name the sender attached to the message.
    pub display_name: String,
    /// Message text; never interpreted by the relay.
    pub payload: String,
    /// Connection that sent the message.
    pub sender: ConnectionId,
}

/// Read model of a room for the observability API.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub key: RoomKey,
    pub members: Vec<ConnectionId>,
    pub message_count: usize,
}
