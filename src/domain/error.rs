//! Registry error definitions.

use thiserror::Error;

/// Errors a [`super::RoomRegistry`] operation can report.
///
/// The dispatcher treats every variant as a benign condition: nothing in the
/// signaling core escalates a registry error into a closed connection or a
/// crashed process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The connection is already a member of a room. A second `join-call`
    /// from a joined connection is rejected rather than creating a
    /// double membership.
    #[error("connection '{connection}' is already a member of room '{room}'")]
    AlreadyJoined { connection: String, room: String },
}
