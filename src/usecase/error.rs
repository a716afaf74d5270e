//! UseCase error definitions.

use thiserror::Error;

use crate::domain::RegistryError;

/// Errors of the join-call use case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The connection already belongs to a room; the second join is a no-op.
    #[error("connection '{connection}' is already a member of room '{room}'")]
    AlreadyJoined { connection: String, room: String },
}

impl From<RegistryError> for JoinError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::AlreadyJoined { connection, room } => {
                JoinError::AlreadyJoined { connection, room }
            }
        }
    }
}
