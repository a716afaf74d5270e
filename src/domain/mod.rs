//! Domain layer: value objects, entities, and the interfaces the rest of the
//! crate depends on.
//!
//! The concrete implementations (in-memory registry, WebSocket pusher) live
//! in the infrastructure layer and depend on the traits defined here, not the
//! other way around.

mod error;
mod model;
mod pusher;
mod registry;

pub use error::RegistryError;
pub use model::{ChatEntry, ConnectionId, RoomKey, RoomSummary, Timestamp};
pub use pusher::{EventPushError, EventPusher, PusherChannel};
pub use registry::{Departure, JoinSnapshot, LeaveOutcome, RoomRegistry};
