//! WebSocket event DTOs: the signaling wire protocol.
//!
//! Events travel as JSON text frames, internally tagged on `"type"` with
//! kebab-case event names. Signaling payloads (session descriptions, ICE
//! candidates) are carried as raw `serde_json::Value` and are never
//! interpreted by the relay; parsing them is the business of the two
//! endpoints negotiating the media session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events a client sends to the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Join the room named by `room` (an arbitrary path string).
    JoinCall { room: String },
    /// Forward an opaque signaling payload to the connection named by `to`.
    Signal { to: String, payload: Value },
    /// Send a chat message to the sender's current room.
    ChatMessage {
        payload: String,
        display_name: String,
    },
}

/// Events the relay sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// A connection joined the room. Sent to every member including the
    /// joiner, carrying the full roster so no separate roster query exists.
    UserJoined { id: String, members: Vec<String> },
    /// An opaque signaling payload forwarded from another connection.
    Signal { from: String, payload: Value },
    /// A chat message, broadcast to the whole room including the sender
    /// (the sender's UI shows confirmed delivery, not a local echo). Also
    /// used to replay stored history to a late joiner.
    ChatMessage {
        payload: String,
        display_name: String,
        from: String,
    },
    /// A connection left the room. Sent to the remaining members.
    UserLeft { id: String },
}
