//! Data Transfer Objects (DTOs) for the signaling relay.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket event DTOs (the signaling wire protocol)
//! - `http`: HTTP API response DTOs

pub mod http;
pub mod websocket;
