//! Outbound event delivery implementations.
//!
//! This module provides the concrete [`crate::domain::EventPusher`]
//! implementations. Currently only the WebSocket-backed one exists.

pub mod websocket;

pub use websocket::WebSocketEventPusher;
