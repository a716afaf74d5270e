//! WebRTC signaling relay library.
//!
//! This library provides a room-scoped signaling server: browser clients join
//! a room, exchange opaque WebRTC negotiation payloads point-to-point, and
//! share a text chat whose history is replayed to late joiners.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// shared library
pub mod common;
