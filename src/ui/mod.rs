//! UI layer: the axum server, WebSocket/HTTP handlers, and shared state.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
