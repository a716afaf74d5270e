//! UseCase layer: one use case per signaling event.
//!
//! Use cases own the registry and pusher handles and hold the event-handling
//! logic; serialization of outbound events stays in the UI layer, which
//! passes pre-built JSON into the broadcast helpers.

mod disconnect;
mod error;
mod forward_signal;
mod get_rooms;
mod join_call;
mod send_chat;

pub use disconnect::DisconnectUseCase;
pub use error::JoinError;
pub use forward_signal::ForwardSignalUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use join_call::JoinCallUseCase;
pub use send_chat::{ChatBroadcast, SendChatUseCase};
