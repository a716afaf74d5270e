//! Server state shared across handlers.

use std::sync::Arc;

use crate::domain::EventPusher;
use crate::usecase::{
    DisconnectUseCase, ForwardSignalUseCase, GetRoomsUseCase, JoinCallUseCase, SendChatUseCase,
};

/// Shared application state
pub struct AppState {
    /// Pusher handle; the WebSocket handler registers each accepted
    /// connection's outbound channel here (the implicit connect event).
    pub pusher: Arc<dyn EventPusher>,
    pub join_call_usecase: Arc<JoinCallUseCase>,
    pub forward_signal_usecase: Arc<ForwardSignalUseCase>,
    pub send_chat_usecase: Arc<SendChatUseCase>,
    pub disconnect_usecase: Arc<DisconnectUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
}
