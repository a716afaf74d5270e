//! UseCase: room listing for the observability API.

use std::sync::Arc;

use crate::domain::{RoomRegistry, RoomSummary};

pub struct GetRoomsUseCase {
    registry: Arc<dyn RoomRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(registry: Arc<dyn RoomRegistry>) -> Self {
        Self { registry }
    }

    /// Summaries of all live rooms, sorted by key for consistent output.
    pub async fn execute(&self) -> Vec<RoomSummary> {
        let mut rooms = self.registry.rooms().await;
        rooms.sort_by(|a, b| a.key.as_str().cmp(b.key.as_str()));
        rooms
    }
}
