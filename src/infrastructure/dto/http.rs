//! HTTP API response DTOs.

use serde::Serialize;

/// Summary of a live room for `GET /api/rooms`.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummaryDto {
    pub key: String,
    pub members: Vec<String>,
    pub message_count: usize,
}
