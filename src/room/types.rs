use serde::{Deserialize, Serialize};

/// Response for one entry of the room list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: i64,
    pub name: String,
    pub member_count: usize,
}
