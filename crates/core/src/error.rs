use thiserror::Error;

use crate::types::Pos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: usize, height: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("room size range {min}..={max} is empty or zero")]
    RoomSizeRange { min: usize, max: usize },
    #[error("{width}x{height} grid cannot hold a {room_size}-tile room inside its border")]
    GridTooSmall { width: usize, height: usize, room_size: usize },
    #[error("`{field}` must be greater than zero")]
    Zero { field: &'static str },
    #[error("`{field}` thresholds must be strictly ascending")]
    UnsortedThresholds { field: &'static str },
    #[error("enemy tier table is empty")]
    NoTiers,
    #[error("the first enemy tier must unlock at score 0, found {unlock_score}")]
    FirstTierLocked { unlock_score: u32 },
    #[error("spawn range `{field}` has min above max")]
    InvertedRange { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Flood fill from the start room reached no room at all, so there is nothing to
    /// repair against. Only possible when the grid was corrupted upstream.
    #[error("room {room_index} cannot be joined: start room centre {start:?} is not floor")]
    StartRoomUnreachable { room_index: usize, start: Pos },
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Error)]
pub enum ScoreTableError {
    #[error("score data is not a JSON array of score entries: {0}")]
    Malformed(#[from] serde_json::Error),
}
