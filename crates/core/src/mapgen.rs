//! Procedural dungeon generation split into grid, layout, corridor and repair stages.

pub mod model;

mod connectivity;
mod corridors;
mod generator;
mod grid;
mod layout;

pub use connectivity::verify_and_repair;
pub use corridors::{
    Connection, DisjointSet, add_extra_connections, carve_l_shaped_corridor, connect_rooms,
    connect_spanning_tree,
};
pub use generator::DungeonGenerator;
pub use grid::{Reachability, TileGrid, TileMetrics};
pub use layout::{Room, RoomPlacement, carve_room, place_rooms};
pub use model::{Dungeon, GenerationReport};

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::rng::SeededRng;

/// Builds a dungeon from a seed with its own ChaCha8 stream.
pub fn generate_dungeon(config: &GenerationConfig, seed: u64) -> Result<Dungeon, GenerationError> {
    DungeonGenerator::new(config.clone()).generate(&mut SeededRng::new(seed))
}
