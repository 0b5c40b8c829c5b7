//! Flood-fill reachability check from the start room with forced corridor repair.

use crate::error::GenerationError;
use crate::rng::RandomSource;

use super::corridors::{Connection, connect_rooms};
use super::grid::TileGrid;
use super::layout::Room;

/// Verifies that every room centre is reachable from `rooms[0]` and patches any that
/// are not with a corridor to the nearest reached room.
///
/// The flood fill is not repeated after repairs: each patched room joins a room that
/// was already in the start component, which is enough to connect it.
pub fn verify_and_repair(
    grid: &mut TileGrid,
    rng: &mut impl RandomSource,
    rooms: &[Room],
    corridor_width: usize,
) -> Result<Vec<Connection>, GenerationError> {
    let Some(start_room) = rooms.first() else {
        return Ok(Vec::new());
    };
    let reach = grid.flood_fill(start_room.center());

    let mut repairs = Vec::new();
    for (index, room) in rooms.iter().enumerate().skip(1) {
        if reach.contains(room.center()) {
            continue;
        }

        let nearest = rooms
            .iter()
            .enumerate()
            .filter(|(other, candidate)| *other != index && reach.contains(candidate.center()))
            .min_by(|(_, a), (_, b)| room.center_distance(**a).total_cmp(&room.center_distance(**b)))
            .map(|(other, _)| other);

        let Some(target) = nearest else {
            return Err(GenerationError::StartRoomUnreachable {
                room_index: index,
                start: start_room.center(),
            });
        };

        log::warn!("room {index} was cut off from the start room; carving repair to room {target}");
        connect_rooms(grid, rng, *room, rooms[target], corridor_width);
        repairs.push((index, target));
    }

    Ok(repairs)
}
