//! Room rectangles and rejection-sampled room placement.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::error::GridError;
use crate::rng::RandomSource;
use crate::types::{PixelRect, Pos, TileKind};

use super::grid::TileGrid;

/// Axis-aligned room in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.y + self.height / 2) as i32, x: (self.x + self.width / 2) as i32 }
    }

    pub fn expanded(self, margin: usize) -> Self {
        let expanded_x = self.x.saturating_sub(margin);
        let expanded_y = self.y.saturating_sub(margin);
        let expanded_right = self.right().saturating_add(margin);
        let expanded_bottom = self.bottom().saturating_add(margin);
        Self {
            x: expanded_x,
            y: expanded_y,
            width: expanded_right - expanded_x + 1,
            height: expanded_bottom - expanded_y + 1,
        }
    }

    pub fn intersects(self, other: &Self) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub fn pixel_rect(self, tile_size: u32) -> PixelRect {
        let size = tile_size as f32;
        PixelRect {
            x: self.x as f32 * size,
            y: self.y as f32 * size,
            width: self.width as f32 * size,
            height: self.height as f32 * size,
        }
    }

    /// Euclidean distance between centre tiles.
    pub fn center_distance(self, other: Room) -> f64 {
        let a = self.center();
        let b = other.center();
        let dx = f64::from(a.x - b.x);
        let dy = f64::from(a.y - b.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomPlacement {
    pub max_attempts: usize,
    pub min_size: usize,
    pub max_size: usize,
    pub gap: usize,
}

impl From<&GenerationConfig> for RoomPlacement {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            max_attempts: config.max_rooms,
            min_size: config.min_room_size,
            max_size: config.max_room_size,
            gap: config.room_gap,
        }
    }
}

/// Scatters rooms by rejection sampling and carves each accepted one.
///
/// A rejected attempt is simply spent; the result may hold anywhere from zero to
/// `max_attempts` rooms, in acceptance order.
pub fn place_rooms(
    grid: &mut TileGrid,
    rng: &mut impl RandomSource,
    placement: RoomPlacement,
) -> Result<Vec<Room>, GridError> {
    let mut rooms: Vec<Room> = Vec::new();
    let min_size = placement.min_size as i32;
    let max_size = placement.max_size as i32;

    for _ in 0..placement.max_attempts {
        let room_width = rng.next_int(min_size, max_size) as usize;
        let room_height = rng.next_int(min_size, max_size) as usize;
        if room_width + 2 > grid.width() || room_height + 2 > grid.height() {
            continue;
        }

        let max_x = (grid.width() - room_width - 1) as i32;
        let max_y = (grid.height() - room_height - 1) as i32;
        let x = rng.next_int(1, max_x) as usize;
        let y = rng.next_int(1, max_y) as usize;
        let candidate = Room { x, y, width: room_width, height: room_height };

        if rooms.iter().any(|existing| existing.expanded(placement.gap).intersects(&candidate)) {
            continue;
        }
        carve_room(grid, &candidate)?;
        rooms.push(candidate);
    }

    Ok(rooms)
}

/// Carves a room to floor. A room that overhangs the grid is rejected whole.
pub fn carve_room(grid: &mut TileGrid, room: &Room) -> Result<(), GridError> {
    let top_left = Pos { y: room.y as i32, x: room.x as i32 };
    let bottom_right = Pos { y: room.bottom() as i32, x: room.right() as i32 };
    grid.fill_rect(top_left, bottom_right, TileKind::Floor)
}
