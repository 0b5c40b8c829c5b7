//! Generated dungeon and the bookkeeping of how it was built.

use xxhash_rust::xxh3::xxh3_64;

use crate::types::{PixelPoint, PixelRect, Pos, TileKind};

use super::corridors::Connection;
use super::grid::{TileGrid, TileMetrics};
use super::layout::Room;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub placement_attempts: usize,
    pub spanning_connections: Vec<Connection>,
    pub extra_connections: Vec<Connection>,
    pub repairs: Vec<Connection>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dungeon {
    pub(super) grid: TileGrid,
    pub(super) rooms: Vec<Room>,
    pub(super) tile_size: u32,
    pub(super) report: GenerationReport,
}

impl Dungeon {
    /// Wraps an already carved grid, e.g. a hand-built test arena. No connectivity
    /// check is made.
    pub fn from_parts(grid: TileGrid, rooms: Vec<Room>, tile_size: u32) -> Self {
        Self { grid, rooms, tile_size, report: GenerationReport::default() }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Rooms in placement order; index 0 is the start room.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn metrics(&self) -> TileMetrics {
        TileMetrics { tile_size: self.tile_size }
    }

    pub fn report(&self) -> &GenerationReport {
        &self.report
    }

    pub fn pixel_width(&self) -> f32 {
        (self.grid.width() as u32 * self.tile_size) as f32
    }

    pub fn pixel_height(&self) -> f32 {
        (self.grid.height() as u32 * self.tile_size) as f32
    }

    pub fn room_rect(&self, index: usize) -> Option<PixelRect> {
        self.rooms.get(index).map(|room| room.pixel_rect(self.tile_size))
    }

    /// Centre of the start room, or of the map when no room could be placed.
    pub fn player_spawn_point(&self) -> PixelPoint {
        match self.room_rect(0) {
            Some(rect) => rect.center(),
            None => PixelPoint::new(self.pixel_width() / 2.0, self.pixel_height() / 2.0),
        }
    }

    pub fn tile_at_pixel(&self, point: PixelPoint) -> TileKind {
        if point.x < 0.0 || point.y < 0.0 {
            return TileKind::Wall;
        }
        self.grid.get(self.metrics().pixel_to_tile(point))
    }

    /// Wall tiles to be registered as solid collision bodies.
    pub fn solid_tiles(&self) -> impl Iterator<Item = Pos> + '_ {
        self.grid.wall_positions()
    }

    /// True when every room centre is reachable from the start room.
    pub fn rooms_connected(&self) -> bool {
        let Some(start) = self.rooms.first() else {
            return true;
        };
        let reach = self.grid.flood_fill(start.center());
        self.rooms.iter().all(|room| reach.contains(room.center()))
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.grid.tiles().len() + self.rooms.len() * 16 + 12);
        bytes.extend((self.grid.width() as u32).to_le_bytes());
        bytes.extend((self.grid.height() as u32).to_le_bytes());
        bytes.extend(self.tile_size.to_le_bytes());
        for tile in self.grid.tiles() {
            bytes.push(match tile {
                TileKind::Wall => 0,
                TileKind::Floor => 1,
            });
        }
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.x, room.y, room.width, room.height] {
                bytes.extend((value as u32).to_le_bytes());
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// One character per tile: `#` wall, `.` floor, `@` start room centre, digits
    /// for the centres of the next nine rooms.
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity((self.grid.width() + 1) * self.grid.height());
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                let pos = Pos { y: y as i32, x: x as i32 };
                let marker = self.rooms.iter().position(|room| room.center() == pos);
                out.push(match (marker, self.grid.get(pos)) {
                    (Some(0), _) => '@',
                    (Some(index @ 1..=9), _) => char::from(b'0' + index as u8),
                    (_, TileKind::Floor) => '.',
                    (_, TileKind::Wall) => '#',
                });
            }
            out.push('\n');
        }
        out
    }
}
