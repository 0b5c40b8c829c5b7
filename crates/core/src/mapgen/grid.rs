//! Wall/floor tile grid shared by generation and spatial queries.

use crate::error::GridError;
use crate::types::{PixelPoint, Pos, TileKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    /// A grid filled entirely with walls.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, tiles: vec![TileKind::Wall; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Refill with walls ahead of a new generation pass.
    pub fn reset(&mut self) {
        self.tiles.fill(TileKind::Wall);
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-bounds reads are walls.
    pub fn get(&self, pos: Pos) -> TileKind {
        if !self.in_bounds(pos) {
            return TileKind::Wall;
        }
        self.tiles[self.index(pos)]
    }

    pub fn set(&mut self, pos: Pos, kind: TileKind) -> Result<(), GridError> {
        if !self.in_bounds(pos) {
            return Err(self.out_of_bounds(pos));
        }
        let idx = self.index(pos);
        self.tiles[idx] = kind;
        Ok(())
    }

    /// Fills the inclusive rectangle `from..=to`. Both corners are checked before any
    /// tile changes, so a rejected rectangle leaves the grid untouched.
    pub fn fill_rect(&mut self, from: Pos, to: Pos, kind: TileKind) -> Result<(), GridError> {
        for corner in [from, to] {
            if !self.in_bounds(corner) {
                return Err(self.out_of_bounds(corner));
            }
        }
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for x in from.x.min(to.x)..=from.x.max(to.x) {
                let idx = self.index(Pos { y, x });
                self.tiles[idx] = kind;
            }
        }
        Ok(())
    }

    /// Sets a tile to floor unless it lies on or outside the border ring.
    /// Returns whether the tile was carved.
    pub fn carve_interior(&mut self, pos: Pos) -> bool {
        let inside = pos.x > 0
            && pos.y > 0
            && (pos.x as usize) < self.width.saturating_sub(1)
            && (pos.y as usize) < self.height.saturating_sub(1);
        if inside {
            let idx = self.index(pos);
            self.tiles[idx] = TileKind::Floor;
        }
        inside
    }

    pub fn is_floor(&self, pos: Pos) -> bool {
        self.get(pos) == TileKind::Floor
    }

    pub fn floor_count(&self) -> usize {
        self.tiles.iter().filter(|&&tile| tile == TileKind::Floor).count()
    }

    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Iterates every wall tile, the cells the physics collaborator marks solid.
    pub fn wall_positions(&self) -> impl Iterator<Item = Pos> + '_ {
        self.tiles.iter().enumerate().filter(|(_, tile)| **tile == TileKind::Wall).map(
            |(idx, _)| Pos { y: (idx / self.width) as i32, x: (idx % self.width) as i32 },
        )
    }

    /// Iterative 4-way flood fill over floor tiles.
    pub fn flood_fill(&self, start: Pos) -> Reachability {
        let mut visited = vec![false; self.tiles.len()];
        let mut stack = vec![start];

        while let Some(pos) = stack.pop() {
            if !self.in_bounds(pos) {
                continue;
            }
            let idx = self.index(pos);
            if visited[idx] || self.tiles[idx] != TileKind::Floor {
                continue;
            }
            visited[idx] = true;
            stack.push(Pos { y: pos.y, x: pos.x + 1 });
            stack.push(Pos { y: pos.y, x: pos.x - 1 });
            stack.push(Pos { y: pos.y + 1, x: pos.x });
            stack.push(Pos { y: pos.y - 1, x: pos.x });
        }

        Reachability { width: self.width, height: self.height, visited }
    }

    fn out_of_bounds(&self, pos: Pos) -> GridError {
        GridError::OutOfBounds { x: pos.x, y: pos.y, width: self.width, height: self.height }
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

/// Visited mask produced by [`TileGrid::flood_fill`].
#[derive(Clone, Debug)]
pub struct Reachability {
    width: usize,
    height: usize,
    visited: Vec<bool>,
}

impl Reachability {
    pub fn contains(&self, pos: Pos) -> bool {
        if pos.x < 0 || pos.y < 0 || pos.x as usize >= self.width || pos.y as usize >= self.height
        {
            return false;
        }
        self.visited[(pos.y as usize) * self.width + (pos.x as usize)]
    }

    pub fn len(&self) -> usize {
        self.visited.iter().filter(|&&seen| seen).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.visited.iter().any(|&seen| seen)
    }
}

/// Converts between tile and pixel space for a fixed square tile size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileMetrics {
    pub tile_size: u32,
}

impl TileMetrics {
    pub fn pixel_to_tile(self, point: PixelPoint) -> Pos {
        let size = self.tile_size as f32;
        Pos { y: (point.y / size).floor() as i32, x: (point.x / size).floor() as i32 }
    }

    pub fn tile_center(self, pos: Pos) -> PixelPoint {
        let size = self.tile_size as f32;
        PixelPoint { x: (pos.x as f32 + 0.5) * size, y: (pos.y as f32 + 0.5) * size }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_reads_are_walls() {
        let mut grid = TileGrid::new(4, 3);
        grid.set(Pos { y: 0, x: 0 }, TileKind::Floor).unwrap();
        assert_eq!(grid.get(Pos { y: 0, x: 0 }), TileKind::Floor);
        assert_eq!(grid.get(Pos { y: -1, x: 0 }), TileKind::Wall);
        assert_eq!(grid.get(Pos { y: 0, x: 4 }), TileKind::Wall);
        assert_eq!(grid.get(Pos { y: 3, x: 0 }), TileKind::Wall);
    }

    #[test]
    fn out_of_bounds_writes_fail_without_touching_grid() {
        let mut grid = TileGrid::new(4, 3);
        let err = grid.set(Pos { y: 5, x: 1 }, TileKind::Floor).unwrap_err();
        assert_eq!(err, GridError::OutOfBounds { x: 1, y: 5, width: 4, height: 3 });
        assert_eq!(grid.floor_count(), 0);
    }

    #[test]
    fn rect_fill_rejects_overhang_before_writing() {
        let mut grid = TileGrid::new(10, 10);
        let err = grid
            .fill_rect(Pos { y: 6, x: 6 }, Pos { y: 12, x: 12 }, TileKind::Floor)
            .unwrap_err();
        assert_eq!(err, GridError::OutOfBounds { x: 12, y: 12, width: 10, height: 10 });
        assert_eq!(grid.floor_count(), 0);

        grid.fill_rect(Pos { y: 2, x: 3 }, Pos { y: 4, x: 6 }, TileKind::Floor).unwrap();
        assert_eq!(grid.floor_count(), 12);
    }

    #[test]
    fn interior_carving_leaves_the_border_ring() {
        let mut grid = TileGrid::new(5, 5);
        assert!(!grid.carve_interior(Pos { y: 0, x: 2 }));
        assert!(!grid.carve_interior(Pos { y: 2, x: 4 }));
        assert!(!grid.carve_interior(Pos { y: -3, x: 9 }));
        assert!(grid.carve_interior(Pos { y: 3, x: 3 }));
        assert_eq!(grid.floor_count(), 1);
    }

    #[test]
    fn reset_restores_solid_walls() {
        let mut grid = TileGrid::new(5, 5);
        grid.set(Pos { y: 2, x: 2 }, TileKind::Floor).unwrap();
        grid.reset();
        assert_eq!(grid.floor_count(), 0);
        assert_eq!(grid.wall_positions().count(), 25);
    }

    #[test]
    fn flood_fill_stops_at_walls_and_ignores_diagonals() {
        let mut grid = TileGrid::new(6, 6);
        for x in 1..=2 {
            grid.set(Pos { y: 1, x }, TileKind::Floor).unwrap();
        }
        // Diagonal neighbour only: must stay unreached.
        grid.set(Pos { y: 2, x: 3 }, TileKind::Floor).unwrap();

        let reach = grid.flood_fill(Pos { y: 1, x: 1 });
        assert!(reach.contains(Pos { y: 1, x: 2 }));
        assert!(!reach.contains(Pos { y: 2, x: 3 }));
        assert_eq!(reach.len(), 2);
    }

    #[test]
    fn flood_fill_from_wall_reaches_nothing() {
        let grid = TileGrid::new(3, 3);
        assert!(grid.flood_fill(Pos { y: 1, x: 1 }).is_empty());
    }

    #[test]
    fn pixel_tile_conversion_floors_coordinates() {
        let metrics = TileMetrics { tile_size: 32 };
        assert_eq!(metrics.pixel_to_tile(PixelPoint::new(63.9, 32.0)), Pos { y: 1, x: 1 });
        assert_eq!(metrics.tile_center(Pos { y: 1, x: 2 }), PixelPoint::new(80.0, 48.0));
    }
}
