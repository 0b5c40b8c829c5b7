//! Corridor carving: union-find spanning connection plus random loop edges.

use crate::rng::RandomSource;
use crate::types::Pos;

use super::grid::TileGrid;
use super::layout::Room;

/// Disjoint-set forest with path compression, indexed by room.
#[derive(Clone, Debug)]
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        Self { parent: (0..len).collect() }
    }

    pub fn find(&mut self, node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut cursor = node;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    /// Returns true when the two nodes were in different sets.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        self.parent[root_a] = root_b;
        true
    }
}

/// Room index pair a corridor was carved between.
pub type Connection = (usize, usize);

/// Joins every room with the fewest corridors by merging nearest pairs first.
pub fn connect_spanning_tree(
    grid: &mut TileGrid,
    rng: &mut impl RandomSource,
    rooms: &[Room],
    corridor_width: usize,
) -> Vec<Connection> {
    if rooms.len() < 2 {
        return Vec::new();
    }

    let mut edges = Vec::with_capacity(rooms.len() * (rooms.len() - 1) / 2);
    for i in 0..rooms.len() {
        for j in (i + 1)..rooms.len() {
            edges.push((rooms[i].center_distance(rooms[j]), i, j));
        }
    }
    edges.sort_by(|left, right| left.0.total_cmp(&right.0));

    let mut components = DisjointSet::new(rooms.len());
    let mut connections = Vec::with_capacity(rooms.len() - 1);
    for (_, i, j) in edges {
        if components.union(i, j) {
            connect_rooms(grid, rng, rooms[i], rooms[j], corridor_width);
            connections.push((i, j));
        }
    }
    connections
}

/// Adds `rooms / divisor` random corridors for loops; same-room picks are skipped.
pub fn add_extra_connections(
    grid: &mut TileGrid,
    rng: &mut impl RandomSource,
    rooms: &[Room],
    corridor_width: usize,
    divisor: usize,
) -> Vec<Connection> {
    let extra = rooms.len() / divisor.max(1);
    let mut connections = Vec::new();
    for _ in 0..extra {
        let a = rng.pick_index(rooms.len());
        let b = rng.pick_index(rooms.len());
        if a == b {
            continue;
        }
        connect_rooms(grid, rng, rooms[a], rooms[b], corridor_width);
        connections.push((a, b));
    }
    connections
}

/// Carves an L-shaped corridor between room centres with a random leg order.
pub fn connect_rooms(
    grid: &mut TileGrid,
    rng: &mut impl RandomSource,
    from: Room,
    to: Room,
    corridor_width: usize,
) {
    let horizontal_first = rng.coin_flip();
    carve_l_shaped_corridor(grid, from.center(), to.center(), horizontal_first, corridor_width);
}

pub fn carve_l_shaped_corridor(
    grid: &mut TileGrid,
    start: Pos,
    end: Pos,
    horizontal_first: bool,
    corridor_width: usize,
) {
    if horizontal_first {
        carve_horizontal_band(grid, start.y, start.x, end.x, corridor_width);
        carve_vertical_band(grid, end.x, start.y, end.y, corridor_width);
    } else {
        carve_vertical_band(grid, start.x, start.y, end.y, corridor_width);
        carve_horizontal_band(grid, end.y, start.x, end.x, corridor_width);
    }
}

fn carve_horizontal_band(grid: &mut TileGrid, y: i32, x1: i32, x2: i32, corridor_width: usize) {
    let (before, after) = band_offsets(corridor_width);
    for row in (y - before)..=(y + after) {
        for x in x1.min(x2)..=x1.max(x2) {
            grid.carve_interior(Pos { y: row, x });
        }
    }
}

fn carve_vertical_band(grid: &mut TileGrid, x: i32, y1: i32, y2: i32, corridor_width: usize) {
    let (before, after) = band_offsets(corridor_width);
    for column in (x - before)..=(x + after) {
        for y in y1.min(y2)..=y1.max(y2) {
            grid.carve_interior(Pos { y, x: column });
        }
    }
}

/// Splits a band width around its centre line; even widths lean right/down.
fn band_offsets(corridor_width: usize) -> (i32, i32) {
    let width = corridor_width.max(1) as i32;
    ((width - 1) / 2, width / 2)
}
