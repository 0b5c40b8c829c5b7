use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

/// Tile-space coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
}

/// Pixel-space coordinate, the unit the physics collaborator works in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f32,
    pub y: f32,
}

impl PixelPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: PixelPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn offset_polar(self, angle: f32, distance: f32) -> Self {
        Self { x: self.x + angle.cos() * distance, y: self.y + angle.sin() * distance }
    }
}

/// Pixel-space rectangle, top-left anchored.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PixelRect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> PixelPoint {
        PixelPoint { x: self.x + self.width / 2.0, y: self.y + self.height / 2.0 }
    }

    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Velocity vector in pixels per second handed to the physics collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { x: 0.0, y: 0.0 };

    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_offset_lands_at_requested_distance() {
        let origin = PixelPoint::new(100.0, 100.0);
        let moved = origin.offset_polar(1.1, 250.0);
        assert!((origin.distance_to(moved) - 250.0).abs() < 0.01);
    }

    #[test]
    fn pixel_rect_center_and_containment() {
        let rect = PixelRect { x: 32.0, y: 64.0, width: 192.0, height: 128.0 };
        assert_eq!(rect.center(), PixelPoint::new(128.0, 128.0));
        assert!(rect.contains(PixelPoint::new(32.0, 64.0)));
        assert!(!rect.contains(PixelPoint::new(31.0, 64.0)));
    }
}
