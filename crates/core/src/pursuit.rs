//! Chase steering for enemies near the player.

use crate::types::{PixelPoint, Velocity};

/// Straight-line velocity toward `player` at `speed` while strictly inside `radius`,
/// zero otherwise.
pub fn pursuit_velocity(enemy: PixelPoint, player: PixelPoint, speed: f32, radius: f32) -> Velocity {
    let distance = enemy.distance_to(player);
    if distance >= radius || distance <= f32::EPSILON {
        return Velocity::ZERO;
    }
    Velocity {
        x: (player.x - enemy.x) / distance * speed,
        y: (player.y - enemy.y) / distance * speed,
    }
}
