//! Bullet headings for one trigger pull.

use std::f32::consts::PI;

use crate::rng::RandomSource;

/// Arc the spread directions fan across, centred on the aim.
pub const VOLLEY_ARC: f32 = PI / 6.0;
/// Full width of the per-bullet jitter applied when a direction fires several bullets.
pub const VOLLEY_JITTER: f32 = PI / 12.0;

/// Headings in radians, `bullet_count` per direction, directions evenly spaced.
pub fn volley_headings(
    aim: f32,
    bullet_count: u32,
    spread_directions: u32,
    rng: &mut impl RandomSource,
) -> Vec<f32> {
    let directions: Vec<f32> = if spread_directions > 1 {
        let step = VOLLEY_ARC / (spread_directions - 1) as f32;
        let start = aim - VOLLEY_ARC / 2.0;
        (0..spread_directions).map(|i| start + i as f32 * step).collect()
    } else {
        vec![aim]
    };

    let mut headings = Vec::with_capacity(directions.len() * bullet_count as usize);
    for direction in directions {
        for _ in 0..bullet_count {
            let jitter = if bullet_count > 1 {
                (rng.next_float() as f32 - 0.5) * VOLLEY_JITTER
            } else {
                0.0
            };
            headings.push(direction + jitter);
        }
    }
    headings
}
