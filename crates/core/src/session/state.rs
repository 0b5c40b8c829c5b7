use crate::types::{EnemyId, PixelPoint};
use crate::upgrades::UpgradeProgress;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub center: PixelPoint,
    /// Centroid on the previous tick, the reference for heading-biased spawns.
    pub last_center: PixelPoint,
    pub hp: u32,
    pub max_hp: u32,
    pub speed: f32,
    pub alive: bool,
}

/// Gameplay record for one enemy body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyState {
    /// Index into the difficulty tier table.
    pub tier: usize,
    pub hp: u32,
    pub max_hp: u32,
    pub score_value: u32,
    pub speed_multiplier: f32,
    pub size_multiplier: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    /// Last body centre reported by the physics side.
    pub center: PixelPoint,
    pub state: EnemyState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct PendingRespawn {
    pub due_ms: u64,
    pub count: u32,
}

/// Everything the HUD shows, read from one place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    pub score: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub level: u32,
    pub live_enemies: u32,
    pub target_enemy_count: u32,
    pub respawn_delay_ms: u32,
    pub upgrade: UpgradeProgress,
}
