//! Tuning knobs for every subsystem. Defaults reproduce the shipped game balance.

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::difficulty::EnemyTier;
use crate::error::ConfigError;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    pub generation: GenerationConfig,
    pub difficulty: DifficultyConfig,
    pub spawn: SpawnConfig,
    pub upgrades: UpgradeConfig,
    pub session: SessionConfig,
}

impl TuningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.difficulty.validate()?;
        self.spawn.validate()?;
        self.upgrades.validate()?;
        self.session.validate()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub tile_size: u32,
    /// Placement attempts, not a guaranteed room count.
    pub max_rooms: usize,
    pub min_room_size: usize,
    pub max_room_size: usize,
    /// Tiles of clearance enforced between accepted rooms.
    pub room_gap: usize,
    pub corridor_width: usize,
    /// One extra loop corridor per this many rooms.
    pub extra_connection_divisor: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            grid_width: 50,
            grid_height: 50,
            tile_size: 32,
            max_rooms: 15,
            min_room_size: 6,
            max_room_size: 12,
            room_gap: 2,
            corridor_width: 3,
            extra_connection_divisor: 3,
        }
    }
}

impl GenerationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_room_size == 0 || self.min_room_size > self.max_room_size {
            return Err(ConfigError::RoomSizeRange {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        if self.max_room_size + 2 > self.grid_width || self.max_room_size + 2 > self.grid_height {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                room_size: self.max_room_size,
            });
        }
        if self.tile_size == 0 {
            return Err(ConfigError::Zero { field: "tile_size" });
        }
        if self.corridor_width == 0 {
            return Err(ConfigError::Zero { field: "corridor_width" });
        }
        if self.extra_connection_divisor == 0 {
            return Err(ConfigError::Zero { field: "extra_connection_divisor" });
        }
        Ok(())
    }
}

/// A score threshold paired with the value it contributes once reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreStep {
    pub score: u32,
    pub amount: u32,
}

const fn step(score: u32, amount: u32) -> ScoreStep {
    ScoreStep { score, amount }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub base_enemy_count: u32,
    pub max_enemy_count: u32,
    /// Cumulative population increments.
    pub population_steps: Vec<ScoreStep>,
    pub respawn_delay_base_ms: u32,
    pub respawn_delay_step_ms: u32,
    pub respawn_delay_step_score: u32,
    pub min_respawn_delay_ms: u32,
    pub base_batch_size: u32,
    /// Batch size replaced (not added) by the highest reached step.
    pub batch_steps: Vec<ScoreStep>,
    pub level_thresholds: Vec<u32>,
    pub tiers: Vec<EnemyTier>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            base_enemy_count: 3,
            max_enemy_count: 20,
            population_steps: vec![
                step(50, 2),
                step(100, 2),
                step(200, 3),
                step(400, 3),
                step(800, 4),
                step(1600, 3),
            ],
            respawn_delay_base_ms: 3000,
            respawn_delay_step_ms: 200,
            respawn_delay_step_score: 100,
            min_respawn_delay_ms: 500,
            base_batch_size: 1,
            batch_steps: vec![step(400, 2), step(800, 3)],
            level_thresholds: vec![50, 100, 200, 400, 800, 1600],
            tiers: EnemyTier::default_table(),
        }
    }
}

impl DifficultyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_ascending("population_steps", self.population_steps.iter().map(|s| s.score))?;
        ensure_ascending("batch_steps", self.batch_steps.iter().map(|s| s.score))?;
        ensure_ascending("level_thresholds", self.level_thresholds.iter().copied())?;
        ensure_ascending("tiers.unlock_score", self.tiers.iter().map(|t| t.unlock_score))?;
        if self.respawn_delay_step_score == 0 {
            return Err(ConfigError::Zero { field: "respawn_delay_step_score" });
        }
        let Some(first) = self.tiers.first() else {
            return Err(ConfigError::NoTiers);
        };
        if first.unlock_score != 0 {
            return Err(ConfigError::FirstTierLocked { unlock_score: first.unlock_score });
        }
        Ok(())
    }
}

fn ensure_ascending(
    field: &'static str,
    values: impl Iterator<Item = u32>,
) -> Result<(), ConfigError> {
    let mut previous = None;
    for value in values {
        if previous.is_some_and(|prev| value <= prev) {
            return Err(ConfigError::UnsortedThresholds { field });
        }
        previous = Some(value);
    }
    Ok(())
}

/// Distance band, in pixels, that new enemies are placed in around the player.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub min_spawn_distance: f32,
    pub enemy_separation: f32,
    pub spawn_attempts: u32,
    pub directional_attempts: u32,
    /// Half-angle of the cone around the movement heading.
    pub directional_cone: f32,
    pub movement_threshold: f32,
    pub density_radius: f32,
    pub sparse_below: usize,
    pub crowded_above: usize,
    pub sparse_range: SpawnRange,
    pub default_range: SpawnRange,
    pub crowded_range: SpawnRange,
    pub late_game_score: u32,
    pub late_game_min_reduction: f32,
    pub late_game_min_floor: f32,
    pub bounds_margin_tiles: u32,
    pub fallback_attempts: u32,
    pub fallback_room_inset: i32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_spawn_distance: 250.0,
            enemy_separation: 100.0,
            spawn_attempts: 20,
            directional_attempts: 5,
            directional_cone: FRAC_PI_4,
            movement_threshold: 20.0,
            density_radius: 400.0,
            sparse_below: 2,
            crowded_above: 5,
            sparse_range: SpawnRange::new(200.0, 400.0),
            default_range: SpawnRange::new(250.0, 600.0),
            crowded_range: SpawnRange::new(300.0, 800.0),
            late_game_score: 400,
            late_game_min_reduction: 30.0,
            late_game_min_floor: 200.0,
            bounds_margin_tiles: 1,
            fallback_attempts: 10,
            fallback_room_inset: 16,
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, range) in [
            ("sparse_range", self.sparse_range),
            ("default_range", self.default_range),
            ("crowded_range", self.crowded_range),
        ] {
            if range.min > range.max {
                return Err(ConfigError::InvertedRange { field });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    pub base_interval: u32,
    pub interval_increase: u32,
    pub curve_exponent: f64,
    pub curve_scale: f64,
    pub options_per_offer: usize,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            base_interval: 100,
            interval_increase: 50,
            curve_exponent: 1.3,
            curve_scale: 30.0,
            options_per_offer: 3,
        }
    }
}

impl UpgradeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_interval == 0 {
            return Err(ConfigError::Zero { field: "base_interval" });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub enemy_check_interval_ms: u64,
    pub base_enemy_speed: f32,
    pub pursuit_radius: f32,
    pub player_base_hp: u32,
    pub player_base_speed: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enemy_check_interval_ms: 5000,
            base_enemy_speed: 100.0,
            pursuit_radius: 300.0,
            player_base_hp: 3,
            player_base_speed: 200.0,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enemy_check_interval_ms == 0 {
            return Err(ConfigError::Zero { field: "enemy_check_interval_ms" });
        }
        Ok(())
    }
}
