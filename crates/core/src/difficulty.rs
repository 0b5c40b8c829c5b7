//! Score-driven pressure curve: population, respawn pacing, level and tier mix.
//!
//! Every query is a pure function of the score. UI code reads these values instead
//! of keeping its own threshold tables.

mod tiers;

pub use tiers::{EnemyTier, TierDistribution, TierWeight};

use serde::Serialize;

use crate::config::DifficultyConfig;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DifficultySnapshot {
    pub score: u32,
    pub level: u32,
    pub target_enemy_count: u32,
    pub respawn_delay_ms: u32,
    pub respawn_batch_size: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct DifficultyModel<'a> {
    config: &'a DifficultyConfig,
}

impl<'a> DifficultyModel<'a> {
    pub fn new(config: &'a DifficultyConfig) -> Self {
        Self { config }
    }

    pub fn target_enemy_count(&self, score: u32) -> u32 {
        let bonus: u32 = self
            .config
            .population_steps
            .iter()
            .filter(|step| score >= step.score)
            .map(|step| step.amount)
            .sum();
        (self.config.base_enemy_count + bonus).min(self.config.max_enemy_count)
    }

    pub fn respawn_delay_ms(&self, score: u32) -> u32 {
        let steps = u64::from(score / self.config.respawn_delay_step_score.max(1));
        let reduction = steps * u64::from(self.config.respawn_delay_step_ms);
        let delay = u64::from(self.config.respawn_delay_base_ms).saturating_sub(reduction);
        delay.max(u64::from(self.config.min_respawn_delay_ms)) as u32
    }

    pub fn respawn_batch_size(&self, score: u32) -> u32 {
        self.config
            .batch_steps
            .iter()
            .rev()
            .find(|step| score >= step.score)
            .map_or(self.config.base_batch_size, |step| step.amount)
    }

    /// Starts at 1 and gains one per threshold reached.
    pub fn difficulty_level(&self, score: u32) -> u32 {
        1 + self.config.level_thresholds.iter().filter(|&&threshold| score >= threshold).count()
            as u32
    }

    pub fn tiers(&self) -> &'a [EnemyTier] {
        &self.config.tiers
    }

    pub fn tier(&self, index: usize) -> Option<&'a EnemyTier> {
        self.config.tiers.get(index)
    }

    pub fn tier_distribution(&self, score: u32) -> TierDistribution {
        let level = self.difficulty_level(score);
        let entries = self
            .config
            .tiers
            .iter()
            .enumerate()
            .filter(|(_, tier)| tier.unlock_score <= score)
            .map(|(index, tier)| {
                let since_unlock = level.saturating_sub(self.difficulty_level(tier.unlock_score));
                TierWeight { tier: index, weight: tier.weight_after(since_unlock) }
            })
            .collect();
        TierDistribution { entries }
    }

    pub fn snapshot(&self, score: u32) -> DifficultySnapshot {
        DifficultySnapshot {
            score,
            level: self.difficulty_level(score),
            target_enemy_count: self.target_enemy_count(score),
            respawn_delay_ms: self.respawn_delay_ms(score),
            respawn_batch_size: self.respawn_batch_size(score),
        }
    }
}
