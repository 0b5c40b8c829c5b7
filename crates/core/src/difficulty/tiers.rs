//! Enemy power classes and the weighted tier draw.

use serde::{Deserialize, Serialize};

use crate::rng::RandomSource;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyTier {
    pub name: String,
    pub hp: u32,
    pub speed_multiplier: f32,
    pub size_multiplier: f32,
    pub score_value: u32,
    pub base_weight: f64,
    /// Weight change per difficulty level gained since the tier unlocked.
    pub weight_drift: f64,
    pub min_weight: f64,
    pub unlock_score: u32,
}

impl EnemyTier {
    #[allow(clippy::too_many_arguments)]
    fn new(
        name: &str,
        hp: u32,
        speed_multiplier: f32,
        size_multiplier: f32,
        score_value: u32,
        base_weight: f64,
        weight_drift: f64,
        min_weight: f64,
        unlock_score: u32,
    ) -> Self {
        Self {
            name: name.to_owned(),
            hp,
            speed_multiplier,
            size_multiplier,
            score_value,
            base_weight,
            weight_drift,
            min_weight,
            unlock_score,
        }
    }

    /// Shipped tier table, weakest first.
    pub fn default_table() -> Vec<Self> {
        vec![
            Self::new("Whelp", 1, 1.0, 1.0, 10, 100.0, -10.0, 30.0, 0),
            Self::new("Drake", 2, 1.2, 1.1, 20, 30.0, 5.0, 30.0, 100),
            Self::new("Wyrm", 4, 0.85, 1.4, 40, 15.0, 5.0, 15.0, 400),
            Self::new("Elder Wyrm", 7, 1.1, 1.6, 80, 5.0, 5.0, 5.0, 800),
        ]
    }

    pub fn weight_after(&self, levels_since_unlock: u32) -> f64 {
        (self.base_weight + self.weight_drift * f64::from(levels_since_unlock)).max(self.min_weight)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierWeight {
    /// Index into the tier table.
    pub tier: usize,
    pub weight: f64,
}

/// Unlocked tiers with their current weights, in table order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TierDistribution {
    pub(super) entries: Vec<TierWeight>,
}

impl TierDistribution {
    pub fn entries(&self) -> &[TierWeight] {
        &self.entries
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    pub fn probability(&self, tier: usize) -> f64 {
        let total = self.total_weight();
        if total <= 0.0 {
            return 0.0;
        }
        self.entries.iter().find(|entry| entry.tier == tier).map_or(0.0, |entry| entry.weight / total)
    }

    /// Draws a tier index. An empty distribution yields tier 0.
    pub fn pick(&self, rng: &mut impl RandomSource) -> usize {
        let mut remaining = rng.next_float() * self.total_weight();
        for entry in &self.entries {
            remaining -= entry.weight;
            if remaining <= 0.0 {
                return entry.tier;
            }
        }
        self.entries.last().map_or(0, |entry| entry.tier)
    }
}
