//! Score-gated upgrade track: escalating thresholds, random offers and stat levels.

mod volley;

pub use volley::{VOLLEY_ARC, VOLLEY_JITTER, volley_headings};

use serde::{Deserialize, Serialize};

use crate::config::UpgradeConfig;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    BulletCount,
    BulletSpread,
    HpBoost,
    SpeedBoost,
}

impl UpgradeKind {
    pub const ALL: [Self; 4] = [Self::BulletCount, Self::BulletSpread, Self::HpBoost, Self::SpeedBoost];

    pub fn spec(self) -> UpgradeSpec {
        match self {
            Self::BulletCount => UpgradeSpec {
                name: "Multi Shot",
                description: "Fire more bullets per direction",
                max_level: 5,
                base_value: 1,
                increment: 1,
            },
            Self::BulletSpread => UpgradeSpec {
                name: "Spread Shot",
                description: "Fire in more directions",
                max_level: 4,
                base_value: 1,
                increment: 2,
            },
            Self::HpBoost => UpgradeSpec {
                name: "Vitality",
                description: "Raise maximum health",
                max_level: 5,
                base_value: 3,
                increment: 1,
            },
            Self::SpeedBoost => UpgradeSpec {
                name: "Swiftness",
                description: "Move faster",
                max_level: 5,
                base_value: 200,
                increment: 50,
            },
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::BulletCount => 0,
            Self::BulletSpread => 1,
            Self::HpBoost => 2,
            Self::SpeedBoost => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpgradeSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub max_level: u32,
    pub base_value: u32,
    pub increment: u32,
}

impl UpgradeSpec {
    /// Spread starts at one direction and then adds `increment` per level: 1, 3, 5...
    pub fn value_at(&self, kind: UpgradeKind, level: u32) -> u32 {
        match kind {
            UpgradeKind::BulletSpread if level == 0 => 1,
            UpgradeKind::BulletSpread => 1 + level * self.increment,
            _ => self.base_value + level * self.increment,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpgradeInfo {
    pub kind: UpgradeKind,
    pub name: &'static str,
    pub description: &'static str,
    pub level: u32,
    pub max_level: u32,
    pub current_value: u32,
    /// `None` once maxed.
    pub next_value: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct UpgradeProgress {
    pub ready: bool,
    pub current: u32,
    pub target: u32,
    /// Fraction of the way from the previous threshold to `target`, in `[0, 1]`.
    pub progress: f64,
    pub points_needed: u32,
}

#[derive(Clone, Debug)]
pub struct UpgradeTracker {
    config: UpgradeConfig,
    levels: [u32; 4],
    upgrade_count: u32,
    next_threshold: u32,
    previous_threshold: u32,
}

impl UpgradeTracker {
    pub fn new(config: UpgradeConfig) -> Self {
        let next_threshold = config.base_interval;
        Self { config, levels: [0; 4], upgrade_count: 0, next_threshold, previous_threshold: 0 }
    }

    pub fn next_threshold(&self) -> u32 {
        self.next_threshold
    }

    pub fn upgrade_count(&self) -> u32 {
        self.upgrade_count
    }

    /// Fires at most once per call, then moves the threshold further out.
    pub fn check(&mut self, score: u32) -> bool {
        if score < self.next_threshold {
            return false;
        }
        self.upgrade_count += 1;
        self.previous_threshold = self.next_threshold;
        self.next_threshold = self.threshold_after(self.next_threshold, self.upgrade_count);
        true
    }

    fn threshold_after(&self, current: u32, count: u32) -> u32 {
        let linear = count.saturating_mul(self.config.interval_increase);
        let curve =
            (f64::from(count).powf(self.config.curve_exponent) * self.config.curve_scale).floor();
        current
            .saturating_add(self.config.base_interval)
            .saturating_add(linear)
            .saturating_add(curve as u32)
    }

    pub fn progress(&self, score: u32) -> UpgradeProgress {
        if score >= self.next_threshold {
            return UpgradeProgress {
                ready: true,
                current: score,
                target: self.next_threshold,
                progress: 1.0,
                points_needed: 0,
            };
        }
        let span = f64::from(self.next_threshold - self.previous_threshold);
        let gained = f64::from(score) - f64::from(self.previous_threshold);
        UpgradeProgress {
            ready: false,
            current: score,
            target: self.next_threshold,
            progress: (gained / span).clamp(0.0, 1.0),
            points_needed: self.next_threshold - score,
        }
    }

    /// Up to `options_per_offer` distinct kinds that are not yet maxed, in random order.
    pub fn offer(&self, rng: &mut impl RandomSource) -> Vec<UpgradeKind> {
        let mut available: Vec<UpgradeKind> =
            UpgradeKind::ALL.into_iter().filter(|kind| !self.is_maxed(*kind)).collect();
        let take = self.config.options_per_offer.min(available.len());
        for i in 0..take {
            let j = i + rng.pick_index(available.len() - i);
            available.swap(i, j);
        }
        available.truncate(take);
        available
    }

    /// Returns false, leaving the level unchanged, when already maxed.
    pub fn apply(&mut self, kind: UpgradeKind) -> bool {
        if self.is_maxed(kind) {
            return false;
        }
        self.levels[kind.slot()] += 1;
        true
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.levels[kind.slot()]
    }

    pub fn is_maxed(&self, kind: UpgradeKind) -> bool {
        self.level(kind) >= kind.spec().max_level
    }

    pub fn value(&self, kind: UpgradeKind) -> u32 {
        kind.spec().value_at(kind, self.level(kind))
    }

    pub fn info(&self, kind: UpgradeKind) -> UpgradeInfo {
        let spec = kind.spec();
        let level = self.level(kind);
        UpgradeInfo {
            kind,
            name: spec.name,
            description: spec.description,
            level,
            max_level: spec.max_level,
            current_value: spec.value_at(kind, level),
            next_value: (level < spec.max_level).then(|| spec.value_at(kind, level + 1)),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}
