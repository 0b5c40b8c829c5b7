use crate::spawn::SpawnStrategy;
use crate::types::{EnemyId, PixelPoint};
use crate::upgrades::UpgradeKind;

/// Notifications for the UI, drained by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    EnemySpawned { enemy: EnemyId, tier: usize, point: PixelPoint, strategy: SpawnStrategy },
    SpawnDropped,
    EnemyKilled { enemy: EnemyId, tier: usize, score_gained: u32 },
    DifficultyIncreased { level: u32, target_enemy_count: u32, respawn_delay_ms: u32 },
    UpgradeOffered { options: Vec<UpgradeKind> },
    UpgradeApplied { kind: UpgradeKind, level: u32 },
    PlayerDamaged { hp: u32 },
    GameOver { score: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KillReport {
    pub enemy: EnemyId,
    pub tier: usize,
    pub score_gained: u32,
    pub total_score: u32,
    pub respawn_due_ms: u64,
    pub respawn_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Unknown enemy, or the run is already over.
    Ignored,
    Wounded { remaining_hp: u32 },
    Killed(KillReport),
}
