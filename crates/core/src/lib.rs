pub mod config;
pub mod difficulty;
pub mod error;
pub mod mapgen;
pub mod pursuit;
pub mod rng;
pub mod scores;
pub mod session;
pub mod spawn;
pub mod types;
pub mod upgrades;

pub use config::TuningConfig;
pub use difficulty::{DifficultyModel, EnemyTier};
pub use error::{ConfigError, GenerationError, GridError, ScoreTableError};
pub use mapgen::{Dungeon, DungeonGenerator, generate_dungeon};
pub use rng::{RandomSource, SeededRng};
pub use scores::{ScoreEntry, ScoreTable};
pub use session::{GameSession, HitOutcome, SessionEvent};
pub use spawn::{SpawnEngine, SpawnOutcome, SpawnQuery};
pub use types::*;
pub use upgrades::{UpgradeKind, UpgradeTracker};
