//! Run state owned by the caller's frame loop.
//!
//! The physics side reports positions through [`GameSession::track_player`] and
//! [`GameSession::sync_enemy`], and collisions through [`GameSession::hit_enemy`] and
//! [`GameSession::damage_player`]. [`GameSession::tick`] fires due respawns, the
//! periodic population check and upgrade offers. Notifications collect in an event
//! log the UI drains.

mod events;
mod state;

pub use events::{HitOutcome, KillReport, SessionEvent};
pub use state::{Enemy, EnemyState, HudSnapshot, PlayerState};

use std::hash::Hasher;
use std::mem;

use slotmap::SlotMap;
use xxhash_rust::xxh3::Xxh3;

use crate::config::TuningConfig;
use crate::difficulty::DifficultyModel;
use crate::error::GenerationError;
use crate::mapgen::{Dungeon, DungeonGenerator};
use crate::pursuit::pursuit_velocity;
use crate::rng::SeededRng;
use crate::spawn::{SpawnEngine, SpawnQuery};
use crate::types::{EnemyId, PixelPoint, Velocity};
use crate::upgrades::{UpgradeKind, UpgradeTracker, volley_headings};

use state::PendingRespawn;

pub struct GameSession {
    seed: u64,
    tuning: TuningConfig,
    rng: SeededRng,
    dungeon: Dungeon,
    score: u32,
    kills: u32,
    player: PlayerState,
    enemies: SlotMap<EnemyId, Enemy>,
    upgrades: UpgradeTracker,
    pending_offer: Option<Vec<UpgradeKind>>,
    pending_respawns: Vec<PendingRespawn>,
    last_enemy_check_ms: u64,
    // Highest level already announced.
    level_watermark: u32,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Generates the dungeon, places the player in the start room and seeds the
    /// opening population. The session clock starts at 0 ms.
    pub fn new(tuning: TuningConfig, seed: u64) -> Result<Self, GenerationError> {
        tuning.validate()?;
        let mut rng = SeededRng::new(seed);
        let dungeon = DungeonGenerator::new(tuning.generation.clone()).generate(&mut rng)?;
        let start = dungeon.player_spawn_point();
        let level_watermark = DifficultyModel::new(&tuning.difficulty).difficulty_level(0);
        let player = PlayerState {
            center: start,
            last_center: start,
            hp: tuning.session.player_base_hp,
            max_hp: tuning.session.player_base_hp,
            speed: tuning.session.player_base_speed,
            alive: true,
        };
        let upgrades = UpgradeTracker::new(tuning.upgrades.clone());

        let mut session = Self {
            seed,
            tuning,
            rng,
            dungeon,
            score: 0,
            kills: 0,
            player,
            enemies: SlotMap::with_key(),
            upgrades,
            pending_offer: None,
            pending_respawns: Vec::new(),
            last_enemy_check_ms: 0,
            level_watermark,
            events: Vec::new(),
        };
        let opening = session.difficulty().target_enemy_count(0);
        session.spawn_enemies(opening);
        log::info!(
            "session {seed} started with {} rooms and {} enemies",
            session.dungeon.rooms().len(),
            session.enemies.len()
        );
        Ok(session)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn difficulty(&self) -> DifficultyModel<'_> {
        DifficultyModel::new(&self.tuning.difficulty)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn is_game_over(&self) -> bool {
        !self.player.alive
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(id)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn upgrades(&self) -> &UpgradeTracker {
        &self.upgrades
    }

    /// Options from the latest threshold crossing that have not been chosen yet.
    pub fn pending_offer(&self) -> Option<&[UpgradeKind]> {
        self.pending_offer.as_deref()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    pub fn track_player(&mut self, center: PixelPoint) {
        self.player.last_center = self.player.center;
        self.player.center = center;
    }

    /// Returns false for an enemy that no longer exists.
    pub fn sync_enemy(&mut self, id: EnemyId, center: PixelPoint) -> bool {
        match self.enemies.get_mut(id) {
            Some(enemy) => {
                enemy.center = center;
                true
            }
            None => false,
        }
    }

    pub fn hit_enemy(&mut self, id: EnemyId, damage: u32, now_ms: u64) -> HitOutcome {
        if !self.player.alive {
            return HitOutcome::Ignored;
        }
        let Some(enemy) = self.enemies.get_mut(id) else {
            return HitOutcome::Ignored;
        };
        enemy.state.hp = enemy.state.hp.saturating_sub(damage);
        if enemy.state.hp > 0 {
            return HitOutcome::Wounded { remaining_hp: enemy.state.hp };
        }

        let state = enemy.state;
        self.enemies.remove(id);
        self.kills += 1;
        self.score = self.score.saturating_add(state.score_value);

        let model = DifficultyModel::new(&self.tuning.difficulty);
        let respawn_due_ms = now_ms.saturating_add(u64::from(model.respawn_delay_ms(self.score)));
        let respawn_count = model.respawn_batch_size(self.score);
        self.pending_respawns.push(PendingRespawn { due_ms: respawn_due_ms, count: respawn_count });
        self.events.push(SessionEvent::EnemyKilled {
            enemy: id,
            tier: state.tier,
            score_gained: state.score_value,
        });

        HitOutcome::Killed(KillReport {
            enemy: id,
            tier: state.tier,
            score_gained: state.score_value,
            total_score: self.score,
            respawn_due_ms,
            respawn_count,
        })
    }

    /// One point of contact damage. The run ends when health reaches zero.
    pub fn damage_player(&mut self) {
        if !self.player.alive {
            return;
        }
        self.player.hp = self.player.hp.saturating_sub(1);
        self.events.push(SessionEvent::PlayerDamaged { hp: self.player.hp });
        if self.player.hp == 0 {
            self.player.alive = false;
            self.pending_respawns.clear();
            self.pending_offer = None;
            self.events.push(SessionEvent::GameOver { score: self.score });
            log::info!("game over at score {} after {} kills", self.score, self.kills);
        }
    }

    pub fn tick(&mut self, now_ms: u64) {
        if !self.player.alive {
            return;
        }

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            mem::take(&mut self.pending_respawns).into_iter().partition(|r| r.due_ms <= now_ms);
        self.pending_respawns = waiting;
        due.sort_by_key(|respawn| respawn.due_ms);
        for respawn in due {
            // A batch refills toward the current target and never past it.
            let target = self.difficulty().target_enemy_count(self.score);
            let live = self.enemies.len() as u32;
            self.spawn_enemies(respawn.count.min(target.saturating_sub(live)));
            self.top_up_population();
        }

        if now_ms.saturating_sub(self.last_enemy_check_ms)
            >= self.tuning.session.enemy_check_interval_ms
        {
            self.top_up_population();
            self.check_difficulty_level();
            self.last_enemy_check_ms = now_ms;
        }

        if self.pending_offer.is_none() && self.upgrades.check(self.score) {
            let options = self.upgrades.offer(&mut self.rng);
            if !options.is_empty() {
                self.events.push(SessionEvent::UpgradeOffered { options: options.clone() });
                self.pending_offer = Some(options);
            }
        }
    }

    /// Raises the chosen upgrade and applies its stat effect. Returns false when the
    /// kind is already maxed.
    pub fn apply_upgrade(&mut self, kind: UpgradeKind) -> bool {
        if !self.upgrades.apply(kind) {
            return false;
        }
        match kind {
            UpgradeKind::HpBoost => {
                let new_max = self.upgrades.value(kind);
                let increase = new_max.saturating_sub(self.player.max_hp);
                self.player.max_hp = new_max;
                self.player.hp = (self.player.hp + increase).min(new_max);
            }
            UpgradeKind::SpeedBoost => self.player.speed = self.upgrades.value(kind) as f32,
            UpgradeKind::BulletCount | UpgradeKind::BulletSpread => {}
        }
        self.pending_offer = None;
        self.events.push(SessionEvent::UpgradeApplied { kind, level: self.upgrades.level(kind) });
        true
    }

    /// Attempts `count` spawns and returns how many were placed.
    pub fn spawn_enemies(&mut self, count: u32) -> u32 {
        let mut placed = 0;
        for _ in 0..count {
            let model = DifficultyModel::new(&self.tuning.difficulty);
            let tier_index = model.tier_distribution(self.score).pick(&mut self.rng);
            let Some(tier) = model.tier(tier_index) else {
                continue;
            };
            let state = EnemyState {
                tier: tier_index,
                hp: tier.hp,
                max_hp: tier.hp,
                score_value: tier.score_value,
                speed_multiplier: tier.speed_multiplier,
                size_multiplier: tier.size_multiplier,
            };

            let centers: Vec<PixelPoint> = self.enemies.values().map(|enemy| enemy.center).collect();
            let query = SpawnQuery {
                dungeon: &self.dungeon,
                player_center: self.player.center,
                player_last_center: self.player.last_center,
                enemies: &centers,
                score: self.score,
            };
            let outcome = SpawnEngine::new(&self.tuning.spawn).spawn(&query, &mut self.rng);

            match outcome.placement() {
                Some(placement) => {
                    let (point, strategy) = (placement.point, placement.strategy);
                    let id = self.enemies.insert_with_key(|id| Enemy { id, center: point, state });
                    self.events.push(SessionEvent::EnemySpawned {
                        enemy: id,
                        tier: tier_index,
                        point,
                        strategy,
                    });
                    placed += 1;
                }
                None => self.events.push(SessionEvent::SpawnDropped),
            }
        }
        placed
    }

    /// Chase velocities for every enemy. All zero once the player is dead.
    pub fn enemy_velocities(&self) -> Vec<(EnemyId, Velocity)> {
        let session = &self.tuning.session;
        self.enemies
            .values()
            .map(|enemy| {
                if !self.player.alive {
                    return (enemy.id, Velocity::ZERO);
                }
                let speed = session.base_enemy_speed * enemy.state.speed_multiplier;
                let velocity =
                    pursuit_velocity(enemy.center, self.player.center, speed, session.pursuit_radius);
                (enemy.id, velocity)
            })
            .collect()
    }

    /// Bullet headings for a shot aimed at `aim` radians, using current upgrades.
    pub fn volley(&mut self, aim: f32) -> Vec<f32> {
        if !self.player.alive {
            return Vec::new();
        }
        let bullets = self.upgrades.value(UpgradeKind::BulletCount);
        let directions = self.upgrades.value(UpgradeKind::BulletSpread);
        volley_headings(aim, bullets, directions, &mut self.rng)
    }

    pub fn hud(&self) -> HudSnapshot {
        let model = self.difficulty();
        HudSnapshot {
            score: self.score,
            hp: self.player.hp,
            max_hp: self.player.max_hp,
            level: model.difficulty_level(self.score),
            live_enemies: self.enemies.len() as u32,
            target_enemy_count: model.target_enemy_count(self.score),
            respawn_delay_ms: model.respawn_delay_ms(self.score),
            upgrade: self.upgrades.progress(self.score),
        }
    }

    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.dungeon.fingerprint());
        hasher.write_u32(self.score);
        hasher.write_u32(self.kills);
        hasher.write_u32(self.player.hp);
        hasher.write_u32(self.player.center.x.to_bits());
        hasher.write_u32(self.player.center.y.to_bits());
        for enemy in self.enemies.values() {
            hasher.write_u32(enemy.center.x.to_bits());
            hasher.write_u32(enemy.center.y.to_bits());
            hasher.write_u32(enemy.state.hp);
            hasher.write_usize(enemy.state.tier);
        }
        hasher.finish()
    }

    fn top_up_population(&mut self) {
        let target = self.difficulty().target_enemy_count(self.score) as usize;
        let live = self.enemies.len();
        if live < target {
            self.spawn_enemies((target - live) as u32);
        }
    }

    fn check_difficulty_level(&mut self) {
        let model = DifficultyModel::new(&self.tuning.difficulty);
        let level = model.difficulty_level(self.score);
        if level <= self.level_watermark {
            return;
        }
        self.level_watermark = level;
        let target_enemy_count = model.target_enemy_count(self.score);
        let respawn_delay_ms = model.respawn_delay_ms(self.score);
        log::info!(
            "difficulty level {level}: {target_enemy_count} enemies, {respawn_delay_ms} ms respawn"
        );
        self.events.push(SessionEvent::DifficultyIncreased {
            level,
            target_enemy_count,
            respawn_delay_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// First seed whose opening population was placed in full.
    fn populated_session() -> GameSession {
        (0..64)
            .map(|seed| GameSession::new(TuningConfig::default(), seed).unwrap())
            .find(|session| session.enemy_count() == 3)
            .expect("some seed places the opening population")
    }

    fn any_enemy(session: &GameSession) -> EnemyId {
        session.enemies().next().map(|enemy| enemy.id).expect("a live enemy")
    }

    #[test]
    fn opening_population_matches_score_zero_target() {
        let session = GameSession::new(TuningConfig::default(), 17).unwrap();
        let attempts = session
            .events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::EnemySpawned { .. } | SessionEvent::SpawnDropped))
            .count();
        assert_eq!(attempts, 3);
        assert_eq!(session.player().center, session.dungeon().player_spawn_point());
        assert!(session.enemies().all(|enemy| enemy.state.tier == 0));
    }

    #[test]
    fn kill_scores_and_schedules_respawn() {
        let mut session = populated_session();
        let id = any_enemy(&session);
        let HitOutcome::Killed(report) = session.hit_enemy(id, u32::MAX, 1_000) else {
            panic!("overkill damage should kill");
        };
        assert_eq!(report.score_gained, 10);
        assert_eq!(report.total_score, 10);
        assert_eq!(report.respawn_due_ms, 4_000);
        assert_eq!(report.respawn_count, 1);
        assert_eq!(session.enemy_count(), 2);
        assert_eq!(session.hit_enemy(id, 1, 1_000), HitOutcome::Ignored);

        session.tick(3_999);
        assert_eq!(session.enemy_count(), 2);
        session.tick(4_000);
        let spawned_or_dropped = session
            .events()
            .iter()
            .rev()
            .take_while(|e| !matches!(e, SessionEvent::EnemyKilled { .. }))
            .count();
        assert!(spawned_or_dropped >= 1);
    }

    #[test]
    fn stacked_respawns_stop_at_the_target() {
        let mut session = populated_session();
        let mut due = 0;
        for _ in 0..2 {
            let id = any_enemy(&session);
            let HitOutcome::Killed(report) = session.hit_enemy(id, u32::MAX, 0) else {
                panic!("overkill damage should kill");
            };
            due = due.max(report.respawn_due_ms);
        }
        assert_eq!(session.enemy_count(), 1);

        session.tick(due);
        let target = session.hud().target_enemy_count as usize;
        assert_eq!(target, 3);
        assert!(session.enemy_count() <= target, "{} live of {target}", session.enemy_count());
    }

    #[test]
    fn respawn_timer_saturates_at_the_end_of_time() {
        let mut session = populated_session();
        let id = any_enemy(&session);
        let HitOutcome::Killed(report) = session.hit_enemy(id, u32::MAX, u64::MAX) else {
            panic!("overkill damage should kill");
        };
        assert_eq!(report.respawn_due_ms, u64::MAX);
    }

    #[test]
    fn periodic_check_at_score_zero_announces_nothing() {
        let mut session = populated_session();
        session.drain_events();
        session.tick(5_000);
        assert!(
            !session.events().iter().any(|e| matches!(e, SessionEvent::DifficultyIncreased { .. }))
        );
    }

    #[test]
    fn game_over_freezes_the_run() {
        let mut session = populated_session();
        for _ in 0..3 {
            session.damage_player();
        }
        assert!(session.is_game_over());
        assert_eq!(session.events().last(), Some(&SessionEvent::GameOver { score: 0 }));

        let id = any_enemy(&session);
        assert_eq!(session.hit_enemy(id, 10, 0), HitOutcome::Ignored);
        assert!(session.enemy_velocities().iter().all(|(_, v)| *v == Velocity::ZERO));
        assert!(session.volley(0.0).is_empty());
        session.damage_player();
        assert_eq!(session.player().hp, 0);
    }

    #[test]
    fn hp_upgrade_heals_by_the_increase() {
        let mut session = populated_session();
        session.damage_player();
        assert!(session.apply_upgrade(UpgradeKind::HpBoost));
        assert_eq!((session.player().hp, session.player().max_hp), (3, 4));
        assert!(session.apply_upgrade(UpgradeKind::SpeedBoost));
        assert_eq!(session.player().speed, 250.0);
    }

    #[test]
    fn nearby_enemies_chase_at_tier_speed() {
        let mut session = populated_session();
        let id = any_enemy(&session);
        let player = session.player().center;
        session.sync_enemy(id, PixelPoint::new(player.x + 100.0, player.y));
        let (_, velocity) =
            session.enemy_velocities().into_iter().find(|(enemy, _)| *enemy == id).unwrap();
        assert!((velocity.x + 100.0).abs() < 1e-3);
        assert!(velocity.y.abs() < 1e-3);
    }

    #[test]
    fn tracking_shifts_previous_centroid() {
        let mut session = populated_session();
        let start = session.player().center;
        let next = PixelPoint::new(start.x + 30.0, start.y);
        session.track_player(next);
        assert_eq!(session.player().last_center, start);
        assert_eq!(session.player().center, next);
    }
}
