//! Enemy spawn placement around the player.
//!
//! A request first samples the adaptive distance band, biased toward the player's
//! heading when they are moving, and then falls back to points inside rooms. Every
//! point returned by the sampling stages satisfies [`SpawnEngine::is_valid_spawn`].
//! Fallback points only guarantee the minimum player distance.

mod fallback;

use std::f32::consts::TAU;

use crate::config::{SpawnConfig, SpawnRange};
use crate::mapgen::Dungeon;
use crate::rng::RandomSource;
use crate::types::{PixelPoint, TileKind};

/// Everything the engine reads about the world for one request.
#[derive(Clone, Copy, Debug)]
pub struct SpawnQuery<'a> {
    pub dungeon: &'a Dungeon,
    pub player_center: PixelPoint,
    /// Player centroid on the previous tick, used for the heading.
    pub player_last_center: PixelPoint,
    /// Body centres of live enemies.
    pub enemies: &'a [PixelPoint],
    pub score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpawnStrategy {
    Directional,
    Random,
    OtherRoom,
    StartRoom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPlacement {
    pub point: PixelPoint,
    pub range: SpawnRange,
    pub strategy: SpawnStrategy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnOutcome {
    Placed(SpawnPlacement),
    FallbackPlaced(SpawnPlacement),
    Dropped { range: SpawnRange },
}

impl SpawnOutcome {
    pub fn placement(&self) -> Option<&SpawnPlacement> {
        match self {
            Self::Placed(placement) | Self::FallbackPlaced(placement) => Some(placement),
            Self::Dropped { .. } => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SpawnEngine<'a> {
    config: &'a SpawnConfig,
}

impl<'a> SpawnEngine<'a> {
    pub fn new(config: &'a SpawnConfig) -> Self {
        Self { config }
    }

    /// Distance band for the next spawn, widened when the player is crowded.
    pub fn adaptive_range(
        &self,
        player: PixelPoint,
        enemies: &[PixelPoint],
        score: u32,
    ) -> SpawnRange {
        let nearby = enemies
            .iter()
            .filter(|enemy| player.distance_to(**enemy) <= self.config.density_radius)
            .count();

        let mut range = if nearby < self.config.sparse_below {
            self.config.sparse_range
        } else if nearby > self.config.crowded_above {
            self.config.crowded_range
        } else {
            self.config.default_range
        };

        if score >= self.config.late_game_score {
            range.min = (range.min - self.config.late_game_min_reduction)
                .max(self.config.late_game_min_floor);
        }
        range
    }

    pub fn is_valid_spawn(&self, query: &SpawnQuery<'_>, point: PixelPoint) -> bool {
        let dungeon = query.dungeon;
        let margin = (self.config.bounds_margin_tiles * dungeon.tile_size()) as f32;
        if point.x < margin
            || point.x >= dungeon.pixel_width() - margin
            || point.y < margin
            || point.y >= dungeon.pixel_height() - margin
        {
            return false;
        }
        if dungeon.tile_at_pixel(point) != TileKind::Floor {
            return false;
        }
        if point.distance_to(query.player_center) < self.config.min_spawn_distance {
            return false;
        }
        query.enemies.iter().all(|enemy| point.distance_to(*enemy) >= self.config.enemy_separation)
    }

    /// Samples the adaptive band: heading cone first when moving, then uniform.
    pub fn find_spawn_position(
        &self,
        query: &SpawnQuery<'_>,
        rng: &mut impl RandomSource,
    ) -> Option<SpawnPlacement> {
        let range = self.adaptive_range(query.player_center, query.enemies, query.score);
        let placed = |point, strategy| SpawnPlacement { point, range, strategy };

        if let Some(heading) = self.heading(query) {
            let cone = f64::from(self.config.directional_cone);
            for _ in 0..self.config.directional_attempts {
                let angle = heading + rng.float_between(-cone, cone) as f32;
                let point = self.sample_at(query.player_center, angle, range, rng);
                if self.is_valid_spawn(query, point) {
                    return Some(placed(point, SpawnStrategy::Directional));
                }
            }
        }

        for _ in 0..self.config.spawn_attempts {
            let angle = rng.float_between(0.0, f64::from(TAU)) as f32;
            let point = self.sample_at(query.player_center, angle, range, rng);
            if self.is_valid_spawn(query, point) {
                return Some(placed(point, SpawnStrategy::Random));
            }
        }
        None
    }

    /// Full request: sampling, then room fallback, then drop.
    pub fn spawn(&self, query: &SpawnQuery<'_>, rng: &mut impl RandomSource) -> SpawnOutcome {
        if let Some(placement) = self.find_spawn_position(query, rng) {
            return SpawnOutcome::Placed(placement);
        }
        if let Some(placement) = self.fallback_position(query, rng) {
            log::debug!("spawn sampling exhausted, placed in room at {:?}", placement.point);
            return SpawnOutcome::FallbackPlaced(placement);
        }
        let range = self.adaptive_range(query.player_center, query.enemies, query.score);
        log::warn!(
            "no spawn position found around {:?} (range {:.0}..{:.0}), dropping spawn",
            query.player_center,
            range.min,
            range.max
        );
        SpawnOutcome::Dropped { range }
    }

    fn heading(&self, query: &SpawnQuery<'_>) -> Option<f32> {
        let dx = query.player_center.x - query.player_last_center.x;
        let dy = query.player_center.y - query.player_last_center.y;
        if (dx * dx + dy * dy).sqrt() < self.config.movement_threshold {
            return None;
        }
        Some(dy.atan2(dx))
    }

    fn sample_at(
        &self,
        origin: PixelPoint,
        angle: f32,
        range: SpawnRange,
        rng: &mut impl RandomSource,
    ) -> PixelPoint {
        let distance = rng.float_between(f64::from(range.min), f64::from(range.max)) as f32;
        origin.offset_polar(angle, distance)
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use super::*;
    use crate::mapgen::{Room, TileGrid, carve_room};
    use crate::rng::SeededRng;
    use crate::types::Pos;

    /// 40x40 arena whose whole interior is one room.
    pub(super) fn open_arena() -> Dungeon {
        let mut grid = TileGrid::new(40, 40);
        let room = Room { x: 1, y: 1, width: 38, height: 38 };
        carve_room(&mut grid, &room).unwrap();
        Dungeon::from_parts(grid, vec![room], 32)
    }

    fn query<'a>(dungeon: &'a Dungeon, enemies: &'a [PixelPoint]) -> SpawnQuery<'a> {
        let center = PixelPoint::new(640.0, 640.0);
        SpawnQuery {
            dungeon,
            player_center: center,
            player_last_center: center,
            enemies,
            score: 0,
        }
    }

    #[test]
    fn range_follows_local_density() {
        let config = SpawnConfig::default();
        let engine = SpawnEngine::new(&config);
        let player = PixelPoint::new(0.0, 0.0);
        let near = |n: usize| vec![PixelPoint::new(100.0, 0.0); n];

        assert_eq!(engine.adaptive_range(player, &near(1), 0), SpawnRange::new(200.0, 400.0));
        assert_eq!(engine.adaptive_range(player, &near(2), 0), SpawnRange::new(250.0, 600.0));
        assert_eq!(engine.adaptive_range(player, &near(5), 0), SpawnRange::new(250.0, 600.0));
        assert_eq!(engine.adaptive_range(player, &near(6), 0), SpawnRange::new(300.0, 800.0));

        let far = vec![PixelPoint::new(401.0, 0.0); 10];
        assert_eq!(engine.adaptive_range(player, &far, 0), SpawnRange::new(200.0, 400.0));
    }

    #[test]
    fn late_game_pulls_minimum_in_but_not_below_floor() {
        let config = SpawnConfig::default();
        let engine = SpawnEngine::new(&config);
        let player = PixelPoint::new(0.0, 0.0);
        let crowd = vec![PixelPoint::new(50.0, 0.0); 6];
        assert_eq!(engine.adaptive_range(player, &[], 400), SpawnRange::new(200.0, 400.0));
        assert_eq!(engine.adaptive_range(player, &crowd, 400), SpawnRange::new(270.0, 800.0));
        assert_eq!(engine.adaptive_range(player, &crowd[..3], 399), SpawnRange::new(250.0, 600.0));
        assert_eq!(engine.adaptive_range(player, &crowd[..3], 400), SpawnRange::new(220.0, 600.0));
    }

    #[test]
    fn validity_rejects_walls_margin_player_and_crowding() {
        let config = SpawnConfig::default();
        let engine = SpawnEngine::new(&config);
        let dungeon = open_arena();
        let enemies = [PixelPoint::new(1000.0, 1000.0)];
        let query = query(&dungeon, &enemies);

        assert!(engine.is_valid_spawn(&query, PixelPoint::new(640.0, 300.0)));
        assert!(!engine.is_valid_spawn(&query, PixelPoint::new(20.0, 640.0)), "margin");
        assert!(!engine.is_valid_spawn(&query, PixelPoint::new(640.0, 1260.0)), "margin");
        assert!(!engine.is_valid_spawn(&query, PixelPoint::new(700.0, 700.0)), "player");
        assert!(!engine.is_valid_spawn(&query, PixelPoint::new(1050.0, 1000.0)), "enemy");

        let mut grid = dungeon.grid().clone();
        grid.set(Pos { y: 9, x: 20 }, TileKind::Wall).unwrap();
        let walled = Dungeon::from_parts(grid, dungeon.rooms().to_vec(), 32);
        let walled_query = SpawnQuery { dungeon: &walled, ..query };
        assert!(!engine.is_valid_spawn(&walled_query, PixelPoint::new(650.0, 300.0)), "wall");
    }

    #[test]
    fn stationary_player_gets_uniform_spawn_in_sparse_band() {
        let config = SpawnConfig::default();
        let engine = SpawnEngine::new(&config);
        let dungeon = open_arena();
        let query = query(&dungeon, &[]);

        for seed in 0..50 {
            let placement = engine
                .find_spawn_position(&query, &mut SeededRng::new(seed))
                .expect("open arena always has room");
            assert_eq!(placement.strategy, SpawnStrategy::Random);
            assert_eq!(placement.range, SpawnRange::new(200.0, 400.0));
            let distance = placement.point.distance_to(query.player_center);
            assert!((250.0..=400.01).contains(&distance), "seed={seed} distance={distance}");
        }
    }

    #[test]
    fn moving_player_gets_spawn_ahead() {
        let config = SpawnConfig::default();
        let engine = SpawnEngine::new(&config);
        let dungeon = open_arena();
        let moving = SpawnQuery {
            player_last_center: PixelPoint::new(600.0, 640.0),
            ..query(&dungeon, &[])
        };

        let mut directional = 0;
        for seed in 0..50 {
            let placement = engine.find_spawn_position(&moving, &mut SeededRng::new(seed)).unwrap();
            if placement.strategy == SpawnStrategy::Directional {
                directional += 1;
                let dx = placement.point.x - moving.player_center.x;
                let dy = placement.point.y - moving.player_center.y;
                let angle = dy.atan2(dx);
                assert!(angle.abs() <= FRAC_PI_4 + 1e-4, "seed={seed} angle={angle}");
            }
        }
        assert!(directional > 40, "only {directional}/50 spawns used the heading");
    }

    #[test]
    fn cramped_start_room_drops_the_spawn() {
        let config = SpawnConfig::default();
        let engine = SpawnEngine::new(&config);
        let mut grid = TileGrid::new(8, 8);
        let room = Room { x: 1, y: 1, width: 6, height: 6 };
        carve_room(&mut grid, &room).unwrap();
        let dungeon = Dungeon::from_parts(grid, vec![room], 32);
        let query = SpawnQuery {
            dungeon: &dungeon,
            player_center: dungeon.player_spawn_point(),
            player_last_center: dungeon.player_spawn_point(),
            enemies: &[],
            score: 0,
        };

        let outcome = engine.spawn(&query, &mut SeededRng::new(1));
        assert_eq!(outcome, SpawnOutcome::Dropped { range: SpawnRange::new(200.0, 400.0) });
        assert!(outcome.placement().is_none());
    }
}
