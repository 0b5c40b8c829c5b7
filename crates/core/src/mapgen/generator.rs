//! Dungeon construction: rooms, spanning corridors, loops, then the reachability pass.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::rng::RandomSource;

use super::connectivity::verify_and_repair;
use super::corridors::{add_extra_connections, connect_spanning_tree};
use super::grid::TileGrid;
use super::layout::{Room, RoomPlacement, place_rooms};
use super::model::{Dungeon, GenerationReport};

pub struct DungeonGenerator {
    config: GenerationConfig,
}

impl DungeonGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, rng: &mut impl RandomSource) -> Result<Dungeon, GenerationError> {
        let mut grid = TileGrid::new(self.config.grid_width, self.config.grid_height);
        self.generate_into(&mut grid, rng).map(|(rooms, report)| Dungeon {
            grid,
            rooms,
            tile_size: self.config.tile_size,
            report,
        })
    }

    /// Regenerates an existing dungeon in place, reusing its tile buffer.
    pub fn regenerate(
        &self,
        dungeon: &mut Dungeon,
        rng: &mut impl RandomSource,
    ) -> Result<(), GenerationError> {
        if dungeon.grid.width() != self.config.grid_width
            || dungeon.grid.height() != self.config.grid_height
        {
            dungeon.grid = TileGrid::new(self.config.grid_width, self.config.grid_height);
        }
        let (rooms, report) = self.generate_into(&mut dungeon.grid, rng)?;
        dungeon.rooms = rooms;
        dungeon.tile_size = self.config.tile_size;
        dungeon.report = report;
        Ok(())
    }

    fn generate_into(
        &self,
        grid: &mut TileGrid,
        rng: &mut impl RandomSource,
    ) -> Result<(Vec<Room>, GenerationReport), GenerationError> {
        self.config.validate()?;
        grid.reset();

        let rooms = place_rooms(grid, rng, RoomPlacement::from(&self.config))?;
        let mut report =
            GenerationReport { placement_attempts: self.config.max_rooms, ..Default::default() };

        // Zero or one room: nothing to join.
        if rooms.len() >= 2 {
            let width = self.config.corridor_width;
            report.spanning_connections = connect_spanning_tree(grid, rng, &rooms, width);
            report.extra_connections = add_extra_connections(
                grid,
                rng,
                &rooms,
                width,
                self.config.extra_connection_divisor,
            );
            report.repairs = verify_and_repair(grid, rng, &rooms, width)?;
        }

        log::debug!(
            "generated {} rooms from {} attempts: {} spanning, {} extra, {} repaired",
            rooms.len(),
            report.placement_attempts,
            report.spanning_connections.len(),
            report.extra_connections.len(),
            report.repairs.len(),
        );
        Ok((rooms, report))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ConfigError;
    use crate::rng::SeededRng;
    use crate::types::{Pos, TileKind};

    fn generate(seed: u64) -> Dungeon {
        DungeonGenerator::new(GenerationConfig::default())
            .generate(&mut SeededRng::new(seed))
            .expect("default tuning is valid")
    }

    #[test]
    fn default_map_has_several_connected_rooms() {
        for seed in [1_u64, 7, 42, 2_024, 99_999] {
            let dungeon = generate(seed);
            assert!(dungeon.rooms().len() >= 2, "seed={seed} placed {} rooms", dungeon.rooms().len());
            assert!(dungeon.rooms_connected(), "seed={seed} left a room unreachable");
        }
    }

    #[test]
    fn spanning_tree_has_one_fewer_edge_than_rooms() {
        let dungeon = generate(314);
        assert_eq!(dungeon.report().spanning_connections.len(), dungeon.rooms().len() - 1);
    }

    #[test]
    fn same_seed_produces_identical_dungeon() {
        assert_eq!(generate(123_456).canonical_bytes(), generate(123_456).canonical_bytes());
        assert_ne!(generate(1).fingerprint(), generate(2).fingerprint());
    }

    #[test]
    fn border_stays_solid() {
        let dungeon = generate(55);
        let grid = dungeon.grid();
        for x in 0..grid.width() as i32 {
            assert_eq!(grid.get(Pos { y: 0, x }), TileKind::Wall);
            assert_eq!(grid.get(Pos { y: grid.height() as i32 - 1, x }), TileKind::Wall);
        }
        for y in 0..grid.height() as i32 {
            assert_eq!(grid.get(Pos { y, x: 0 }), TileKind::Wall);
            assert_eq!(grid.get(Pos { y, x: grid.width() as i32 - 1 }), TileKind::Wall);
        }
    }

    #[test]
    fn single_attempt_yields_lone_room_without_corridors() {
        let config = GenerationConfig { max_rooms: 1, ..GenerationConfig::default() };
        let dungeon = DungeonGenerator::new(config).generate(&mut SeededRng::new(9)).unwrap();
        assert_eq!(dungeon.rooms().len(), 1);
        assert!(dungeon.report().spanning_connections.is_empty());
        assert!(dungeon.report().repairs.is_empty());
        let room = dungeon.rooms()[0];
        assert_eq!(dungeon.grid().floor_count(), room.width * room.height);
    }

    #[test]
    fn zero_attempts_yield_solid_map() {
        let config = GenerationConfig { max_rooms: 0, ..GenerationConfig::default() };
        let dungeon = DungeonGenerator::new(config).generate(&mut SeededRng::new(3)).unwrap();
        assert!(dungeon.rooms().is_empty());
        assert_eq!(dungeon.grid().floor_count(), 0);
    }

    #[test]
    fn invalid_tuning_is_rejected_before_carving() {
        let config = GenerationConfig { min_room_size: 9, max_room_size: 4, ..Default::default() };
        let err = DungeonGenerator::new(config).generate(&mut SeededRng::new(1)).unwrap_err();
        assert_eq!(err, GenerationError::Config(ConfigError::RoomSizeRange { min: 9, max: 4 }));
    }

    #[test]
    fn regenerate_replaces_previous_layout() {
        let generator = DungeonGenerator::new(GenerationConfig::default());
        let mut dungeon = generator.generate(&mut SeededRng::new(10)).unwrap();
        generator.regenerate(&mut dungeon, &mut SeededRng::new(11)).unwrap();
        assert_eq!(dungeon, generator.generate(&mut SeededRng::new(11)).unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]
        #[test]
        fn every_room_is_reachable_from_the_start_room(seed in any::<u64>()) {
            let dungeon = generate(seed);
            prop_assert!(dungeon.rooms_connected(), "seed={seed} produced a disconnected map");
        }

        #[test]
        fn every_floor_tile_joins_the_start_room(seed in any::<u64>()) {
            let dungeon = generate(seed);
            let grid = dungeon.grid();
            let reach = grid.flood_fill(dungeon.rooms()[0].center());
            prop_assert_eq!(reach.len(), grid.floor_count(), "seed={} left a floor island", seed);
        }

        #[test]
        fn accepted_rooms_keep_their_gap(seed in any::<u64>()) {
            let dungeon = generate(seed);
            let rooms = dungeon.rooms();
            for (i, a) in rooms.iter().enumerate() {
                for b in &rooms[i + 1..] {
                    prop_assert!(
                        !a.expanded(2).intersects(b),
                        "seed={seed}: {a:?} and {b:?} overlap within the gap"
                    );
                }
            }
        }
    }
}
