//! Last-resort placement inside rooms once distance-band sampling is exhausted.

use crate::rng::RandomSource;
use crate::types::{PixelPoint, PixelRect};

use super::{SpawnEngine, SpawnPlacement, SpawnQuery, SpawnStrategy};

impl SpawnEngine<'_> {
    /// Tries random non-start rooms, then the start room. Points only have to keep
    /// the minimum player distance; walls and enemy spacing are not rechecked.
    pub fn fallback_position(
        &self,
        query: &SpawnQuery<'_>,
        rng: &mut impl RandomSource,
    ) -> Option<SpawnPlacement> {
        let dungeon = query.dungeon;
        let rooms = dungeon.rooms();
        let range = self.adaptive_range(query.player_center, query.enemies, query.score);

        if rooms.len() >= 2 {
            for _ in 0..self.config.fallback_attempts {
                let index = rng.next_int(1, rooms.len() as i32 - 1) as usize;
                let rect = rooms[index].pixel_rect(dungeon.tile_size());
                let point = self.inset_point(rect, rng);
                if point.distance_to(query.player_center) >= self.config.min_spawn_distance {
                    return Some(SpawnPlacement { point, range, strategy: SpawnStrategy::OtherRoom });
                }
            }
        }

        let start = dungeon.room_rect(0)?;
        for _ in 0..self.config.fallback_attempts {
            let point = self.inset_point(start, rng);
            if point.distance_to(query.player_center) >= self.config.min_spawn_distance {
                return Some(SpawnPlacement { point, range, strategy: SpawnStrategy::StartRoom });
            }
        }
        None
    }

    /// Whole-pixel point inside `rect`, kept `fallback_room_inset` away from its edges.
    fn inset_point(&self, rect: PixelRect, rng: &mut impl RandomSource) -> PixelPoint {
        let inset = self.config.fallback_room_inset;
        let x = rng.next_int(rect.x as i32 + inset, rect.right() as i32 - inset);
        let y = rng.next_int(rect.y as i32 + inset, rect.bottom() as i32 - inset);
        PixelPoint::new(x as f32, y as f32)
    }
}
