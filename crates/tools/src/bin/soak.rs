use std::f32::consts::TAU;

use anyhow::{Result, ensure};
use clap::Parser;
use delve_core::session::GameSession;
use delve_core::{EnemyId, PixelPoint, TileKind, TuningConfig};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of sessions, seeded consecutively from `seed`
    #[arg(long, default_value_t = 20)]
    sessions: u64,
    /// Simulated milliseconds per session
    #[arg(short, long, default_value_t = 120_000)]
    duration_ms: u64,
    #[arg(long, default_value_t = 50)]
    step_ms: u64,
}

fn unit(rng: &mut ChaCha8Rng) -> f32 {
    (rng.next_u64() >> 40) as f32 / (1_u64 << 24) as f32
}

fn choose<T: Copy>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p]
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let tuning = TuningConfig::default();

    println!(
        "Soaking {} sessions from seed {} for {} ms each...",
        args.sessions, args.seed, args.duration_ms
    );
    for offset in 0..args.sessions {
        let seed = args.seed.wrapping_add(offset);
        let session = GameSession::new(tuning.clone(), seed)?;
        let (score, kills, alive) = soak(session, seed, &args)?;
        println!("seed {seed}: score {score}, kills {kills}, survived: {alive}");
    }

    println!("Soak completed successfully.");
    Ok(())
}

fn soak(mut session: GameSession, seed: u64, args: &Args) -> Result<(u32, u32, bool)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let dt = args.step_ms as f32 / 1000.0;
    let cap = session.tuning().difficulty.max_enemy_count as usize;
    ensure!(session.dungeon().rooms_connected(), "seed {seed}: rooms disconnected");

    let mut now = 0;
    let mut last_score = 0;
    while now < args.duration_ms && !session.is_game_over() {
        now += args.step_ms;

        // Random walk, blocked by walls.
        let player = session.player().clone();
        let heading = unit(&mut rng) * TAU;
        let target = player.center.offset_polar(heading, player.speed * dt);
        let next = if session.dungeon().tile_at_pixel(target) == TileKind::Floor {
            target
        } else {
            player.center
        };
        session.track_player(next);

        for (id, velocity) in session.enemy_velocities() {
            let Some(enemy) = session.enemy(id) else { continue };
            let moved =
                PixelPoint::new(enemy.center.x + velocity.x * dt, enemy.center.y + velocity.y * dt);
            if session.dungeon().tile_at_pixel(moved) == TileKind::Floor {
                session.sync_enemy(id, moved);
            }
            if moved.distance_to(next) < 16.0 && unit(&mut rng) < 0.05 {
                session.damage_player();
            }
        }

        if unit(&mut rng) < 0.2 {
            let ids: Vec<EnemyId> = session.enemies().map(|enemy| enemy.id).collect();
            if !ids.is_empty() {
                let id = choose(&mut rng, &ids);
                session.hit_enemy(id, choose(&mut rng, &[1, 1, 2, 3]), now);
            }
        }

        session.tick(now);
        if let Some(offer) = session.pending_offer() {
            let pick = choose(&mut rng, offer);
            session.apply_upgrade(pick);
        }
        session.drain_events();

        // Invariants
        let player = session.player();
        ensure!(player.hp <= player.max_hp, "seed {seed}: hp above max");
        ensure!(session.score() >= last_score, "seed {seed}: score decreased");
        ensure!(
            session.enemy_count() <= cap,
            "seed {seed}: {} enemies over cap",
            session.enemy_count()
        );
        for enemy in session.enemies() {
            ensure!(
                session.dungeon().tile_at_pixel(enemy.center) == TileKind::Floor,
                "seed {seed}: enemy inside wall at {:?}",
                enemy.center
            );
            ensure!(enemy.state.hp <= enemy.state.max_hp, "seed {seed}: enemy hp above max");
        }
        last_score = session.score();
    }

    Ok((session.score(), session.kills(), !session.is_game_over()))
}
