mod score_file;
mod tuning_file;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use delve_core::scores::DEFAULT_TOP;
use delve_core::{DifficultyModel, DungeonGenerator, SeededRng};
use env_logger::Env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a dungeon and print its layout summary
    Generate {
        #[arg(short, long, default_value_t = 42)]
        seed: u64,
        /// TOML tuning file; defaults apply to anything it omits
        #[arg(short, long)]
        tuning: Option<PathBuf>,
        /// Also print the tile map
        #[arg(long)]
        ascii: bool,
    },
    /// Print the default tuning as TOML
    Tuning,
    /// Show the difficulty curve at the given scores
    Difficulty {
        #[arg(default_values_t = vec![0, 100, 400, 800, 1600])]
        scores: Vec<u32>,
        #[arg(short, long)]
        tuning: Option<PathBuf>,
        /// Print one JSON object per score
        #[arg(long)]
        json: bool,
    },
    /// Inspect or edit the high-score table
    Scores {
        /// Score file; defaults to the per-user data directory
        #[arg(short, long)]
        file: Option<PathBuf>,
        #[command(subcommand)]
        action: ScoresAction,
    },
}

#[derive(Subcommand)]
enum ScoresAction {
    List {
        #[arg(short = 'n', long, default_value_t = DEFAULT_TOP)]
        count: usize,
        /// Print the entries as a JSON array
        #[arg(long)]
        json: bool,
    },
    Add {
        name: String,
        score: u32,
    },
    Clear,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.command {
        Command::Generate { seed, tuning, ascii } => generate(seed, tuning, ascii),
        Command::Tuning => {
            print!("{}", tuning_file::render_defaults()?);
            Ok(())
        }
        Command::Difficulty { scores, tuning, json } => difficulty(&scores, tuning, json),
        Command::Scores { file, action } => scores(file, action),
    }
}

fn difficulty(scores: &[u32], tuning: Option<PathBuf>, json: bool) -> Result<()> {
    let tuning = tuning_file::load_or_default(tuning.as_deref())?;
    let model = DifficultyModel::new(&tuning.difficulty);
    if !json {
        println!("{:>6} {:>5} {:>7} {:>8} {:>5}", "score", "level", "enemies", "delay", "batch");
    }
    for &score in scores {
        let snapshot = model.snapshot(score);
        if json {
            println!("{}", serde_json::to_string(&snapshot)?);
            continue;
        }
        println!(
            "{:>6} {:>5} {:>7} {:>6}ms {:>5}",
            snapshot.score,
            snapshot.level,
            snapshot.target_enemy_count,
            snapshot.respawn_delay_ms,
            snapshot.respawn_batch_size,
        );
    }
    Ok(())
}

fn generate(seed: u64, tuning: Option<PathBuf>, ascii: bool) -> Result<()> {
    if let Some(path) = &tuning {
        log::info!("Loading tuning from {}", path.display());
    }
    let tuning = tuning_file::load_or_default(tuning.as_deref())?;
    let dungeon = DungeonGenerator::new(tuning.generation)
        .generate(&mut SeededRng::new(seed))
        .with_context(|| format!("Generation failed for seed {seed}"))?;
    let report = dungeon.report();

    println!("Seed: {seed}");
    println!("Rooms: {}", dungeon.rooms().len());
    println!("Spanning corridors: {}", report.spanning_connections.len());
    println!("Extra corridors: {}", report.extra_connections.len());
    println!("Repairs: {:?}", report.repairs);
    println!("Floor tiles: {}", dungeon.grid().floor_count());
    println!("Fingerprint: {:#018x}", dungeon.fingerprint());
    if ascii {
        print!("{}", dungeon.render_ascii());
    }
    Ok(())
}

fn scores(file: Option<PathBuf>, action: ScoresAction) -> Result<()> {
    let path = match file {
        Some(path) => path,
        None => score_file::default_path().context("No data directory for the score file")?,
    };
    let mut table = score_file::load(&path)
        .with_context(|| format!("Failed to read score file: {}", path.display()))?;

    match action {
        ScoresAction::List { count, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(table.top(count))?);
                return Ok(());
            }
            if table.is_empty() {
                println!("No scores recorded.");
            }
            for (rank, entry) in table.top(count).iter().enumerate() {
                println!("{:>2}. {:<20} {:>6}", rank + 1, entry.name, entry.score);
            }
            return Ok(());
        }
        ScoresAction::Add { name, score } => {
            let rank = table.rank_for(score);
            let new_record = table.is_new_record(score);
            let now_ms = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .context("System clock is before the Unix epoch")?
                .as_millis() as u64;
            let entry = table.record(&name, score, now_ms);
            println!("Recorded {} with {} at rank {rank}.", entry.name, entry.score);
            if new_record {
                println!("New high score!");
            }
        }
        ScoresAction::Clear => {
            table.clear();
            println!("Cleared scores in {}", path.display());
        }
    }

    log::info!("Writing {} score entries to {}", table.len(), path.display());
    score_file::write_atomic(&table, &path)
        .with_context(|| format!("Failed to write score file: {}", path.display()))
}
