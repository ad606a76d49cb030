#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::{Path, PathBuf};

#[cfg(feature = "std")]
use battleships::{
    init_logging, view, Difficulty, DirStore, GameSnapshot, MonotonicTime, Phase, Position,
    Replay, Session, ShipSpec, DEFAULT_FLEET, DEFAULT_HEIGHT, DEFAULT_MAX_SAVES,
    DEFAULT_WIDTH,
};
#[cfg(feature = "std")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::seq::SliceRandom;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use serde_json::json;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum Level {
    Easy,
    Medium,
    Hard,
}

#[cfg(feature = "std")]
impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play a full game with a random human against the computer opponent
    /// and print a JSON summary.
    Sim {
        #[arg(long, default_value_t = DEFAULT_WIDTH)]
        width: usize,
        #[arg(long, default_value_t = DEFAULT_HEIGHT)]
        height: usize,
        #[arg(long, value_enum, default_value_t = Level::Medium)]
        difficulty: Level,
        /// Ships as COUNTxLENGTH, comma separated (e.g. 1x5,2x3).
        #[arg(long, value_delimiter = ',', value_parser = parse_ship)]
        fleet: Vec<ShipSpec>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        /// Save the finished game into this directory.
        #[arg(long)]
        save_dir: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_MAX_SAVES)]
        max_saves: usize,
    },
    /// Replay a saved game and draw both boards.
    Replay {
        file: PathBuf,
        /// Stop after this many shots instead of replaying to the end.
        #[arg(long)]
        steps: Option<usize>,
    },
    /// Check a saved game without loading it.
    Validate { file: PathBuf },
}

#[cfg(feature = "std")]
fn parse_ship(s: &str) -> Result<ShipSpec, String> {
    let (count, length) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| format!("expected COUNTxLENGTH, got {:?}", s))?;
    let count = count.trim().parse().map_err(|e| format!("{}: {}", s, e))?;
    let length = length.trim().parse().map_err(|e| format!("{}: {}", s, e))?;
    Ok(ShipSpec::new(count, length))
}

#[cfg(feature = "std")]
fn seeded(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn read_snapshot(file: &Path) -> anyhow::Result<GameSnapshot> {
    use anyhow::Context;
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    GameSnapshot::from_json(&json).with_context(|| format!("loading {}", file.display()))
}

#[cfg(feature = "std")]
fn run_sim(
    width: usize,
    height: usize,
    difficulty: Difficulty,
    fleet: Vec<ShipSpec>,
    seed: Option<u64>,
    save_dir: Option<PathBuf>,
    max_saves: usize,
) -> anyhow::Result<()> {
    let fleet = if fleet.is_empty() {
        DEFAULT_FLEET.to_vec()
    } else {
        fleet
    };
    let mut session = Session::new(seeded(seed), MonotonicTime::new());
    // the simulated human gets its own stream so its choices don't shift the
    // opponent's
    let mut human = seeded(seed.map(|s| s.wrapping_add(1)));

    session.resize(width, height)?;
    session.confirm_size()?;
    session.auto_place(&fleet)?;
    session.confirm_ships()?;
    session.choose_difficulty(difficulty)?;

    let mut targets: Vec<Position> = session.enemy().positions().collect();
    targets.shuffle(&mut human);
    let mut turns = 0usize;
    while session.phase() == Phase::Gameplay {
        let target = targets
            .pop()
            .ok_or_else(|| anyhow::anyhow!("ran out of targets before the game ended"))?;
        session.fire(target)?;
        turns += 1;
    }

    let slot = match save_dir {
        Some(dir) => {
            let mut store = DirStore::new(dir, max_saves);
            Some(session.save(&mut store)?)
        }
        None => None,
    };

    let winner = match session.winner_is_player() {
        Some(true) => Some("player"),
        Some(false) => Some("opponent"),
        None => None,
    };
    let result = json!({
        "winner": winner,
        "difficulty": session.difficulty().name(),
        "width": session.player().width(),
        "height": session.player().height(),
        "turns": turns,
        "player": {
            "shots": session.enemy().shots_fired(),
            "hit_rate": session.enemy().hit_rate(),
        },
        "opponent": {
            "shots": session.player().shots_fired(),
            "hit_rate": session.player().hit_rate(),
        },
        "elapsed_ms": session.elapsed_ms(),
        "slot": slot,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}

#[cfg(feature = "std")]
fn run_replay(file: PathBuf, steps: Option<usize>) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&file)?;
    let difficulty = snapshot.difficulty()?;
    let mut replay = Replay::new(snapshot)?;
    let applied = match steps {
        Some(n) => (0..n).take_while(|_| replay.step_forward().is_ok()).count(),
        None => replay.to_end(),
    };

    let player = view::draw_lines(replay.player(), None, false);
    let enemy = view::draw_lines(replay.enemy(), None, false);
    let pad = view::line_width(replay.player());
    println!("{:<pad$}   {}", "Player", "Opponent", pad = pad);
    for (left, right) in player.iter().zip(&enemy) {
        println!("{:<pad$}   {}", left, right, pad = pad);
    }
    println!(
        "{} shots replayed ({}, player {}%, opponent {}%)",
        applied,
        difficulty,
        replay.enemy().hit_rate(),
        replay.player().hit_rate()
    );
    Ok(())
}

#[cfg(feature = "std")]
fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sim {
            width,
            height,
            difficulty,
            fleet,
            seed,
            save_dir,
            max_saves,
        } => run_sim(
            width,
            height,
            difficulty.into(),
            fleet,
            seed,
            save_dir,
            max_saves,
        )?,
        Commands::Replay { file, steps } => run_replay(file, steps)?,
        Commands::Validate { file } => {
            let snapshot = read_snapshot(&file)?;
            println!(
                "{}: valid, {}x{}, {}",
                file.display(),
                snapshot.player.width(),
                snapshot.player.height(),
                if snapshot.is_ongoing() {
                    "in progress"
                } else if snapshot.player_won() {
                    "won by player"
                } else {
                    "won by opponent"
                }
            );
        }
    }
    Ok(())
}
