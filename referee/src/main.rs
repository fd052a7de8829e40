use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use referee::{
    load_engine_config, render_bounds, render_check, render_snap, simulate_drag, CheckReport,
    LineupFile,
};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use volley::{player_in_slot, Position, RulesEngine, Slot};

#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to an engine config JSON file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    /// Check lineups against the overlap rules
    Check {
        /// Paths to lineup JSON files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show where one player may stand
    Constraints {
        file: PathBuf,
        /// Slot number (1-6) or label such as "LF"
        #[arg(short, long)]
        slot: Slot,
    },
    /// Check a target position for one player and snap it if needed
    Snap {
        file: PathBuf,
        #[arg(short, long)]
        slot: Slot,
        #[arg(short, long, allow_hyphen_values = true)]
        x: f64,
        #[arg(short, long, allow_hyphen_values = true)]
        y: f64,
    },
    /// Drag one player along a random path and drop them
    Drag {
        file: PathBuf,
        #[arg(short, long)]
        slot: Slot,
        /// How many pointer moves to simulate
        #[arg(long, default_value_t = 50)]
        steps: usize,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let config = load_engine_config(args.config.as_deref())?;
    let mut engine = RulesEngine::new(config);

    match args.command {
        Command::Check { files } => {
            let mut all_legal = true;
            for path in &files {
                let lineup = LineupFile::load(path)?;
                let result = engine.validate_lineup(&lineup.players);
                all_legal &= result.is_legal;
                if args.json {
                    let report = CheckReport::new(&lineup.name, &lineup.players, &result);
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render_check(&lineup.name, &lineup.players, &result));
                }
            }
            if !all_legal {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Constraints { file, slot } => {
            let lineup = LineupFile::load(&file)?;
            if player_in_slot(&lineup.players, slot).is_none() {
                anyhow::bail!("Nobody plays in {} in '{}'", slot, lineup.name);
            }
            let bounds = engine.get_player_constraints(slot, &lineup.players);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&bounds)?);
            } else {
                print!("{}", render_bounds(slot, &bounds));
            }
        }
        Command::Snap { file, slot, x, y } => {
            let lineup = LineupFile::load(&file)?;
            if player_in_slot(&lineup.players, slot).is_none() {
                anyhow::bail!("Nobody plays in {} in '{}'", slot, lineup.name);
            }
            let target = Position::new(x, y);
            let was_valid = engine.is_valid_position(slot, target, &lineup.players);
            let snapped = engine.snap_to_valid_position(slot, target, &lineup.players);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapped)?);
            } else {
                print!("{}", render_snap(slot, target, snapped, was_valid));
            }
        }
        Command::Drag {
            file,
            slot,
            steps,
            seed,
        } => {
            let mut lineup = LineupFile::load(&file)?;

            // Get a random seed
            let seed = seed.unwrap_or_else(rand::random);
            info!(seed);
            let mut rng = StdRng::seed_from_u64(seed);

            let report = simulate_drag(&mut engine, &mut lineup.players, slot, steps, &mut rng)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}: dragged from {} to {} in {} steps ({} snapped)",
                    slot, report.start, report.dropped_at, report.steps, report.snapped_steps
                );
                println!(
                    "Constraint cache: {} hits, {} misses ({:.0}% hit rate)",
                    report.cache.constraint_hits,
                    report.cache.constraint_misses,
                    report.cache.constraint_hit_rate() * 100.0
                );
                print!("{}", render_check(&lineup.name, &lineup.players, &report.result));
            }
            if !report.result.is_legal {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(format),
        )
        .with(filter)
        .init();
}
