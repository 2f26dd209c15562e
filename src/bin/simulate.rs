//! Arena headless stage simulator.
//!
//! Runs stages with an auto-attacking player and no UI, then prints a
//! balance summary. Uses the same `Simulation::tick` as the real game.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Options:
//!   --stage N       Stage to run (default: 1)
//!   --seed N        RNG seed (default: 42)
//!   --runs N        Number of runs with incrementing seeds (default: 1)
//!   --config DIR    Load config JSON from DIR instead of built-in defaults
//!   --persist       Play on the save in the platform data directory
//!   --verbose       Print every event

use arena_core::config::GameConfig;
use arena_core::core::constants::TICK_INTERVAL_MS;
use arena_core::core::{GameEvent, Simulation, StageOutcome};
use arena_core::persistence::{FileStore, MemoryStore, SaveStore};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Simulated seconds per tick.
const TICK_SECONDS: f64 = TICK_INTERVAL_MS as f64 / 1000.0;
/// Seconds between consecutive attacks by one monster.
const MONSTER_ATTACK_INTERVAL: f64 = 1.5;
/// Hard stop for a run that never ends.
const MAX_TICKS: u64 = 200_000;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimArgs {
    stage: u32,
    seed: u64,
    runs: u32,
    config_dir: Option<PathBuf>,
    persist: bool,
    verbose: bool,
}

impl Default for SimArgs {
    fn default() -> Self {
        Self {
            stage: 1,
            seed: 42,
            runs: 1,
            config_dir: None,
            persist: false,
            verbose: false,
        }
    }
}

fn parse_number<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    match value.and_then(|v| v.parse().ok()) {
        Some(n) => n,
        None => {
            eprintln!("{flag} requires a number");
            print_usage();
            process::exit(1);
        }
    }
}

fn parse_args() -> SimArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = SimArgs::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--stage" => {
                i += 1;
                parsed.stage = parse_number("--stage", args.get(i));
            }
            "--seed" => {
                i += 1;
                parsed.seed = parse_number("--seed", args.get(i));
            }
            "--runs" => {
                i += 1;
                parsed.runs = parse_number("--runs", args.get(i));
            }
            "--config" => {
                i += 1;
                match args.get(i) {
                    Some(dir) => parsed.config_dir = Some(PathBuf::from(dir)),
                    None => {
                        eprintln!("--config requires a directory");
                        process::exit(1);
                    }
                }
            }
            "--persist" => parsed.persist = true,
            "--verbose" => parsed.verbose = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }
    parsed
}

fn print_usage() {
    eprintln!(
        "Arena Headless Stage Simulator\n\
         \n\
         Usage: simulate [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --stage N       Stage to run (default: 1)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --runs N        Number of runs with incrementing seeds (default: 1)\n\
         \x20 --config DIR    Load config JSON from DIR\n\
         \x20 --persist       Play on the save in the platform data directory\n\
         \x20 --verbose       Print every event\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Run Statistics ───────────────────────────────────────────────────

#[derive(Debug, Default)]
struct RunSummary {
    ticks: u64,
    outcome: Option<StageOutcome>,
    spawned: u32,
    unconfigured: u32,
    crits: u32,
    pickups: u32,
    items_lost: u32,
    level_ups: u32,
    final_level: u32,
    final_gold: u64,
    score: u32,
    grade: String,
}

impl RunSummary {
    fn process(&mut self, event: &GameEvent) {
        match event {
            GameEvent::MonsterSpawned { configured, .. } => {
                self.spawned += 1;
                if !configured {
                    self.unconfigured += 1;
                }
            }
            GameEvent::DamageDealt { is_crit: true, .. } => self.crits += 1,
            GameEvent::ItemPickup { count, .. } => self.pickups += count,
            GameEvent::InventoryFull { lost, .. } => self.items_lost += lost,
            GameEvent::LeveledUp { .. } => self.level_ups += 1,
            _ => {}
        }
    }

    fn outcome_label(&self) -> String {
        match self.outcome {
            Some(StageOutcome::Cleared { stars, .. }) => format!("CLEARED ({stars}*)"),
            Some(StageOutcome::Failed { .. }) => "FAILED".to_string(),
            None => "TIMEOUT".to_string(),
        }
    }
}

fn run_once<S: SaveStore>(
    config: &GameConfig,
    store: S,
    stage: u32,
    seed: u64,
    verbose: bool,
) -> RunSummary {
    let mut sim = Simulation::new(config.clone(), store, seed);
    let mut summary = RunSummary::default();

    // Unlock the requested stage as if earlier ones were already beaten.
    for earlier in 1..stage {
        if sim.progress().is_unlocked(stage) {
            break;
        }
        if !sim.enter_stage(earlier) {
            break;
        }
        drive(&mut sim, &mut RunSummary::default(), false);
        sim.exit_stage();
    }

    if !sim.enter_stage(stage) {
        eprintln!("stage {stage} is locked or unknown");
        return summary;
    }
    drive(&mut sim, &mut summary, verbose);

    let stats = sim.battle_stats();
    summary.outcome = sim.outcome();
    summary.final_level = sim.player().level;
    summary.final_gold = sim.player().gold;
    summary.score = stats.score();
    summary.grade = stats.grade().to_string();
    if verbose {
        println!("  {stats}");
    }
    if let Err(err) = sim.on_quit() {
        eprintln!("failed to save: {err}");
    }
    summary
}

/// Ticks the stage to its end: the player swings at the lowest handle at its
/// attack speed, every monster swings on a fixed interval.
fn drive<S: SaveStore>(sim: &mut Simulation<S>, summary: &mut RunSummary, verbose: bool) {
    let attack_interval = 1.0 / sim.config().settings.player.attack_speed.max(0.1);
    let mut player_cooldown = 0.0;
    let mut monster_cooldown = MONSTER_ATTACK_INTERVAL;

    for tick in 0..MAX_TICKS {
        summary.ticks = tick + 1;
        for event in sim.tick(TICK_SECONDS) {
            if verbose {
                println!("  [{tick:>6}] {event:?}");
            }
            summary.process(&event);
        }
        if !sim.in_stage() {
            break;
        }

        player_cooldown -= TICK_SECONDS;
        if player_cooldown <= 0.0 {
            if let Some(&target) = sim.monster_handles().first() {
                sim.player_attack(target);
                player_cooldown = attack_interval;
            }
        }

        monster_cooldown -= TICK_SECONDS;
        if monster_cooldown <= 0.0 {
            for handle in sim.monster_handles() {
                sim.monster_attack(handle);
            }
            monster_cooldown = MONSTER_ATTACK_INTERVAL;
        }
    }

    for event in sim.tick(0.0) {
        summary.process(&event);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("arena_core=info")))
        .init();

    let args = parse_args();
    let config = match &args.config_dir {
        Some(dir) => {
            let (config, report) = GameConfig::load_from_dir(dir);
            println!("Config sources: {report:?}");
            config
        }
        None => GameConfig::default(),
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              ARENA STAGE SIMULATOR                            ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Stage: {}  Seed: {}  Runs: {}", args.stage, args.seed, args.runs);
    println!();

    let mut cleared = 0u32;
    for run in 0..args.runs {
        let seed = args.seed + run as u64;
        let summary = if args.persist {
            match FileStore::default_location() {
                Ok(store) => run_once(&config, store, args.stage, seed, args.verbose),
                Err(err) => {
                    eprintln!("no save directory: {err}");
                    process::exit(1);
                }
            }
        } else {
            run_once(&config, MemoryStore::new(), args.stage, seed, args.verbose)
        };
        if matches!(summary.outcome, Some(StageOutcome::Cleared { .. })) {
            cleared += 1;
        }
        println!(
            "run {:>3} seed {:>6}: {:<14} time {:>7.1}s spawned {:>3} (unconfigured {}) crits {:>3} pickups {:>3} lost {:>2} lvl {:>2} (+{}) gold {:>6} score {:>3} [{}]",
            run + 1,
            seed,
            summary.outcome_label(),
            summary.ticks as f64 * TICK_SECONDS,
            summary.spawned,
            summary.unconfigured,
            summary.crits,
            summary.pickups,
            summary.items_lost,
            summary.final_level,
            summary.level_ups,
            summary.final_gold,
            summary.score,
            summary.grade,
        );
    }

    println!();
    println!(
        "Cleared {cleared}/{} ({:.1}%)",
        args.runs,
        if args.runs == 0 {
            0.0
        } else {
            cleared as f64 * 100.0 / args.runs as f64
        }
    );
}
