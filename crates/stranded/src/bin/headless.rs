//! # Stranded Headless Runner
//!
//! Runs the simulation without a renderer, feeding an idle input snapshot
//! every tick.
//!
//! ## Usage
//!
//! ```bash
//! stranded-headless --seed 7 --ticks 3600 --fps 60
//! stranded-headless --config world.toml --log-level debug
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use stranded::{GameEvent, InputSnapshot, MemoryAssets, SimConfig, SimResult, Simulation};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Headless survival simulation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML config file; defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// World seed, overrides the config
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Simulated frames per second
    #[arg(short, long, default_value_t = 60)]
    fps: u32,

    /// Log filter used when RUST_LOG is not set
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(args: &Args) -> SimResult<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.world.seed = seed;
    }
    Ok(config)
}

#[derive(Default)]
struct EventTally {
    spawned: u64,
    despawned: u64,
    defeated: u64,
    player_hits: u64,
    respawns: u64,
    quests: u64,
}

impl EventTally {
    fn record(&mut self, event: &GameEvent) {
        match event {
            GameEvent::EntitySpawned { .. } => self.spawned += 1,
            GameEvent::EntityDespawned { .. } => self.despawned += 1,
            GameEvent::EnemyDefeated { .. } => self.defeated += 1,
            GameEvent::PlayerDamaged { .. } => self.player_hits += 1,
            GameEvent::PlayerRespawned => self.respawns += 1,
            GameEvent::QuestCompleted { .. } => self.quests += 1,
            _ => {}
        }
    }

    fn log(&self) {
        info!(
            spawned = self.spawned,
            despawned = self.despawned,
            defeated = self.defeated,
            player_hits = self.player_hits,
            respawns = self.respawns,
            quests = self.quests,
            "events"
        );
    }
}

fn run(args: &Args) -> SimResult<()> {
    let config = load_config(args)?;
    info!(
        seed = config.world.seed,
        ticks = args.ticks,
        fps = args.fps,
        "starting headless run"
    );

    let mut simulation = Simulation::new(config, &mut MemoryAssets::standard())?;
    let events = simulation.events();
    let input = InputSnapshot::idle();

    #[allow(clippy::cast_precision_loss)]
    let elapsed = 1.0 / args.fps.max(1) as f32;
    let report_every = u64::from(args.fps.max(1)) * 10;

    let mut tally = EventTally::default();
    for event in events.drain() {
        tally.record(&event);
    }

    for tick in 1..=args.ticks {
        simulation.tick(elapsed, &input);
        for event in events.drain() {
            tally.record(&event);
        }
        if tick % report_every == 0 {
            let snapshot = simulation.snapshot();
            info!(
                tick,
                time = format_args!("{:.1}", snapshot.time),
                enemies = snapshot.enemies.len(),
                loot = snapshot.loot.len(),
                health = format_args!("{:.1}", snapshot.player.health),
                hunger = format_args!("{:.1}", snapshot.player.hunger),
                thirst = format_args!("{:.1}", snapshot.player.thirst),
                brightness = format_args!("{:.2}", snapshot.lighting.brightness),
                "progress"
            );
        }
    }

    simulation.log_summary();
    tally.log();
    if simulation.dropped_events() > 0 {
        info!(dropped = simulation.dropped_events(), "events dropped");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "headless run failed");
            ExitCode::FAILURE
        }
    }
}
