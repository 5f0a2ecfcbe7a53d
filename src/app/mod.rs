use crate::init_config::{ScenarioConfig, DEFAULT_CONFIG_PATH};
use crate::state::{SIM_COMMAND_SENDER, SIM_CONFIG};
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

pub mod command_loop;
pub mod simulation_loop;
pub mod spawn;

use simulation_loop::LoopOptions;

/// Quadtree-accelerated 2D particle simulation.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Scenario file; defaults are used when the default file is missing.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<usize>,
    /// Override the population seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the particle count.
    #[arg(long)]
    pub particles: Option<usize>,
    /// Run as fast as possible instead of at 60 fps.
    #[arg(long)]
    pub unthrottled: bool,
    /// Log diagnostics every N frames (0 disables).
    #[arg(long, default_value_t = crate::config::DEFAULT_REPORT_EVERY)]
    pub report_every: usize,
}

pub fn load_scenario(args: &Args) -> anyhow::Result<ScenarioConfig> {
    let mut scenario = match &args.config {
        Some(path) => ScenarioConfig::load_from_file(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
            ScenarioConfig::load_default().context("loading default scenario")?
        }
        None => {
            log::info!("no {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            ScenarioConfig::default()
        }
    };
    if let Some(seed) = args.seed {
        scenario.particles.seed = seed;
    }
    if let Some(count) = args.particles {
        scenario.particles.count = count;
    }
    Ok(scenario)
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let scenario = load_scenario(&args)?;

    // Global rayon pool with threads = max(3, total cores) - 2
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let threads = cores.max(crate::config::MIN_THREADS) - crate::config::THREADS_LEAVE_FREE;
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
        log::warn!("rayon pool already initialised: {}", e);
    }

    *SIM_CONFIG.lock() = scenario.physics.sanitized();
    let simulation = spawn::build_simulation(&scenario);
    log::info!(
        "arena {}x{}, {} particles, {} attractors, seed {}",
        scenario.arena.width,
        scenario.arena.height,
        simulation.particles.len(),
        simulation.attractors.len(),
        scenario.particles.seed,
    );

    let (tx, rx) = crossbeam::channel::unbounded();
    *SIM_COMMAND_SENDER.lock() = Some(tx);
    command_loop::spawn_stdin_reader();

    let options = LoopOptions {
        max_frames: args.frames,
        throttle: !args.unthrottled,
        report_every: args.report_every,
    };
    let simulation = std::thread::Builder::new()
        .name("simulation".into())
        .spawn(move || simulation_loop::run_simulation_loop(rx, simulation, options))
        .context("spawning simulation thread")?
        .join()
        .map_err(|_| anyhow::anyhow!("simulation thread panicked"))?;

    *SIM_COMMAND_SENDER.lock() = None;
    log::info!(
        "finished after {} frames, kinetic energy {:.1}",
        simulation.frame,
        simulation.kinetic_energy()
    );
    Ok(())
}
