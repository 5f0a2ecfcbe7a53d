use crate::config;
use crate::profile_scope;
use crate::simulation::Simulation;
use crate::state::{SimCommand, PAUSED, SIM_CONFIG, SNAPSHOT};
use crossbeam::channel::Receiver;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use super::command_loop::{self, Flow};
use crate::diagnostics::FpsMeter;

/// How the loop is driven; filled in from the command line.
#[derive(Clone, Debug)]
pub struct LoopOptions {
    /// Stop after this many frames.
    pub max_frames: Option<usize>,
    /// Sleep to hold the target frame rate.
    pub throttle: bool,
    /// Log a diagnostics line every this many frames (0 disables it).
    pub report_every: usize,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            throttle: true,
            report_every: config::DEFAULT_REPORT_EVERY,
        }
    }
}

pub fn publish(simulation: &Simulation) {
    *SNAPSHOT.lock() = simulation.snapshot();
}

/// Run frames until a `Quit` command arrives or the frame limit is reached.
pub fn run_simulation_loop(rx: Receiver<SimCommand>, mut simulation: Simulation, options: LoopOptions) -> Simulation {
    let frame_time = Duration::from_secs_f32(1.0 / config::TARGET_FPS);
    let mut fps = FpsMeter::default();
    let mut last_frame = Instant::now();

    loop {
        let started = Instant::now();

        // Handle commands
        let mut step_once = false;
        for cmd in rx.try_iter() {
            match command_loop::handle_command(cmd, &mut simulation) {
                Flow::Continue => {}
                Flow::StepOnce => step_once = true,
                Flow::Quit => {
                    log::info!("quit requested at frame {}", simulation.frame);
                    return simulation;
                }
            }
        }

        if PAUSED.load(Ordering::Relaxed) && !step_once {
            std::thread::sleep(frame_time);
            continue;
        }

        let repaired = simulation.repair_invalid();
        if repaired > 0 {
            log::warn!("found {} particles with non-finite state, reset them", repaired);
        }

        let cfg = SIM_CONFIG.lock().clone();
        let now = Instant::now();
        fps.record(now - last_frame);
        simulation.set_fps(fps.fps());
        last_frame = now;

        let stats = {
            profile_scope!("simulation_loop");
            simulation.step(&cfg)
        };
        publish(&simulation);

        if options.report_every > 0 && stats.frame % options.report_every == 0 {
            log::info!(
                "frame {:>6}  fps {:>5.1}  capacity {:>2}  collided {:>4}/{}  collisions/s {:>5}  KE {:.1}",
                stats.frame,
                stats.fps,
                stats.capacity,
                stats.highlighted,
                stats.particle_count,
                stats.collisions_per_second,
                stats.kinetic_energy,
            );
            #[cfg(feature = "profiling")]
            crate::PROFILER.lock().log_and_clear();
        }

        if options.max_frames.is_some_and(|max| simulation.frame >= max) {
            log::info!("reached frame limit {}", simulation.frame);
            return simulation;
        }

        if options.throttle {
            let elapsed = started.elapsed();
            if elapsed < frame_time {
                std::thread::sleep(frame_time - elapsed);
            }
        }
    }
}
