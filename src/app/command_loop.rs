use crate::profile_scope;
use crate::simulation::Simulation;
use crate::state::{SimCommand, PAUSED, SIM_COMMAND_SENDER, SIM_CONFIG};
use std::io::BufRead;
use std::sync::atomic::Ordering;
use thiserror::Error;
use ultraviolet::Vec2;

/// What the simulation loop should do after a command was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Advance a single frame even while paused.
    StepOnce,
    Quit,
}

pub fn handle_command(cmd: SimCommand, simulation: &mut Simulation) -> Flow {
    profile_scope!("command_handling");
    match cmd {
        SimCommand::Explode { x, y } => {
            let (force, radius) = {
                let cfg = SIM_CONFIG.lock();
                (cfg.explosion_force, cfg.explosion_radius)
            };
            let hit = simulation.explode(Vec2::new(x, y), force, radius);
            log::info!("explosion at ({:.1}, {:.1}) reached {} particles", x, y, hit);
        }
        SimCommand::SetRestitution(value) => {
            let mut cfg = SIM_CONFIG.lock();
            cfg.restitution = value;
            *cfg = cfg.sanitized();
            log::info!("restitution set to {:.3}", cfg.restitution);
        }
        SimCommand::SetGravity(value) => {
            let mut cfg = SIM_CONFIG.lock();
            cfg.gravity = value;
            *cfg = cfg.sanitized();
            log::info!("gravity set to {:.3}", cfg.gravity);
        }
        SimCommand::ToggleQuadtree => {
            let mut cfg = SIM_CONFIG.lock();
            cfg.show_quadtree = !cfg.show_quadtree;
            log::info!("quadtree drawing {}", if cfg.show_quadtree { "on" } else { "off" });
        }
        SimCommand::Pause => {
            PAUSED.store(true, Ordering::Relaxed);
            log::info!("paused at frame {}", simulation.frame);
        }
        SimCommand::Resume => {
            PAUSED.store(false, Ordering::Relaxed);
            log::info!("resumed at frame {}", simulation.frame);
        }
        SimCommand::StepOnce => return Flow::StepOnce,
        SimCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseCommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("`{0}` expects {1} numeric argument(s)")]
    Arguments(&'static str, usize),
}

/// Parse one console line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<SimCommand>, ParseCommandError> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<f32> = words.map(str::parse).collect::<Result<_, _>>().map_err(|_| arity(name))?;

    let cmd = match (name, args.as_slice()) {
        ("explode", &[x, y]) => SimCommand::Explode { x, y },
        ("cor", &[v]) => SimCommand::SetRestitution(v),
        ("g", &[v]) => SimCommand::SetGravity(v),
        ("tree", []) => SimCommand::ToggleQuadtree,
        ("pause", []) => SimCommand::Pause,
        ("resume", []) => SimCommand::Resume,
        ("step", []) => SimCommand::StepOnce,
        ("quit" | "exit", []) => SimCommand::Quit,
        _ => return Err(arity(name)),
    };
    Ok(Some(cmd))
}

fn arity(name: &str) -> ParseCommandError {
    match name {
        "explode" => ParseCommandError::Arguments("explode", 2),
        "cor" => ParseCommandError::Arguments("cor", 1),
        "g" => ParseCommandError::Arguments("g", 1),
        "tree" => ParseCommandError::Arguments("tree", 0),
        "pause" => ParseCommandError::Arguments("pause", 0),
        "resume" => ParseCommandError::Arguments("resume", 0),
        "step" => ParseCommandError::Arguments("step", 0),
        "quit" | "exit" => ParseCommandError::Arguments("quit", 0),
        other => ParseCommandError::Unknown(other.to_string()),
    }
}

/// Forward a command to the simulation thread, if one is listening.
pub fn send_command(cmd: SimCommand) -> bool {
    match SIM_COMMAND_SENDER.lock().as_ref() {
        Some(tx) => tx.send(cmd).is_ok(),
        None => false,
    }
}

/// Read commands from stdin until it closes or the simulation stops listening.
pub fn spawn_stdin_reader() -> std::thread::JoinHandle<()> {
    std::thread::spawn(|| {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(Some(cmd)) => {
                    if !send_command(cmd) {
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
    })
}
