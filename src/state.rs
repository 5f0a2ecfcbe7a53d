use crossbeam::channel::Sender;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::atomic::AtomicBool;

use crate::config::SimConfig;
use crate::snapshot::FrameSnapshot;

/// Tunables shared with the input side; the simulation copies them once per frame.
pub static SIM_CONFIG: Lazy<Mutex<SimConfig>> = Lazy::new(|| Mutex::new(SimConfig::default()));
pub static PAUSED: Lazy<AtomicBool> = Lazy::new(|| AtomicBool::new(false));
/// Last completed frame, for whatever draws or inspects the simulation.
pub static SNAPSHOT: Lazy<Mutex<FrameSnapshot>> = Lazy::new(|| Mutex::new(FrameSnapshot::default()));

//Simulation commands
// Sent to the simulation thread from the input thread
#[derive(Clone, Debug, PartialEq)]
pub enum SimCommand {
    Explode { x: f32, y: f32 },
    SetRestitution(f32),
    SetGravity(f32),
    ToggleQuadtree,
    Pause,
    Resume,
    StepOnce,
    Quit,
}

pub static SIM_COMMAND_SENDER: Lazy<Mutex<Option<Sender<SimCommand>>>> = Lazy::new(|| Mutex::new(None));
