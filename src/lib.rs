pub mod attractor;
pub mod config;
pub mod diagnostics;
pub mod init_config;
pub mod particle;
pub mod profiler;
pub mod quadtree;
pub mod simulation;
pub mod snapshot;
pub mod state;

pub mod app;

#[cfg(feature = "profiling")]
use once_cell::sync::Lazy;
#[cfg(feature = "profiling")]
use parking_lot::Mutex;

#[cfg(feature = "profiling")]
pub static PROFILER: Lazy<Mutex<profiler::Profiler>> =
    Lazy::new(|| Mutex::new(profiler::Profiler::new()));
