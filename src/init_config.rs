// init_config.rs
// Handles loading and parsing the initial scenario (arena, population, tunables, attractors)
// from init_config.toml

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{self, SimConfig};

pub const DEFAULT_CONFIG_PATH: &str = "init_config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub arena: ArenaConfig,
    pub particles: ParticlesConfig,
    /// Initial values of the runtime tunables.
    pub physics: SimConfig,
    pub attractors: Vec<AttractorConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: config::DEFAULT_ARENA_WIDTH,
            height: config::DEFAULT_ARENA_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParticlesConfig {
    pub count: usize,
    pub mass_min: f32,
    pub mass_max: f32,
    pub max_speed: f32,
    /// Initial velocity components are drawn from `[-initial_speed, initial_speed]`.
    pub initial_speed: f32,
    pub seed: u64,
}

impl Default for ParticlesConfig {
    fn default() -> Self {
        Self {
            count: config::DEFAULT_PARTICLE_COUNT,
            mass_min: config::DEFAULT_MASS_MIN,
            mass_max: config::DEFAULT_MASS_MAX,
            max_speed: config::DEFAULT_MAX_SPEED,
            initial_speed: config::DEFAULT_INITIAL_SPEED,
            seed: config::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AttractorConfig {
    pub x: f32,
    pub y: f32,
    pub mass: f32,
    pub radius: f32,
    /// `false` makes a repulsor ("white hole").
    #[serde(default = "default_attracting")]
    pub attracting: bool,
    #[serde(default)]
    pub vx: f32,
    #[serde(default)]
    pub vy: f32,
}

fn default_attracting() -> bool {
    true
}

impl ScenarioConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if !(self.arena.width > 0.0 && self.arena.height > 0.0) {
            return invalid(format!("arena must have a positive size, got {}x{}", self.arena.width, self.arena.height));
        }
        let p = &self.particles;
        if !(p.mass_min > 0.0 && p.mass_min <= p.mass_max) {
            return invalid(format!("particle mass range [{}, {}] must be positive and ordered", p.mass_min, p.mass_max));
        }
        if !(p.max_speed > 0.0) || !(p.initial_speed >= 0.0) {
            return invalid("particle speeds must be positive".to_string());
        }
        for (i, a) in self.attractors.iter().enumerate() {
            if !(a.radius > 0.0) || !a.mass.is_finite() {
                return invalid(format!("attractor {} needs a positive radius and finite mass", i));
            }
        }
        Ok(())
    }
}
