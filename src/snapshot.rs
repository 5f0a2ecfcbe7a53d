// snapshot.rs
// Read-only view of a finished frame handed to whatever draws the simulation.

use serde::{Deserialize, Serialize};
use ultraviolet::Vec2;

use crate::attractor::Attractor;
use crate::diagnostics::FrameStats;
use crate::particle::Particle;
use crate::quadtree::Rectangle;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub radius: f32,
    pub highlighted: bool,
}

impl From<&Particle> for ParticleView {
    fn from(p: &Particle) -> Self {
        Self {
            pos: p.pos,
            radius: p.radius,
            highlighted: p.highlighted,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttractorView {
    pub pos: Vec2,
    pub radius: f32,
    pub influence_radius: f32,
    pub attracting: bool,
}

impl From<&Attractor> for AttractorView {
    fn from(a: &Attractor) -> Self {
        Self {
            pos: a.pos,
            radius: a.radius,
            influence_radius: a.influence_radius,
            attracting: a.attracting,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub frame: usize,
    pub width: f32,
    pub height: f32,
    pub particles: Vec<ParticleView>,
    pub attractors: Vec<AttractorView>,
    /// Node boundaries of the frame's quadtree; empty unless tree drawing is on.
    pub tree: Vec<Rectangle>,
    pub stats: FrameStats,
}
