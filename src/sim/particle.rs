//! Short-lived decorative particles
//!
//! Particles never touch the ball or platforms. They drift, fall under a
//! fraction of the ball's gravity, bounce weakly off the floor line and fade.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use crate::consts::{GRAVITY, MIN_PARTICLE_SIZE};

/// Color tag, resolved to an actual color by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Gray chips kicked up by a floor impact
    Stone,
    /// Darker fragments of a broken platform
    Debris,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: ParticleColor,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    /// Life lost per tick, fixed at spawn
    pub decay: f32,
    pub rotation: f32,
    pub angular_velocity: f32,
}

impl Particle {
    /// Spawn with randomized size, decay and spin
    pub fn spawn<R: Rng>(pos: Vec2, vel: Vec2, color: ParticleColor, life: f32, rng: &mut R) -> Self {
        Self {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size: rng.random::<f32>() * 4.0 + 2.0,
            decay: 0.008 + rng.random::<f32>() * 0.007,
            rotation: rng.random::<f32>() * std::f32::consts::TAU,
            angular_velocity: (rng.random::<f32>() - 0.5) * 0.2,
        }
    }

    /// Advance one tick
    pub fn step(&mut self, arena: &Arena) {
        self.pos += self.vel;
        self.vel.y += GRAVITY * 0.15;
        self.vel *= 0.98;
        self.life -= self.decay;
        self.size *= 0.995;
        self.rotation += self.angular_velocity;

        let floor = arena.floor_y();
        if self.pos.y > floor {
            self.pos.y = floor;
            self.vel.y *= -0.3;
            self.vel.x *= 0.8;
        }
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.size < MIN_PARTICLE_SIZE
    }

    /// Fade-out opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}
