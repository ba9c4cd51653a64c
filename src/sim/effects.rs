//! Impact effects and simulation events
//!
//! Bodies never own the particle collection. During a tick the controller
//! lends them an [`Effects`] sink that spawns particles from the shared RNG
//! and records what happened.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particle::{Particle, ParticleColor};
use super::platform::PlatformResponse;
use super::weight::WeightCategory;

/// Something notable that happened during a tick (for logging/audio hooks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Ball reached the floor line. Velocities are vertical, before and after
    /// the weight-specific floor response.
    FloorImpact {
        weight: WeightCategory,
        incoming_vy: f32,
        outgoing_vy: f32,
    },
    /// Ball landed on an intact platform
    PlatformHit {
        index: usize,
        response: PlatformResponse,
        impact_force: f32,
    },
}

/// Particle sink lent to the bodies for one tick
pub struct Effects<'a> {
    pub particles: &'a mut Vec<Particle>,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<SimEvent>,
    pub max_particles: usize,
    pub break_debris: bool,
}

impl Effects<'_> {
    /// Spawn one particle, evicting the oldest when at the cap
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, color: ParticleColor, life: f32) {
        if self.max_particles == 0 {
            return;
        }
        let particle = Particle::spawn(pos, vel, color, life, &mut *self.rng);
        if self.particles.len() >= self.max_particles {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    pub fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    proptest! {
        #[test]
        fn prop_cap_is_never_exceeded(cap in 0usize..40, spawns in 0usize..120) {
            let mut particles = Vec::new();
            let mut rng = Pcg32::seed_from_u64(11);
            let mut events = Vec::new();
            let mut fx = Effects {
                particles: &mut particles,
                rng: &mut rng,
                events: &mut events,
                max_particles: cap,
                break_debris: false,
            };
            for i in 0..spawns {
                fx.spawn(Vec2::new(i as f32, 0.0), Vec2::ZERO, ParticleColor::Stone, 1.0);
            }
            prop_assert_eq!(particles.len(), spawns.min(cap));
        }
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut particles = Vec::new();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut events = Vec::new();
        let mut fx = Effects {
            particles: &mut particles,
            rng: &mut rng,
            events: &mut events,
            max_particles: 2,
            break_debris: false,
        };
        for i in 0..3 {
            fx.spawn(Vec2::new(i as f32, 0.0), Vec2::ZERO, ParticleColor::Stone, 1.0);
        }
        assert_eq!(particles[0].pos.x, 1.0);
        assert_eq!(particles[1].pos.x, 2.0);
    }
}
