//! The stone ball: integration, wall/floor/platform response, impact chips

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::effects::{Effects, SimEvent};
use super::particle::ParticleColor;
use super::platform::{Platform, PlatformResponse};
use super::weight::{WeightCategory, WeightProfile, profile_for};
use crate::consts::*;

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// The simulated ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    weight: WeightCategory,
    pub active: bool,
    /// Recent positions, oldest first
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, weight: WeightCategory) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            weight,
            active: true,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn weight(&self) -> WeightCategory {
        self.weight
    }

    #[inline]
    pub fn profile(&self) -> &'static WeightProfile {
        profile_for(self.weight)
    }

    /// Advance one tick: gravity, motion, walls, floor, trail, platforms.
    pub fn step(&mut self, arena: &Arena, platforms: &mut [Platform], fx: &mut Effects<'_>) {
        if !self.active {
            return;
        }

        self.vel.y += GRAVITY * self.profile().gravity_multiplier;
        self.pos += self.vel;
        self.vel *= FRICTION;

        self.collide_walls(arena);
        self.collide_floor(arena, fx);
        self.record_trail();

        for (index, platform) in platforms.iter_mut().enumerate() {
            if !platform.collides(self) {
                continue;
            }
            let (response, impact_force) = platform.resolve(self);
            if response == PlatformResponse::Broke {
                log::debug!(
                    "Platform {} broken (impact force {:.2})",
                    index,
                    impact_force
                );
                if fx.break_debris {
                    platform.shatter(self.pos.x, impact_force, fx);
                }
            }
            fx.record(SimEvent::PlatformHit {
                index,
                response,
                impact_force,
            });
        }
    }

    fn collide_walls(&mut self, arena: &Arena) {
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x *= -BOUNCE;
        }
        if self.pos.x + self.radius > arena.width {
            self.pos.x = arena.width - self.radius;
            self.vel.x *= -BOUNCE;
        }
    }

    fn collide_floor(&mut self, arena: &Arena, fx: &mut Effects<'_>) {
        let floor = arena.floor_y();
        if self.pos.y + self.radius <= floor {
            return;
        }
        self.pos.y = floor - self.radius;

        let incoming_vy = self.vel.y;
        match self.weight {
            WeightCategory::Heavy => {
                self.vel = Vec2::ZERO;
            }
            WeightCategory::Medium => {
                self.vel.y *= -BOUNCE * 0.5;
                self.vel.x *= 0.6;
                if self.vel.y.abs() < 1.0 {
                    self.vel.y = 0.0;
                    self.vel.x *= 0.8;
                }
            }
            WeightCategory::Light => {
                self.vel.y *= -BOUNCE;
                self.vel.x *= 0.8;
                if self.vel.y.abs() < 0.5 {
                    self.vel.y = 0.0;
                    self.vel.x *= 0.9;
                }
            }
        }

        fx.record(SimEvent::FloorImpact {
            weight: self.weight,
            incoming_vy,
            outgoing_vy: self.vel.y,
        });

        // A heavy ball's floor response zeroes vy, so this never fires for it.
        if self.vel.y.abs() > 1.0 || self.weight != WeightCategory::Heavy {
            self.emit_impact(fx);
        }
    }

    fn emit_impact(&self, fx: &mut Effects<'_>) {
        let mass = self.profile().mass;
        let count = (mass * 8.0).floor() as usize + 6;

        for _ in 0..count {
            let speed = (fx.rng.random::<f32>() * 3.0 + 1.0) * mass;
            let x = self.pos.x + (fx.rng.random::<f32>() - 0.5) * self.radius;
            let vx = (fx.rng.random::<f32>() - 0.5) * speed;
            let vy = -fx.rng.random::<f32>() * speed * 0.7;
            fx.spawn(
                Vec2::new(x, self.pos.y + self.radius),
                Vec2::new(vx, vy),
                ParticleColor::Stone,
                1.5 * mass,
            );
        }
    }

    /// Push the current position, keep the newest few, re-fade
    pub fn record_trail(&mut self) {
        self.trail.push(TrailPoint {
            pos: self.pos,
            alpha: 1.0,
        });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.remove(0);
        }
        let len = self.trail.len() as f32;
        for (i, point) in self.trail.iter_mut().enumerate() {
            point.alpha = (i as f32 + 1.0) / len * 0.2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        particles: Vec<crate::sim::Particle>,
        rng: Pcg32,
        events: Vec<SimEvent>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                particles: Vec::new(),
                rng: Pcg32::seed_from_u64(42),
                events: Vec::new(),
            }
        }

        fn step(&mut self, ball: &mut Ball, arena: &Arena, platforms: &mut [Platform]) {
            let mut fx = Effects {
                particles: &mut self.particles,
                rng: &mut self.rng,
                events: &mut self.events,
                max_particles: MAX_PARTICLES,
                break_debris: false,
            };
            ball.step(arena, platforms, &mut fx);
        }
    }

    fn arena() -> Arena {
        Arena::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn test_single_step_integration() {
        let arena = arena();
        let mut h = Harness::new();
        let mut ball = Ball::new(Vec2::new(400.0, 70.0), BALL_RADIUS, WeightCategory::Medium);
        ball.vel = Vec2::new(1.0, 0.2);
        h.step(&mut ball, &arena, &mut []);

        let vy = 0.2 + GRAVITY * 1.2;
        assert!((ball.pos.y - (70.0 + vy)).abs() < 1e-5);
        assert!((ball.pos.x - 401.0).abs() < 1e-5);
        assert!((ball.vel.y - vy * FRICTION).abs() < 1e-6);
        assert!((ball.vel.x - FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_wall_bounce() {
        let arena = arena();
        let mut h = Harness::new();
        let mut ball = Ball::new(Vec2::new(31.0, 70.0), BALL_RADIUS, WeightCategory::Light);
        ball.vel = Vec2::new(-5.0, 0.0);
        h.step(&mut ball, &arena, &mut []);
        assert_eq!(ball.pos.x, BALL_RADIUS);
        assert!((ball.vel.x - 5.0 * FRICTION * BOUNCE).abs() < 1e-5);

        let mut ball = Ball::new(Vec2::new(768.0, 70.0), BALL_RADIUS, WeightCategory::Light);
        ball.vel = Vec2::new(5.0, 0.0);
        h.step(&mut ball, &arena, &mut []);
        assert_eq!(ball.pos.x, 800.0 - BALL_RADIUS);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_heavy_floor_hard_stop_without_chips() {
        let arena = arena();
        let mut h = Harness::new();
        let mut ball = Ball::new(Vec2::new(400.0, 530.0), BALL_RADIUS, WeightCategory::Heavy);
        ball.vel = Vec2::new(2.0, 9.0);
        h.step(&mut ball, &arena, &mut []);
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.pos.y, arena.floor_y() - BALL_RADIUS);
        // Documented quirk: a heavy floor stop never emits impact chips
        assert!(h.particles.is_empty());
        assert!(matches!(h.events[0], SimEvent::FloorImpact { outgoing_vy, .. } if outgoing_vy == 0.0));
    }

    #[test]
    fn test_medium_floor_bounce_and_settle() {
        let arena = arena();
        let mut h = Harness::new();
        let mut ball = Ball::new(Vec2::new(400.0, 530.0), BALL_RADIUS, WeightCategory::Medium);
        ball.vel = Vec2::new(2.0, 10.0);
        h.step(&mut ball, &arena, &mut []);
        let incoming = (10.0 + GRAVITY * 1.2) * FRICTION;
        assert!((ball.vel.y - -incoming * BOUNCE * 0.5).abs() < 1e-5);
        assert!((ball.vel.x - 2.0 * FRICTION * 0.6).abs() < 1e-5);

        let mut ball = Ball::new(Vec2::new(400.0, 534.0), BALL_RADIUS, WeightCategory::Medium);
        ball.vel = Vec2::new(2.0, 2.0);
        h.step(&mut ball, &arena, &mut []);
        assert_eq!(ball.vel.y, 0.0);
        assert!((ball.vel.x - 2.0 * FRICTION * 0.6 * 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_light_floor_impact_chips() {
        let arena = arena();
        let mut h = Harness::new();
        let mut ball = Ball::new(Vec2::new(400.0, 530.0), BALL_RADIUS, WeightCategory::Light);
        ball.vel = Vec2::new(0.0, 8.0);
        h.step(&mut ball, &arena, &mut []);

        // floor(0.4 * 8) + 6
        assert_eq!(h.particles.len(), 9);
        for p in &h.particles {
            assert_eq!(p.color, ParticleColor::Stone);
            assert!((p.max_life - 0.6).abs() < 1e-6);
            assert_eq!(p.pos.y, arena.floor_y());
            assert!((p.pos.x - 400.0).abs() <= BALL_RADIUS / 2.0);
            assert!(p.vel.y <= 0.0);
        }
    }

    #[test]
    fn test_trail_keeps_newest_three() {
        let mut ball = Ball::new(Vec2::ZERO, BALL_RADIUS, WeightCategory::Light);
        for i in 0..5 {
            ball.pos = Vec2::new(i as f32, 0.0);
            ball.record_trail();
        }
        assert_eq!(ball.trail.len(), 3);
        let xs: Vec<f32> = ball.trail.iter().map(|p| p.pos.x).collect();
        assert_eq!(xs, vec![2.0, 3.0, 4.0]);
        assert!((ball.trail[0].alpha - 0.2 / 3.0).abs() < 1e-6);
        assert!((ball.trail[2].alpha - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_inactive_ball_is_frozen() {
        let arena = arena();
        let mut h = Harness::new();
        let mut ball = Ball::new(Vec2::new(400.0, 70.0), BALL_RADIUS, WeightCategory::Heavy);
        ball.active = false;
        h.step(&mut ball, &arena, &mut []);
        assert_eq!(ball.pos, Vec2::new(400.0, 70.0));
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_heavy_breaks_platform_during_step() {
        let arena = arena();
        let mut h = Harness::new();
        let mut platforms = [Platform::new(0.0, 200.0, 800.0, 14.0)];
        let mut ball = Ball::new(Vec2::new(400.0, 168.0), BALL_RADIUS, WeightCategory::Heavy);
        ball.vel = Vec2::new(0.0, 6.0);
        h.step(&mut ball, &arena, &mut platforms);
        assert!(platforms[0].broken);
        assert!(matches!(
            h.events.last(),
            Some(SimEvent::PlatformHit { index: 0, response: PlatformResponse::Broke, .. })
        ));
    }
}
