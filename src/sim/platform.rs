//! Static platforms the ball lands on (and a heavy ball breaks through)

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::effects::Effects;
use super::particle::ParticleColor;
use super::weight::WeightCategory;
use crate::consts::BREAK_THRESHOLD;

/// How a platform answered a landing ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformResponse {
    /// Light ball rebounded
    Bounced,
    /// Light ball came in too slow to rebound and now rests on top
    Settled,
    /// Medium ball stopped dead
    Stopped,
    /// Heavy ball broke the platform and keeps falling
    Broke,
    /// Heavy ball hit too softly to break it
    Resisted,
}

/// A horizontal slab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub broken: bool,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            broken: false,
        }
    }

    /// True when a falling ball's bounding box overlaps this intact platform
    pub fn collides(&self, ball: &Ball) -> bool {
        let r = ball.radius();
        !self.broken
            && ball.vel.y > 0.0
            && ball.pos.y + r >= self.y
            && ball.pos.y - r <= self.y + self.height
            && ball.pos.x + r >= self.x
            && ball.pos.x - r <= self.x + self.width
    }

    /// Apply the weight-specific landing response. Call only after
    /// [`collides`](Self::collides) returned true.
    ///
    /// Returns the response and the impact force (`|vy| * mass`) at contact.
    pub fn resolve(&mut self, ball: &mut Ball) -> (PlatformResponse, f32) {
        ball.pos.y = self.y - ball.radius();

        let impact_force = ball.vel.y.abs() * ball.profile().mass;

        let response = match ball.weight() {
            WeightCategory::Light => {
                let rebound = ball.vel.y * -0.7;
                if rebound.abs() < 1.0 {
                    ball.vel.y = 0.0;
                    ball.vel.x *= 0.8;
                    PlatformResponse::Settled
                } else {
                    ball.vel.y = rebound;
                    ball.vel.x *= 0.9;
                    PlatformResponse::Bounced
                }
            }
            WeightCategory::Medium => {
                ball.vel = Vec2::ZERO;
                PlatformResponse::Stopped
            }
            WeightCategory::Heavy => {
                if impact_force > BREAK_THRESHOLD {
                    self.broken = true;
                    ball.vel.y *= 0.6;
                    PlatformResponse::Broke
                } else {
                    ball.vel.y *= -0.1;
                    ball.vel.x *= 0.7;
                    PlatformResponse::Resisted
                }
            }
        };

        (response, impact_force)
    }

    /// Throw dark fragments out from where the ball punched through
    pub fn shatter(&self, impact_x: f32, impact_force: f32, fx: &mut Effects<'_>) {
        let pieces = (impact_force * 3.0).floor() as usize + 6;
        let life = 1.0 + impact_force * 0.2;

        for _ in 0..pieces {
            let offset = (fx.rng.random::<f32>() - 0.5) * self.width * 0.5;
            let angle = fx.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = fx.rng.random::<f32>() * (impact_force * 1.5) + 1.0;
            fx.spawn(
                Vec2::new(impact_x + offset, self.y + self.height / 2.0),
                Vec2::new(angle.cos() * speed, angle.sin() * speed),
                ParticleColor::Debris,
                life,
            );
        }
    }
}
