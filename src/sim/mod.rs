//! Deterministic simulation module
//!
//! All physics lives here. This module must stay pure and deterministic:
//! - One fixed-size update per tick
//! - Seeded RNG only
//! - Time enters only through the controller's `now_ms` arguments
//! - No rendering or platform dependencies

pub mod arena;
pub mod ball;
pub mod controller;
pub mod effects;
pub mod particle;
pub mod platform;
pub mod weight;

pub use arena::Arena;
pub use ball::{Ball, TrailPoint};
pub use controller::{
    Continuation, ControllerPhase, Deferred, RestartStage, SimConfig, SimulationController,
};
pub use effects::{Effects, SimEvent};
pub use particle::{Particle, ParticleColor};
pub use platform::{Platform, PlatformResponse};
pub use weight::{WeightCategory, WeightProfile, profile_for};
