//! Stone Drop - a weighted stone ball falling through breakable platforms
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball, platforms, particles, controller)
//! - `renderer`: Stone-shaded 2D drawing from a read-only view of the sim
//! - `settings`: Display and simulation preferences
//! - `error`: Configuration errors at the crate's fallible boundaries

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::{QualityPreset, Settings};

/// Simulation configuration constants
pub mod consts {
    /// Downward acceleration per tick before the weight multiplier
    pub const GRAVITY: f32 = 0.25;
    /// Per-tick velocity damping for the ball
    pub const FRICTION: f32 = 0.98;
    /// Restitution for walls and the floor
    pub const BOUNCE: f32 = 0.6;

    /// Distance of the floor line above the canvas bottom
    pub const FLOOR_OFFSET: f32 = 35.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 30.0;
    pub const BALL_START_Y: f32 = 70.0;
    /// Downward nudge given on start
    pub const BALL_START_VY: f32 = 0.2;
    /// Number of recent positions kept for the motion trail
    pub const TRAIL_LENGTH: usize = 3;

    /// Platform rows (top edge y) and slab height
    pub const PLATFORM_ROWS: [f32; 2] = [200.0, 400.0];
    pub const PLATFORM_HEIGHT: f32 = 14.0;
    /// Impact force a heavy ball must exceed to break a platform
    pub const BREAK_THRESHOLD: f32 = 3.0;

    /// Gap between "stop" and "rebuild + start" on restart
    pub const RESTART_DELAY_MS: f64 = 100.0;
    /// Delay before the first run starts on its own
    pub const AUTO_START_DELAY_MS: f64 = 2000.0;

    /// Default live particle cap
    pub const MAX_PARTICLES: usize = 500;
    /// Particles smaller than this are evicted
    pub const MIN_PARTICLE_SIZE: f32 = 0.5;
}
