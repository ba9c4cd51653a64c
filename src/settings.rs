//! Display and simulation preferences
//!
//! Held in memory for the lifetime of the page; every load starts from the
//! defaults with a light ball.

use crate::consts::{AUTO_START_DELAY_MS, RESTART_DELAY_MS};
use crate::sim::SimConfig;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }

    /// Whether the ball gets its granite texture (flat shading otherwise)
    pub fn textured_ball(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Start the first run without waiting for the start button
    pub auto_start: bool,
    /// Ghost images behind the ball
    pub trails: bool,
    /// Impact particles
    pub particles: bool,
    /// Fragments when a heavy ball breaks a platform
    pub break_debris: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            auto_start: true,
            trails: true,
            particles: true,
            break_debris: false,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Simulation tunables implied by these preferences
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            restart_delay_ms: RESTART_DELAY_MS,
            auto_start_delay_ms: self.auto_start.then_some(AUTO_START_DELAY_MS),
            max_particles: self.max_particles(),
            break_debris: self.break_debris,
        }
    }
}
