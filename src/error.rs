//! Error types for the simulation's configuration boundaries.
//!
//! The physics itself never fails; these cover the inputs a host hands in:
//! weight names coming from the UI or the command line, and canvas sizes.

use std::fmt;

/// Errors raised when the simulation is handed an invalid configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A weight name that is not one of light, medium or heavy.
    UnknownWeight(String),
    /// Canvas dimensions that cannot hold a scene.
    InvalidArena { width: f32, height: f32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownWeight(name) => write!(
                f,
                "Unknown weight category '{}'. Expected one of: light, medium, heavy",
                name
            ),
            SimError::InvalidArena { width, height } => write!(
                f,
                "Invalid arena size {}x{}. Width must be positive and height must clear the floor offset",
                width, height
            ),
        }
    }
}

impl std::error::Error for SimError {}
