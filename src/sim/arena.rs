//! Canvas bounds the simulation lives in

use serde::{Deserialize, Serialize};

use crate::consts::FLOOR_OFFSET;
use crate::error::SimError;

/// Canvas dimensions plus the floor line, supplied when a scene is built
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub floor_offset: f32,
}

impl Arena {
    /// Arena with the standard floor offset
    pub fn new(width: f32, height: f32) -> Result<Self, SimError> {
        Self::with_floor_offset(width, height, FLOOR_OFFSET)
    }

    pub fn with_floor_offset(width: f32, height: f32, floor_offset: f32) -> Result<Self, SimError> {
        let valid = width.is_finite()
            && height.is_finite()
            && floor_offset.is_finite()
            && width > 0.0
            && floor_offset >= 0.0
            && height > floor_offset;
        if !valid {
            return Err(SimError::InvalidArena { width, height });
        }
        Ok(Self {
            width,
            height,
            floor_offset,
        })
    }

    /// y coordinate of the floor line
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.height - self.floor_offset
    }
}
