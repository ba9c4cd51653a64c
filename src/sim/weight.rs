//! Weight categories and their physics tuning
//!
//! The table is the single source of the per-weight calibration values; every
//! weight-dependent branch in the sim reads from it or matches on the category.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// Weight category selected by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightCategory {
    #[default]
    Light,
    Medium,
    Heavy,
}

/// Physics tuning for one weight category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub mass: f32,
    pub gravity_multiplier: f32,
    pub bounce_multiplier: f32,
    pub can_break_platform: bool,
}

const LIGHT: WeightProfile = WeightProfile {
    mass: 0.4,
    gravity_multiplier: 0.6,
    bounce_multiplier: 1.2,
    can_break_platform: false,
};

const MEDIUM: WeightProfile = WeightProfile {
    mass: 1.5,
    gravity_multiplier: 1.2,
    bounce_multiplier: 0.0,
    can_break_platform: false,
};

const HEAVY: WeightProfile = WeightProfile {
    mass: 2.2,
    gravity_multiplier: 1.8,
    bounce_multiplier: 0.05,
    can_break_platform: true,
};

/// Look up the tuning for a category
pub fn profile_for(category: WeightCategory) -> &'static WeightProfile {
    match category {
        WeightCategory::Light => &LIGHT,
        WeightCategory::Medium => &MEDIUM,
        WeightCategory::Heavy => &HEAVY,
    }
}

impl WeightCategory {
    pub const ALL: [WeightCategory; 3] = [
        WeightCategory::Light,
        WeightCategory::Medium,
        WeightCategory::Heavy,
    ];

    pub fn profile(self) -> &'static WeightProfile {
        profile_for(self)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeightCategory::Light => "light",
            WeightCategory::Medium => "medium",
            WeightCategory::Heavy => "heavy",
        }
    }

    /// Human-facing label for buttons and logs
    pub fn label(&self) -> &'static str {
        match self {
            WeightCategory::Light => "Light",
            WeightCategory::Medium => "Medium",
            WeightCategory::Heavy => "Heavy",
        }
    }
}

impl fmt::Display for WeightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeightCategory {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(WeightCategory::Light),
            "medium" => Ok(WeightCategory::Medium),
            "heavy" => Ok(WeightCategory::Heavy),
            _ => Err(SimError::UnknownWeight(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_table() {
        let light = profile_for(WeightCategory::Light);
        assert_eq!(light.mass, 0.4);
        assert_eq!(light.gravity_multiplier, 0.6);
        assert_eq!(light.bounce_multiplier, 1.2);
        assert!(!light.can_break_platform);

        let medium = profile_for(WeightCategory::Medium);
        assert_eq!(medium.mass, 1.5);
        assert_eq!(medium.gravity_multiplier, 1.2);
        assert_eq!(medium.bounce_multiplier, 0.0);
        assert!(!medium.can_break_platform);

        let heavy = profile_for(WeightCategory::Heavy);
        assert_eq!(heavy.mass, 2.2);
        assert_eq!(heavy.gravity_multiplier, 1.8);
        assert_eq!(heavy.bounce_multiplier, 0.05);
        assert!(heavy.can_break_platform);
    }

    #[test]
    fn test_parse_weight_names() {
        assert_eq!("light".parse::<WeightCategory>(), Ok(WeightCategory::Light));
        assert_eq!(" Medium ".parse::<WeightCategory>(), Ok(WeightCategory::Medium));
        assert_eq!("HEAVY".parse::<WeightCategory>(), Ok(WeightCategory::Heavy));
    }

    #[test]
    fn test_unknown_weight_fails_fast() {
        let err = "feather".parse::<WeightCategory>().unwrap_err();
        assert_eq!(err, SimError::UnknownWeight("feather".into()));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for category in WeightCategory::ALL {
            assert_eq!(category.to_string().parse::<WeightCategory>(), Ok(category));
        }
    }
}
