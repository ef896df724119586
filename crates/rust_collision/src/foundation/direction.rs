//! Cardinal movement directions

use super::math::normalize_angle;
use serde::{Deserialize, Serialize};

/// One of the four screen directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// +Y
    Down,
    /// +X
    Right,
    /// -Y
    Up,
    /// -X
    Left,
    /// No particular direction
    #[default]
    Undefined,
}

impl Direction {
    /// The angle in degrees this direction points at.
    ///
    /// `Undefined` maps to 0°.
    pub const fn to_angle(self) -> f64 {
        match self {
            Self::Down | Self::Undefined => 0.0,
            Self::Right => 90.0,
            Self::Up => 180.0,
            Self::Left => 270.0,
        }
    }

    /// The direction closest to an angle in degrees
    pub fn from_angle(angle: f64) -> Self {
        let angle = normalize_angle(angle);
        if !(45.0..315.0).contains(&angle) {
            Self::Down
        } else if angle < 135.0 {
            Self::Right
        } else if angle < 225.0 {
            Self::Up
        } else {
            Self::Left
        }
    }

    /// The direction pointing the other way
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Undefined => Self::Undefined,
        }
    }
}
