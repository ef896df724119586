//! Placement of a collision box inside an entity's visual box
//!
//! An entity's collision box is usually smaller than its sprite (a character's
//! feet, not its hat). [`Align`] and [`Valign`] describe where along each axis
//! the collision box sits.

use serde::{Deserialize, Serialize};

/// Offset of an object of size `object` at `portion` of a container of size `size`.
///
/// Objects larger than their container overflow symmetrically; smaller ones
/// are kept inside `[0, size - object]`.
fn aligned_offset(portion: f64, size: f64, object: f64) -> f64 {
    let location = size * portion - object / 2.0;
    if object > size {
        return location;
    }

    location.clamp(0.0, size - object)
}

/// Horizontal alignment of a collision box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    /// Flush with the left edge
    Left,
    /// Centered
    #[default]
    Center,
    /// Flush with the right edge
    Right,
    /// A quarter of the width from the left
    CenterLeft,
    /// Three quarters of the width from the left
    CenterRight,
}

impl Align {
    /// Relative position along the width
    pub const fn portion(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
            Self::CenterLeft => 0.25,
            Self::CenterRight => 0.75,
        }
    }

    /// Horizontal offset of an object of width `object` inside `width`
    pub fn offset(self, width: f64, object: f64) -> f64 {
        aligned_offset(self.portion(), width, object)
    }
}

/// Vertical alignment of a collision box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Valign {
    /// Flush with the top edge
    Top,
    /// Centered
    Middle,
    /// Flush with the bottom edge
    #[default]
    Down,
    /// A quarter of the height from the top
    MiddleTop,
    /// Three quarters of the height from the top
    MiddleDown,
}

impl Valign {
    /// Relative position along the height
    pub const fn portion(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Middle => 0.5,
            Self::Down => 1.0,
            Self::MiddleTop => 0.25,
            Self::MiddleDown => 0.75,
        }
    }

    /// Vertical offset of an object of height `object` inside `height`
    pub fn offset(self, height: f64, object: f64) -> f64 {
        aligned_offset(self.portion(), height, object)
    }
}
