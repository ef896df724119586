//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Planar math types and the angle convention
//! - Collision box alignment
//! - Cardinal directions
//! - Logging utilities

pub mod align;
pub mod direction;
pub mod logging;
pub mod math;
