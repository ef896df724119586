//! # Core Module
//!
//! Settings shared by every part of the collision core.

pub mod config;

pub use config::{Config, ConfigError, PhysicsConfig, RaycastPolicy};
