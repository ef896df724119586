//! # Rust Collision
//!
//! The collision and movement resolution core of a 2D game engine.
//!
//! ## Features
//!
//! - **Collision Registry**: collidable entities partitioned by collision class
//! - **Queries**: point, rectangle, line and entity collision checks
//! - **Movement Resolver**: axis-separated push-out so entities slide along walls
//! - **Raycasts**: nearest hit along a ray or segment
//! - **Forces**: simple pulls toward a point, routed through the resolver
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_collision::prelude::*;
//! use std::sync::Arc;
//!
//! let engine = PhysicsEngine::new();
//! engine.set_bound(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
//! engine.add(Arc::new(Body::static_box(Rect::new(50.0, 0.0, 10.0, 100.0))));
//!
//! let player = Arc::new(Body::new(0.0, 40.0, 10.0, 10.0));
//! engine.add(player.clone());
//!
//! // once per tick
//! engine.update();
//!
//! assert!(engine.move_to(player.as_ref(), Point::new(20.0, 40.0)));
//! assert!(!engine.move_to(player.as_ref(), Point::new(45.0, 40.0)));
//! assert_eq!(player.location(), Point::new(40.0, 40.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod core;
pub mod entities;
pub mod foundation;
pub mod physics;

pub use crate::core::config::{PhysicsConfig, RaycastPolicy};
pub use physics::PhysicsEngine;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::{PhysicsConfig, RaycastPolicy},
        entities::{Body, CollisionClass, CollisionEntity, CollisionEvent, EntityId, MobileEntity},
        foundation::{
            align::{Align, Valign},
            direction::Direction,
            math::{Line, Point, Rect, Vec2},
        },
        physics::{Force, ForceSet, PhysicsEngine, RaycastHit},
    };
}
