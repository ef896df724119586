//! Physics module for collision detection and movement resolution
//!
//! Provides the collision registry, point/rect/line queries, raycasts and the
//! axis-separated movement resolver, all reached through [`PhysicsEngine`].

pub mod engine;
pub mod force;
pub mod intersection;
pub mod query;
pub mod raycast;
pub mod registry;
pub mod resolver;

pub use engine::PhysicsEngine;
pub use force::{Force, ForceSet};
pub use intersection::Intersection;
pub use raycast::{Ray, RaycastHit};
pub use registry::{Collider, CollisionRegistry, EntityRef};
