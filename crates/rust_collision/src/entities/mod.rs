//! Entities as the collision core sees them

pub mod body;
pub mod collision;
pub mod id;

pub use body::{Body, CollisionFilter, CollisionListener};
pub use collision::{CollisionClass, CollisionEntity, CollisionEvent, MobileEntity};
pub use id::EntityId;
