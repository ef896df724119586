//! Collision capabilities an entity exposes to the physics engine
//!
//! The engine never owns game objects. It only sees them through
//! [`CollisionEntity`] (anything that blocks movement) and [`MobileEntity`]
//! (anything the movement resolver can relocate). Implementations are shared
//! between the registry and gameplay code, so every method takes `&self` and
//! mutation goes through interior mutability.

use super::id::EntityId;
use crate::foundation::math::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Partition key used to scope collision queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionClass {
    /// Never collides and is never registered
    None,
    /// Level geometry and other objects that do not move on their own
    #[default]
    Static,
    /// Creatures, projectiles and other moving objects
    Dynamic,
    /// Query-only bucket matching every registered entity. Not assignable.
    Any,
}

impl CollisionClass {
    /// Whether an entity may carry this class
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::Any)
    }

    /// Whether entities of this class take part in collision at all
    pub const fn is_registrable(self) -> bool {
        matches!(self, Self::Static | Self::Dynamic)
    }
}

/// Notification that a movement was blocked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionEvent {
    /// The entity whose movement was resolved
    pub collider: EntityId,
    /// The entities it ran into
    pub involved: Vec<EntityId>,
}

impl CollisionEvent {
    /// Event delivered to the moving entity, naming everything it hit
    pub fn new(collider: EntityId, involved: Vec<EntityId>) -> Self {
        Self { collider, involved }
    }

    /// Event delivered to an obstacle, naming only the mover
    pub fn reciprocal(collider: EntityId) -> Self {
        Self {
            collider,
            involved: Vec::new(),
        }
    }
}

/// Anything that can block movement
pub trait CollisionEntity: Send + Sync {
    /// Identity of this entity
    fn id(&self) -> EntityId;

    /// The current collision box in world space
    fn collision_box(&self) -> Rect;

    /// Which bucket of the registry this entity lives in
    fn collision_class(&self) -> CollisionClass;

    /// Whether collision is currently enabled.
    ///
    /// Implementations should report `false` for degenerate boxes.
    fn has_collision(&self) -> bool;

    /// Pairwise filter: return `false` to pass through `other`
    /// (e.g. a shooter ignoring its own projectiles)
    fn can_collide_with(&self, _other: &dyn CollisionEntity) -> bool {
        true
    }

    /// Called when a movement involving this entity was blocked
    fn on_collision(&self, _event: &CollisionEvent) {}

    /// Center of the current collision box
    fn collision_box_center(&self) -> Point {
        self.collision_box().center()
    }
}

/// An entity the movement resolver can relocate
pub trait MobileEntity: CollisionEntity {
    /// Top-left corner of the visual box
    fn location(&self) -> Point;

    /// Move the visual box (and with it the collision box)
    fn set_location(&self, location: Point);

    /// Size of the visual box
    fn size(&self) -> Vec2;

    /// Size of the collision box
    fn collision_box_size(&self) -> Vec2;

    /// Offset of the collision box relative to the visual box's top-left corner
    fn collision_box_offset(&self) -> Vec2;

    /// Facing angle in degrees
    fn angle(&self) -> f64;

    /// Change the facing angle
    fn set_angle(&self, angle: f64);

    /// Whether the entity turns toward the target of every move
    fn turn_on_move(&self) -> bool {
        false
    }

    /// The collision box this entity would have at `location`
    fn collision_box_at(&self, location: Point) -> Rect {
        let size = self.collision_box_size();
        Rect::at(location + self.collision_box_offset(), size.x, size.y)
    }
}
