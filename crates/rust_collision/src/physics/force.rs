//! Directional forces
//!
//! A [`Force`] pulls an entity toward a point at a fixed speed until it is
//! reached, cancelled or the entity runs into something. A [`ForceSet`] holds
//! the forces acting on one entity and moves it through the resolver once
//! per tick.

use super::engine::PhysicsEngine;
use crate::entities::MobileEntity;
use crate::foundation::math::{delta_x, delta_y, rotation_angle, Point, Rect, Vec2};
use log::trace;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A pull toward a point
#[derive(Debug)]
pub struct Force {
    location: Point,
    strength: f64,
    size: f64,
    cancel_on_collision: bool,
    cancel_on_reached: bool,
    identifier: Option<String>,
    ended: AtomicBool,
}

impl Force {
    /// A force pulling toward `location` at `strength` units per second.
    ///
    /// `size` is the diameter of the circle around `location` that counts as
    /// reached.
    pub fn new(location: Point, strength: f64, size: f64) -> Self {
        Self {
            location,
            strength,
            size,
            cancel_on_collision: true,
            cancel_on_reached: true,
            identifier: None,
            ended: AtomicBool::new(false),
        }
    }

    /// Name the force so it can be looked up in a [`ForceSet`]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Whether the force ends when the entity is blocked
    pub fn with_cancel_on_collision(mut self, cancel: bool) -> Self {
        self.cancel_on_collision = cancel;
        self
    }

    /// Whether the force ends once the entity reaches its location
    pub fn with_cancel_on_reached(mut self, cancel: bool) -> Self {
        self.cancel_on_reached = cancel;
        self
    }

    /// Target point
    pub fn location(&self) -> Point {
        self.location
    }

    /// Speed in units per second
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Diameter of the reach circle
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Name of the force, if any
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Whether the force ends when the entity is blocked
    pub fn cancel_on_collision(&self) -> bool {
        self.cancel_on_collision
    }

    /// Whether the force ends once the entity reaches its location
    pub fn cancel_on_reached(&self) -> bool {
        self.cancel_on_reached
    }

    /// Stop the force; it is dropped on the next update
    pub fn end(&self) {
        self.ended.store(true, Ordering::Release);
    }

    /// Whether the force was stopped
    pub fn has_ended(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    /// Whether the reach circle overlaps the entity's collision box
    pub fn has_reached<E: MobileEntity + ?Sized>(&self, entity: &E) -> bool {
        circle_intersects(self.location, self.size * 0.5, &entity.collision_box())
    }

    /// Displacement this force causes over `delta`, starting from `from`
    fn displacement(&self, from: Point, delta: Duration) -> Vec2 {
        let angle = rotation_angle(from, self.location);
        let distance = delta.as_secs_f64() * self.strength;
        Vec2::new(delta_x(angle, distance), delta_y(angle, distance))
    }
}

/// Whether a circle overlaps the interior of a rectangle
fn circle_intersects(center: Point, radius: f64, rect: &Rect) -> bool {
    if radius <= 0.0 || rect.is_empty() {
        return false;
    }

    let closest = Point::new(
        center.x.clamp(rect.min_x(), rect.max_x()),
        center.y.clamp(rect.min_y(), rect.max_y()),
    );
    (closest - center).magnitude_squared() < radius * radius
}

/// The forces acting on one entity
#[derive(Debug, Default)]
pub struct ForceSet {
    forces: Vec<Arc<Force>>,
}

impl ForceSet {
    /// An empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start applying a force. Applying the same force twice has no effect.
    pub fn apply(&mut self, force: Arc<Force>) {
        if self.forces.iter().any(|active| Arc::ptr_eq(active, &force)) {
            return;
        }

        self.forces.push(force);
    }

    /// The first active force with the given identifier
    pub fn get(&self, identifier: &str) -> Option<Arc<Force>> {
        self.forces
            .iter()
            .find(|force| force.identifier() == Some(identifier))
            .cloned()
    }

    /// Forces currently held, ended ones included until the next update
    pub fn forces(&self) -> &[Arc<Force>] {
        &self.forces
    }

    /// Whether no force is held
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Move `entity` by the combined pull of all forces over `delta`.
    ///
    /// Returns the result of the move, or `true` if nothing had to move.
    pub fn update<E: MobileEntity + ?Sized>(&mut self, engine: &PhysicsEngine, entity: &E, delta: Duration) -> bool {
        self.forces.retain(|force| !force.has_ended());
        if self.forces.is_empty() {
            return true;
        }

        let center = entity.collision_box_center();
        let mut combined = Vec2::zeros();
        let mut pulling = false;
        for force in &self.forces {
            if force.cancel_on_reached() && force.has_reached(entity) {
                force.end();
                continue;
            }

            combined += force.displacement(center, delta);
            pulling = true;
        }

        if !pulling {
            return true;
        }

        let moved = engine.move_to(entity, entity.location() + combined);
        if !moved {
            trace!("Forces on {} blocked", entity.id());
            self.forces
                .iter()
                .filter(|force| force.cancel_on_collision())
                .for_each(|force| force.end());
        }

        moved
    }
}
