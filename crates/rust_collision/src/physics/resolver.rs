//! Movement resolution
//!
//! Every move reduces to [`PhysicsEngine::move_to`]:
//!
//! 1. turn toward the target if the entity wants to
//! 2. clamp the target so the collision box stays inside the world bound
//! 3. entities without collision just move
//! 4. if the box at the target overlaps something, resolve the X axis and
//!    then the Y axis separately so the entity slides along walls, notify
//!    everyone involved and report failure
//! 5. refuse moves whose path jumps over an obstacle
//! 6. otherwise commit the target

use super::engine::PhysicsEngine;
use super::intersection::Intersection;
use super::registry::EntityRef;
use crate::entities::{CollisionClass, CollisionEvent, MobileEntity};
use crate::foundation::direction::Direction;
use crate::foundation::math::{project, project_toward, rotation_angle, Line, Point, Rect};
use log::trace;

/// Clamp a target location so the entity's collision box stays inside `bound`
fn clamp_to_bound<E: MobileEntity + ?Sized>(entity: &E, target: Point, bound: &Rect) -> Point {
    let offset = entity.collision_box_offset();
    let size = entity.collision_box_size();

    let min_x = bound.min_x() - offset.x;
    let max_x = bound.max_x() - size.x - offset.x;
    let min_y = bound.min_y() - offset.y;
    let max_y = bound.max_y() - size.y - offset.y;

    // lower bound wins when the box is wider than the world
    Point::new(min_x.max(max_x.min(target.x)), min_y.max(max_y.min(target.y)))
}

impl PhysicsEngine {
    /// Move an entity to `target`, resolving collisions on the way.
    ///
    /// Returns `true` if the entity ended up exactly at the (bound-clamped)
    /// target, `false` if the move was blocked. A blocked move may still
    /// relocate the entity as far as it can slide.
    pub fn move_to<E: MobileEntity + ?Sized>(&self, entity: &E, target: Point) -> bool {
        if entity.turn_on_move() {
            entity.set_angle(rotation_angle(entity.location(), target));
        }

        let target = match self.bound() {
            Some(bound) if !bound.contains_rect(&entity.collision_box_at(target)) => {
                clamp_to_bound(entity, target, &bound)
            }
            _ => target,
        };

        if !entity.has_collision() {
            entity.set_location(target);
            return true;
        }

        if self.collides_rect_for(&entity.collision_box_at(target), CollisionClass::Any, entity) {
            let resolved = self.resolve_collision(entity, target);
            trace!("Move of {} to {:?} blocked, resolved to {:?}", entity.id(), target, resolved);
            entity.set_location(resolved);
            return false;
        }

        if self.config().tunneling_safeguard && self.sweeps_through_obstacle(entity, target) {
            trace!("Move of {} to {:?} would tunnel through an obstacle", entity.id(), target);
            return false;
        }

        entity.set_location(target);
        true
    }

    /// Move an entity `distance` units along `angle` (degrees)
    pub fn move_by_angle<E: MobileEntity + ?Sized>(&self, entity: &E, angle: f64, distance: f64) -> bool {
        self.move_to(entity, project(entity.location(), angle, distance))
    }

    /// Move an entity `distance` units in a cardinal direction
    pub fn move_in_direction<E: MobileEntity + ?Sized>(
        &self,
        entity: &E,
        direction: Direction,
        distance: f64,
    ) -> bool {
        self.move_by_angle(entity, direction.to_angle(), distance)
    }

    /// Move an entity `distance` units toward a point
    pub fn move_toward<E: MobileEntity + ?Sized>(&self, entity: &E, target: Point, distance: f64) -> bool {
        self.move_to(entity, project_toward(entity.location(), target, distance))
    }

    /// Move an entity `distance` units along its facing angle
    pub fn move_forward<E: MobileEntity + ?Sized>(&self, entity: &E, distance: f64) -> bool {
        self.move_by_angle(entity, entity.angle(), distance)
    }

    /// Push the target back out of every obstacle, X axis first
    fn resolve_collision<E: MobileEntity + ?Sized>(&self, entity: &E, target: Point) -> Point {
        let current = entity.location();
        let current_box = entity.collision_box();

        let mut resolved = Point::new(target.x, current.y);
        let box_x = entity.collision_box_at(resolved);
        let intersection_x = self.intersection(&box_x, entity);
        if let Some(intersection) = &intersection_x {
            resolved.x = if current_box.min_x() < box_x.min_x() {
                // moved right; push back by the penetration depth, not the overlap width
                (resolved.x - (box_x.max_x() - intersection.bounds.min_x())).max(current.x)
            } else {
                (resolved.x + (intersection.bounds.max_x() - box_x.min_x())).min(current.x)
            };
        }

        resolved.y = target.y;
        let box_y = entity.collision_box_at(resolved);
        let intersection_y = self.intersection(&box_y, entity);
        if let Some(intersection) = &intersection_y {
            resolved.y = if current_box.min_y() < box_y.min_y() {
                // moved down; push back up by the penetration depth
                (resolved.y - (box_y.max_y() - intersection.bounds.min_y())).max(current.y)
            } else {
                (resolved.y + (intersection.bounds.max_y() - box_y.min_y())).min(current.y)
            };
        }

        fire_collision_events(entity, [intersection_x, intersection_y]);
        resolved
    }

    /// Whether the path between the current and the target box centers
    /// crosses an obstacle
    fn sweeps_through_obstacle<E: MobileEntity + ?Sized>(&self, entity: &E, target: Point) -> bool {
        let path = Line::new(entity.collision_box_center(), entity.collision_box_at(target).center());
        self.line_query(&path, CollisionClass::Any, Some(entity))
    }
}

/// Notify the mover about everything it ran into and every obstacle about
/// the mover
fn fire_collision_events<E, I>(collider: &E, intersections: I)
where
    E: MobileEntity + ?Sized,
    I: IntoIterator<Item = Option<Intersection>>,
{
    let mut involved: Vec<EntityRef> = Vec::new();
    for entity in intersections.into_iter().flatten().flat_map(|intersection| intersection.involved) {
        if !involved.iter().any(|known| known.id() == entity.id()) {
            involved.push(entity);
        }
    }

    if involved.is_empty() {
        return;
    }

    let event = CollisionEvent::new(collider.id(), involved.iter().map(|entity| entity.id()).collect());
    collider.on_collision(&event);

    let reciprocal = CollisionEvent::reciprocal(collider.id());
    for entity in &involved {
        entity.on_collision(&reciprocal);
    }
}
