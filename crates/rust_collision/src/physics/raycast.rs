//! Raycasting against the registered collision boxes

use super::engine::PhysicsEngine;
use super::registry::EntityRef;
use crate::core::config::RaycastPolicy;
use crate::entities::{CollisionClass, CollisionEntity};
use crate::foundation::math::{clip_parametric, passes_interior, Line, Point, Rect, Vec2};
use std::fmt;

/// A ray with a unit direction, limited to `length` units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Where the ray starts
    pub origin: Point,
    /// Unit direction, or zero for a degenerate ray
    pub direction: Vec2,
    /// Reach of the ray, may be infinite
    pub length: f64,
}

impl Ray {
    /// A ray along `angle` degrees
    pub fn new(origin: Point, angle: f64, length: f64) -> Self {
        let radians = angle.to_radians();
        Self {
            origin,
            direction: Vec2::new(radians.sin(), radians.cos()),
            length,
        }
    }

    /// A ray covering a segment
    pub fn from_line(line: &Line) -> Self {
        let length = line.length();
        let direction = if length > 0.0 {
            line.delta() / length
        } else {
            Vec2::zeros()
        };

        Self {
            origin: line.start,
            direction,
            length,
        }
    }

    /// Point `distance` units along the ray
    pub fn point_at(&self, distance: f64) -> Point {
        self.origin + self.direction * distance
    }

    /// Distance from the origin to the closest point where the ray meets the
    /// boundary of `rect`, if the ray passes through its interior.
    ///
    /// A ray starting inside the box reports where it leaves the box, or
    /// distance zero when it ends before leaving.
    pub fn hit_distance(&self, rect: &Rect) -> Option<f64> {
        let (enter, exit) = clip_parametric(&self.origin, &self.direction, self.length, rect)?;
        let probe = if exit.is_finite() { (enter + exit) * 0.5 } else { enter };
        if !passes_interior(rect, &self.point_at(probe)) {
            return None;
        }

        if enter > 0.0 {
            Some(enter)
        } else if passes_interior(rect, &self.origin) && exit < self.length {
            Some(exit)
        } else {
            Some(0.0)
        }
    }
}

/// Result of a successful raycast
#[derive(Clone)]
pub struct RaycastHit {
    /// Where the ray met the box
    pub point: Point,
    /// The entity owning the box
    pub entity: EntityRef,
    /// Distance from the ray origin to `point`
    pub distance: f64,
}

impl fmt::Debug for RaycastHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RaycastHit")
            .field("point", &self.point)
            .field("entity", &self.entity.id())
            .field("distance", &self.distance)
            .finish()
    }
}

impl PhysicsEngine {
    /// Cast a ray from `origin` along `angle` degrees.
    ///
    /// The ray reaches as far as the diagonal of the world bound, or
    /// indefinitely when no bound is set.
    pub fn raycast(&self, origin: Point, angle: f64) -> Option<RaycastHit> {
        let length = self.bound().map_or(f64::INFINITY, |bound| bound.diagonal());
        self.cast(&Ray::new(origin, angle, length), CollisionClass::Any, None::<&dyn CollisionEntity>)
    }

    /// Cast a ray from `origin` to `target`
    pub fn raycast_to(&self, origin: Point, target: Point) -> Option<RaycastHit> {
        self.raycast_line(&Line::new(origin, target), CollisionClass::Any)
    }

    /// Cast a ray along a segment, considering only entities of `class`
    pub fn raycast_line(&self, line: &Line, class: CollisionClass) -> Option<RaycastHit> {
        self.cast(&Ray::from_line(line), class, None::<&dyn CollisionEntity>)
    }

    /// [`raycast_line`](Self::raycast_line) on behalf of an entity, which is
    /// never hit by its own ray
    pub fn raycast_line_for<A>(&self, line: &Line, class: CollisionClass, asking: &A) -> Option<RaycastHit>
    where
        A: CollisionEntity + ?Sized,
    {
        self.cast(&Ray::from_line(line), class, Some(asking))
    }

    fn cast<A>(&self, ray: &Ray, class: CollisionClass, asking: Option<&A>) -> Option<RaycastHit>
    where
        A: CollisionEntity + ?Sized,
    {
        let mut hits = self.candidates(class, asking).filter_map(|collider| {
            ray.hit_distance(&collider.bounds).map(|distance| RaycastHit {
                point: ray.point_at(distance),
                entity: collider.entity,
                distance,
            })
        });

        match self.config().raycast_policy {
            RaycastPolicy::FirstCandidate => hits.next(),
            RaycastPolicy::Nearest => hits.fold(None, |nearest: Option<RaycastHit>, hit| match nearest {
                Some(nearest) if nearest.distance <= hit.distance => Some(nearest),
                _ => Some(hit),
            }),
        }
    }
}
