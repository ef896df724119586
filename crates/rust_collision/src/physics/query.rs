//! Collision queries
//!
//! Every query comes in three flavours: a short form that checks against all
//! registered entities, an `_in` form scoped to one [`CollisionClass`], and a
//! `_for` form asked on behalf of an entity. The asking entity never collides
//! with itself and its [`can_collide_with`](CollisionEntity::can_collide_with)
//! filter is honoured.

use super::engine::PhysicsEngine;
use super::intersection::Intersection;
use crate::entities::{CollisionClass, CollisionEntity};
use crate::foundation::math::{Line, Point, Rect};

impl PhysicsEngine {
    /// Whether a point lies outside the world bound or inside any collision box
    pub fn collides_point(&self, point: Point) -> bool {
        self.point_query(point, CollisionClass::Any, None::<&dyn CollisionEntity>)
    }

    /// [`collides_point`](Self::collides_point) scoped to one class
    pub fn collides_point_in(&self, point: Point, class: CollisionClass) -> bool {
        self.point_query(point, class, None::<&dyn CollisionEntity>)
    }

    /// [`collides_point`](Self::collides_point) asked on behalf of an entity
    pub fn collides_point_for<A>(&self, point: Point, class: CollisionClass, asking: &A) -> bool
    where
        A: CollisionEntity + ?Sized,
    {
        self.point_query(point, class, Some(asking))
    }

    /// Whether a rectangle lies entirely outside the world bound or overlaps
    /// any collision box
    pub fn collides_rect(&self, rect: &Rect) -> bool {
        self.rect_query(rect, CollisionClass::Any, None::<&dyn CollisionEntity>)
    }

    /// [`collides_rect`](Self::collides_rect) scoped to one class
    pub fn collides_rect_in(&self, rect: &Rect, class: CollisionClass) -> bool {
        self.rect_query(rect, class, None::<&dyn CollisionEntity>)
    }

    /// [`collides_rect`](Self::collides_rect) asked on behalf of an entity
    pub fn collides_rect_for<A>(&self, rect: &Rect, class: CollisionClass, asking: &A) -> bool
    where
        A: CollisionEntity + ?Sized,
    {
        self.rect_query(rect, class, Some(asking))
    }

    /// Whether a segment passes through any collision box.
    ///
    /// The world bound plays no part in line queries.
    pub fn collides_line(&self, line: &Line) -> bool {
        self.line_query(line, CollisionClass::Any, None::<&dyn CollisionEntity>)
    }

    /// [`collides_line`](Self::collides_line) scoped to one class
    pub fn collides_line_in(&self, line: &Line, class: CollisionClass) -> bool {
        self.line_query(line, class, None::<&dyn CollisionEntity>)
    }

    /// [`collides_line`](Self::collides_line) asked on behalf of an entity
    pub fn collides_line_for<A>(&self, line: &Line, class: CollisionClass, asking: &A) -> bool
    where
        A: CollisionEntity + ?Sized,
    {
        self.line_query(line, class, Some(asking))
    }

    /// Whether an entity's current collision box collides with anything of
    /// `class` other than itself
    pub fn collides_entity<E>(&self, entity: &E, class: CollisionClass) -> bool
    where
        E: CollisionEntity + ?Sized,
    {
        self.rect_query(&entity.collision_box(), class, Some(entity))
    }

    /// Overlap of `rect` with every eligible box, used by the movement resolver
    pub(crate) fn intersection<A>(&self, rect: &Rect, asking: &A) -> Option<Intersection>
    where
        A: CollisionEntity + ?Sized,
    {
        Intersection::collect(self.candidates(CollisionClass::Any, Some(asking)).filter_map(|collider| {
            collider
                .bounds
                .intersection(rect)
                .map(|overlap| (overlap, collider.entity))
        }))
    }

    fn point_query<A>(&self, point: Point, class: CollisionClass, asking: Option<&A>) -> bool
    where
        A: CollisionEntity + ?Sized,
    {
        if self.bound().is_some_and(|bound| !bound.contains_point(&point)) {
            return true;
        }

        self.candidates(class, asking)
            .any(|collider| collider.bounds.contains_point(&point))
    }

    fn rect_query<A>(&self, rect: &Rect, class: CollisionClass, asking: Option<&A>) -> bool
    where
        A: CollisionEntity + ?Sized,
    {
        if self.bound().is_some_and(|bound| !bound.intersects(rect)) {
            return true;
        }

        self.candidates(class, asking)
            .any(|collider| collider.bounds.intersects(rect))
    }

    pub(crate) fn line_query<A>(&self, line: &Line, class: CollisionClass, asking: Option<&A>) -> bool
    where
        A: CollisionEntity + ?Sized,
    {
        self.candidates(class, asking)
            .any(|collider| line.intersects_rect(&collider.bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Body;
    use std::sync::Arc;

    fn engine_with_wall() -> (PhysicsEngine, Arc<Body>) {
        let engine = PhysicsEngine::new();
        let wall = Arc::new(Body::static_box(Rect::new(10.0, 10.0, 10.0, 10.0)));
        engine.add(wall.clone());
        engine.update();
        (engine, wall)
    }

    #[test]
    fn test_point_query() {
        let (engine, _) = engine_with_wall();

        assert!(engine.collides_point(Point::new(10.0, 10.0)));
        assert!(engine.collides_point(Point::new(15.0, 15.0)));
        assert!(!engine.collides_point(Point::new(20.0, 15.0)));
        assert!(!engine.collides_point(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_rect_query_touching_is_free() {
        let (engine, _) = engine_with_wall();

        assert!(!engine.collides_rect(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(engine.collides_rect(&Rect::new(0.0, 10.0, 10.5, 10.0)));
    }

    #[test]
    fn test_class_scoping() {
        let (engine, _) = engine_with_wall();
        let probe = Rect::new(12.0, 12.0, 2.0, 2.0);

        assert!(engine.collides_rect_in(&probe, CollisionClass::Static));
        assert!(!engine.collides_rect_in(&probe, CollisionClass::Dynamic));
        assert!(!engine.collides_rect_in(&probe, CollisionClass::None));
    }

    #[test]
    fn test_bound_counts_as_collision() {
        let (engine, _) = engine_with_wall();
        engine.set_bound(Some(Rect::new(0.0, 0.0, 100.0, 100.0)));

        assert!(engine.collides_point(Point::new(-1.0, 50.0)));
        assert!(engine.collides_point(Point::new(100.0, 50.0)));
        assert!(engine.collides_rect(&Rect::new(200.0, 200.0, 5.0, 5.0)));
        // partially outside still intersects the bound
        assert!(!engine.collides_rect(&Rect::new(95.0, 50.0, 10.0, 5.0)));
        // lines ignore the bound
        assert!(!engine.collides_line(&Line::from_coords(-50.0, 50.0, -10.0, 50.0)));
    }

    #[test]
    fn test_entity_never_collides_with_itself() {
        let (engine, wall) = engine_with_wall();

        assert!(!engine.collides_entity(wall.as_ref(), CollisionClass::Any));
        assert!(engine.collides_rect(&wall.collision_box()));
    }

    #[test]
    fn test_disabled_entity_is_ignored() {
        let (engine, wall) = engine_with_wall();
        wall.set_collision(false);

        assert!(!engine.collides_point(Point::new(15.0, 15.0)));
    }

    #[test]
    fn test_line_query() {
        let (engine, wall) = engine_with_wall();

        assert!(engine.collides_line(&Line::from_coords(0.0, 0.0, 30.0, 30.0)));
        assert!(!engine.collides_line(&Line::from_coords(0.0, 20.0, 30.0, 20.0)));
        assert!(!engine.collides_line_for(&Line::from_coords(0.0, 0.0, 30.0, 30.0), CollisionClass::Any, wall.as_ref()));
    }

    #[test]
    fn test_intersection_for_resolver() {
        let (engine, wall) = engine_with_wall();
        let other = Arc::new(Body::static_box(Rect::new(20.0, 5.0, 5.0, 5.0)));
        engine.add(other.clone());
        engine.update();

        let mover = Body::new(0.0, 0.0, 1.0, 1.0);
        let intersection = engine.intersection(&Rect::new(15.0, 8.0, 8.0, 4.0), &mover).unwrap();

        assert_eq!(intersection.bounds, Rect::new(15.0, 8.0, 8.0, 4.0));
        assert_eq!(intersection.ids().collect::<Vec<_>>(), vec![wall.id(), other.id()]);
    }
}
