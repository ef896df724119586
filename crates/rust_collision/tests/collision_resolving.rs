//! Collision resolving scenarios for the movement resolver
//!
//! A 10x10 entity at (10, 10) moves against walls placed around it.

use approx::assert_abs_diff_eq;
use rust_collision::prelude::*;
use std::sync::Arc;

const EPSILON: f64 = 1e-6;
// sqrt(10² + 10²)
const DIAGONAL_STEP: f64 = 14.142_135_623_730_95;

fn new_entity() -> Arc<Body> {
    Arc::new(Body::new(10.0, 10.0, 10.0, 10.0))
}

fn engine_with(walls: &[Rect]) -> (PhysicsEngine, Arc<Body>) {
    let engine = PhysicsEngine::new();
    let entity = new_entity();
    engine.add(entity.clone());
    for wall in walls {
        engine.add(Arc::new(Body::static_box(*wall)));
    }
    engine.update();
    (engine, entity)
}

fn assert_location(entity: &Body, x: f64, y: f64) {
    let location = entity.location();
    assert_abs_diff_eq!(location.x, x, epsilon = EPSILON);
    assert_abs_diff_eq!(location.y, y, epsilon = EPSILON);
}

#[test]
fn test_basic_move() {
    for (angle, x, y) in [(270.0, 5.0, 10.0), (90.0, 15.0, 10.0), (180.0, 10.0, 5.0), (0.0, 10.0, 15.0)] {
        let (engine, entity) = engine_with(&[]);

        assert!(engine.move_by_angle(entity.as_ref(), angle, 5.0));
        assert_location(&entity, x, y);
    }
}

#[test]
fn test_colliding_move_block() {
    let cases = [
        (Rect::new(0.0, 0.0, 5.0, 100.0), 270.0, 5.0, 10.0),
        (Rect::new(25.0, 0.0, 10.0, 100.0), 90.0, 15.0, 10.0),
        (Rect::new(0.0, 0.0, 100.0, 5.0), 180.0, 10.0, 5.0),
        (Rect::new(0.0, 25.0, 100.0, 10.0), 0.0, 10.0, 15.0),
    ];

    for (wall, angle, x, y) in cases {
        let (engine, entity) = engine_with(&[wall]);

        // blocked for the remaining 5 units
        assert!(!engine.move_by_angle(entity.as_ref(), angle, 10.0));
        assert_location(&entity, x, y);
    }
}

#[test]
fn test_colliding_move_slide() {
    let cases = [
        (Rect::new(0.0, 0.0, 100.0, 10.0), 225.0, 0.0, 10.0),
        (Rect::new(0.0, 20.0, 100.0, 10.0), 45.0, 20.0, 10.0),
        (Rect::new(20.0, 0.0, 10.0, 100.0), 135.0, 10.0, 0.0),
    ];

    for (wall, angle, x, y) in cases {
        let (engine, entity) = engine_with(&[wall]);

        assert!(!engine.move_by_angle(entity.as_ref(), angle, DIAGONAL_STEP));
        assert_location(&entity, x, y);
    }
}

#[test]
fn test_colliding_move_slide_down() {
    let (engine, entity) = engine_with(&[Rect::new(0.0, 0.0, 10.0, 100.0)]);

    // a hair short of the full diagonal so the resolved box does not round
    // into the wall on the way down
    engine.move_by_angle(entity.as_ref(), 315.0, DIAGONAL_STEP - 1e-14);
    assert_location(&entity, 10.0, 20.0);
}

#[test]
fn test_corner_is_passed_if_free() {
    let (engine, entity) = engine_with(&[Rect::new(5.0, 20.0, 10.0, 100.0)]);

    assert!(engine.move_by_angle(entity.as_ref(), 45.0, DIAGONAL_STEP));
    assert_location(&entity, 20.0, 20.0);
}

#[test]
fn test_corner_slides_if_blocked() {
    let (engine, entity) = engine_with(&[Rect::new(5.0, 20.0, 10.0, 100.0), Rect::new(15.0, 20.0, 10.0, 100.0)]);

    assert!(!engine.move_by_angle(entity.as_ref(), 45.0, DIAGONAL_STEP));
    assert_location(&entity, 20.0, 10.0);
}

#[test]
fn test_multiple_intersection() {
    let (engine, entity) = engine_with(&[
        // thin floor below the entity
        Rect::new(0.0, 25.0, 15.0, 10.0),
        // small square on the floor's right end
        Rect::new(15.0, 20.0, 5.0, 5.0),
        // large block right of the square
        Rect::new(20.0, 0.0, 50.0, 100.0),
    ]);

    engine.move_by_angle(entity.as_ref(), -90.0, 10.0);
    assert_location(&entity, 0.0, 10.0);

    engine.move_by_angle(entity.as_ref(), 0.0, 10.0);
    assert_location(&entity, 0.0, 15.0);

    engine.move_by_angle(entity.as_ref(), 90.0, 15.0);
    assert_location(&entity, 5.0, 15.0);
}

fn bounded_entity() -> (PhysicsEngine, Arc<Body>) {
    let engine = PhysicsEngine::new();
    engine.set_bound(Some(Rect::new(0.0, 0.0, 50.0, 50.0)));

    let entity = Arc::new(
        Body::new(10.0, 10.0, 30.0, 30.0)
            .with_collision_box(10.0, 10.0)
            .with_align(Align::Center, Valign::Middle),
    );
    engine.add(entity.clone());
    engine.update();
    (engine, entity)
}

#[test]
fn test_collision_with_world_bound_x() {
    for (angle, distance, x) in [(270.0, 20.0, -10.0), (90.0, 50.0, 30.0)] {
        let (engine, entity) = bounded_entity();

        engine.move_by_angle(entity.as_ref(), angle, distance);
        assert_abs_diff_eq!(entity.location().x, x, epsilon = EPSILON);
        assert!(engine.bound().unwrap().contains_rect(&entity.collision_box()));
    }
}

#[test]
fn test_collision_with_world_bound_y() {
    for (angle, distance, y) in [(180.0, 20.0, -10.0), (0.0, 50.0, 30.0)] {
        let (engine, entity) = bounded_entity();

        engine.move_by_angle(entity.as_ref(), angle, distance);
        assert_abs_diff_eq!(entity.location().y, y, epsilon = EPSILON);
    }
}
