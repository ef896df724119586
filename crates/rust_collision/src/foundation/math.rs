//! Math utilities and types
//!
//! Provides the planar geometry the collision core works in: points, vectors,
//! axis-aligned rectangles, line segments and the engine's angle convention.
//!
//! ## Angle convention
//!
//! Angles are in degrees. 0° points along +Y (down in screen space), 90°
//! along +X, 180° along -Y and 270° along -X. [`project`] and
//! [`rotation_angle`] are inverse to each other under this convention.

use approx::AbsDiffEq;
use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f64>;

/// 2D point type
pub type Point = nalgebra::Point2<f64>;

/// An axis-aligned rectangle given by its top-left corner and its size.
///
/// Rectangles with a non-positive width or height are *empty*: they never
/// intersect or contain anything.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rectangle spanning two corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        let min_x = a.x.min(b.x);
        let min_y = a.y.min(b.y);
        Self::new(min_x, min_y, a.x.max(b.x) - min_x, a.y.max(b.y) - min_y)
    }

    /// Create a rectangle of the given size at a location
    pub fn at(location: Point, width: f64, height: f64) -> Self {
        Self::new(location.x, location.y, width, height)
    }

    /// Left edge
    pub const fn min_x(&self) -> f64 {
        self.x
    }

    /// Top edge
    pub const fn min_y(&self) -> f64 {
        self.y
    }

    /// Right edge
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Top-left corner
    pub fn location(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Center point
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Length of the diagonal
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Whether this rectangle encloses no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Same size, moved so its top-left corner sits at `location`
    pub fn with_location(&self, location: Point) -> Self {
        Self::new(location.x, location.y, self.width, self.height)
    }

    /// Check whether a point lies inside this rectangle.
    ///
    /// The left and top edges are inside, the right and bottom edges are not.
    pub fn contains_point(&self, point: &Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.y >= self.y
            && point.x < self.max_x()
            && point.y < self.max_y()
    }

    /// Check whether `other` lies completely inside this rectangle (edges included)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        !self.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Check whether two rectangles overlap.
    ///
    /// Rectangles that only share an edge or a corner do not overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// The overlapping region of two rectangles, if they overlap
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }

        let min_x = self.x.max(other.x);
        let min_y = self.y.max(other.y);
        let max_x = self.max_x().min(other.max_x());
        let max_y = self.max_y().min(other.max_y());
        Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// The smallest rectangle enclosing both rectangles
    pub fn union(&self, other: &Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }
}

impl AbsDiffEq for Rect {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.width.abs_diff_eq(&other.width, epsilon)
            && self.height.abs_diff_eq(&other.height, epsilon)
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Start point
    pub start: Point,
    /// End point
    pub end: Point,
}

impl Line {
    /// Create a new segment
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Create a segment from raw coordinates
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    /// Segment direction scaled to its length
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    /// Euclidean length
    pub fn length(&self) -> f64 {
        self.delta().magnitude()
    }

    /// Point at parameter `t` (0 = start, 1 = end)
    pub fn point_at(&self, t: f64) -> Point {
        self.start + self.delta() * t
    }

    /// Clip the segment against a rectangle (Liang-Barsky).
    ///
    /// Returns the parameter interval `(t_enter, t_exit)` of the part of the
    /// segment inside the closed rectangle.
    pub fn clip(&self, rect: &Rect) -> Option<(f64, f64)> {
        clip_parametric(&self.start, &self.delta(), 1.0, rect)
    }

    /// Check whether the segment passes through the interior of a rectangle.
    ///
    /// Grazing an edge or a corner does not count.
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        match self.clip(rect) {
            Some((t0, t1)) => passes_interior(rect, &self.point_at((t0 + t1) * 0.5)),
            None => false,
        }
    }
}

/// Clip the parametric segment `origin + delta * t, t in [0, t_max]` against
/// a closed rectangle. `t_max` may be infinite.
pub(crate) fn clip_parametric(
    origin: &Point,
    delta: &Vec2,
    t_max: f64,
    rect: &Rect,
) -> Option<(f64, f64)> {
    if rect.is_empty() {
        return None;
    }

    let mut t0 = 0.0_f64;
    let mut t1 = t_max;
    let edges = [
        (-delta.x, origin.x - rect.min_x()),
        (delta.x, rect.max_x() - origin.x),
        (-delta.y, origin.y - rect.min_y()),
        (delta.y, rect.max_y() - origin.y),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            // parallel to this pair of edges
            if q < 0.0 {
                return None;
            }
            continue;
        }

        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((t0, t1))
}

/// Check whether a point lies strictly inside the open rectangle
pub(crate) fn passes_interior(rect: &Rect, point: &Point) -> bool {
    point.x > rect.min_x() && point.x < rect.max_x() && point.y > rect.min_y() && point.y < rect.max_y()
}

/// Normalize an angle to `[0, 360)` degrees
pub fn normalize_angle(angle: f64) -> f64 {
    let normalized = angle % 360.0;
    if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    }
}

/// Horizontal component of a movement of `distance` along `angle`
pub fn delta_x(angle: f64, distance: f64) -> f64 {
    angle.to_radians().sin() * distance
}

/// Vertical component of a movement of `distance` along `angle`
pub fn delta_y(angle: f64, distance: f64) -> f64 {
    angle.to_radians().cos() * distance
}

/// Project a point `distance` units along `angle`
pub fn project(start: Point, angle: f64, distance: f64) -> Point {
    Point::new(start.x + delta_x(angle, distance), start.y + delta_y(angle, distance))
}

/// Project a point `distance` units from `start` in the direction of `target`.
///
/// Returns `start` unchanged when both points coincide.
pub fn project_toward(start: Point, target: Point, distance: f64) -> Point {
    let delta = target - start;
    let length = delta.magnitude();
    if length == 0.0 {
        return start;
    }

    start + delta * (distance / length)
}

/// The angle in `[0, 360)` degrees pointing from `center` toward `target`
pub fn rotation_angle(center: Point, target: Point) -> f64 {
    let delta = target - center;
    normalize_angle(delta.x.atan2(delta.y).to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        let c = Rect::new(9.0, 9.0, 10.0, 10.0);

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_abs_diff_eq!(a.intersection(&c).unwrap(), Rect::new(9.0, 9.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_rect_never_collides() {
        let empty = Rect::new(5.0, 5.0, 0.0, 10.0);
        let big = Rect::new(0.0, 0.0, 100.0, 100.0);

        assert!(!empty.intersects(&big));
        assert!(!big.intersects(&empty));
        assert!(!empty.contains_point(&Point::new(5.0, 6.0)));
        assert!(!Line::from_coords(0.0, 6.0, 10.0, 6.0).intersects_rect(&empty));
    }

    #[test]
    fn test_contains_point_is_half_open() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(rect.contains_point(&Point::new(0.0, 0.0)));
        assert!(!rect.contains_point(&Point::new(10.0, 5.0)));
        assert!(!rect.contains_point(&Point::new(5.0, 10.0)));
    }

    #[test]
    fn test_union_encloses_both() {
        let a = Rect::new(45.0, 25.0, 5.0, 5.0);
        let b = Rect::new(50.0, 20.0, 5.0, 5.0);

        assert_abs_diff_eq!(a.union(&b), Rect::new(45.0, 20.0, 10.0, 10.0));
    }

    #[test]
    fn test_line_crossing_rect() {
        let rect = Rect::new(1.0, 3.0, 5.0, 5.0);
        let line = Line::from_coords(0.0, 0.0, 10.0, 10.0);

        let (t0, t1) = line.clip(&rect).unwrap();
        assert_relative_eq!(line.point_at(t0), Point::new(3.0, 3.0));
        assert_relative_eq!(line.point_at(t1), Point::new(6.0, 6.0));
        assert!(line.intersects_rect(&rect));
    }

    #[test]
    fn test_line_grazing_edge_does_not_intersect() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(!Line::from_coords(-5.0, 10.0, 15.0, 10.0).intersects_rect(&rect));
        assert!(!Line::from_coords(-5.0, 5.0, 15.0, -15.0).intersects_rect(&rect));
        assert!(!Line::from_coords(20.0, 0.0, 20.0, 10.0).intersects_rect(&rect));
    }

    #[test]
    fn test_projection_follows_angle_convention() {
        let origin = Point::new(10.0, 10.0);

        assert_relative_eq!(project(origin, 0.0, 5.0), Point::new(10.0, 15.0), epsilon = 1e-9);
        assert_relative_eq!(project(origin, 90.0, 5.0), Point::new(15.0, 10.0), epsilon = 1e-9);
        assert_relative_eq!(project(origin, 180.0, 5.0), Point::new(10.0, 5.0), epsilon = 1e-9);
        assert_relative_eq!(project(origin, 270.0, 5.0), Point::new(5.0, 10.0), epsilon = 1e-9);
    }

    #[test]
    fn test_rotation_angle_inverts_projection() {
        let origin = Point::new(3.0, -2.0);
        for angle in [0.0, 45.0, 90.0, 135.0, 200.0, 315.0] {
            let target = project(origin, angle, 12.0);
            assert_relative_eq!(rotation_angle(origin, target), angle, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_project_toward_same_point_is_noop() {
        let p = Point::new(4.0, 4.0);
        assert_eq!(project_toward(p, p, 10.0), p);
        assert_relative_eq!(
            project_toward(Point::new(0.0, 0.0), Point::new(10.0, 0.0), 4.0),
            Point::new(4.0, 0.0)
        );
    }

    #[test]
    fn test_normalize_angle() {
        assert_relative_eq!(normalize_angle(-90.0), 270.0);
        assert_relative_eq!(normalize_angle(720.0), 0.0);
    }
}
