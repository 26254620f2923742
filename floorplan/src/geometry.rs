//! Pure geometry helpers: rectangles, distances, rotations, neighbour tests.
//!
//! Rotations are in degrees, clockwise in screen space (y grows downward),
//! which is how the scene graph applies an element's `rotation`.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::NEIGHBOUR_FACTOR;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        }
    }

    /// Smallest rectangle containing every point. `None` for an empty slice.
    #[must_use]
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::from_corners(Point::new(min_x, min_y), Point::new(max_x, max_y)))
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap test with touching edges counted as intersecting.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x > self.right() || other.right() < self.x || other.y > self.bottom() || other.bottom() < self.y)
    }

    /// Inclusive point-in-rectangle test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grow the rectangle by `margin` on every side.
    #[must_use]
    pub fn padded(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }

    /// Whether the rectangle has a positive, finite area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Rotate `p` about `pivot` by `degrees` (clockwise on screen).
#[must_use]
pub fn rotate_about(p: Point, pivot: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return p;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = p.x - pivot.x;
    let dy = p.y - pivot.y;
    Point::new(pivot.x + dx * cos - dy * sin, pivot.y + dx * sin + dy * cos)
}

/// Axis-aligned bounds of a `width` × `height` rectangle whose top-left
/// corner sits at `origin` and which is rotated about that corner.
#[must_use]
pub fn rotated_rect_bounds(origin: Point, width: f64, height: f64, degrees: f64) -> Rect {
    let corners = [
        origin,
        rotate_about(origin.offset(width, 0.0), origin, degrees),
        rotate_about(origin.offset(width, height), origin, degrees),
        rotate_about(origin.offset(0.0, height), origin, degrees),
    ];
    Rect::enclosing(&corners).unwrap_or_else(|| Rect::new(origin.x, origin.y, 0.0, 0.0))
}

/// Square bounding box of a circle.
#[must_use]
pub fn circle_bounds(center: Point, radius: f64) -> Rect {
    Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
}

/// Whether two chairs sit close enough to count as neighbours at a table.
#[must_use]
pub fn are_neighbours(a: Point, a_radius: f64, b: Point, b_radius: f64) -> bool {
    distance(a, b) <= NEIGHBOUR_FACTOR * (a_radius + b_radius)
}

/// Whether a rotation in degrees is within `tolerance_rad` of zero, modulo a full turn.
#[must_use]
pub fn is_axis_aligned(degrees: f64, tolerance_rad: f64) -> bool {
    let rad = degrees.to_radians().rem_euclid(std::f64::consts::TAU);
    rad < tolerance_rad || std::f64::consts::TAU - rad < tolerance_rad
}

/// Shortest distance from `p` to the segment `a`-`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return distance(p, a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    distance(p, Point::new(a.x + t * dx, a.y + t * dy))
}
