//! Point hit-testing against placed elements.
//!
//! Tests follow each element's drawn shape rather than its bounding box, so
//! clicking the empty corner of a rotated table's bounds falls through to
//! whatever lies beneath.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::WALL_SELECTION_PADDING;
use crate::doc::AppState;
use crate::element::{Element, ElementId};
use crate::geometry::{distance, distance_to_segment, rotate_about};

/// Whether `world_pt` lies on `element`.
#[must_use]
pub fn contains_point(element: &Element, world_pt: Point) -> bool {
    match element {
        Element::Chair(c) => distance(world_pt, Point::new(c.x, c.y)) <= c.radius,
        Element::CircleTable(t) => distance(world_pt, Point::new(t.x, t.y)) <= t.radius,
        Element::RectTable(t) => in_rotated_rect(world_pt, Point::new(t.x, t.y), t.width, t.height, t.rotation),
        Element::Room(r) => in_rotated_rect(world_pt, Point::new(r.x, r.y), r.width, r.height, r.rotation),
        Element::Wall(w) => {
            // Walls rotate about the origin of their own space.
            let local = rotate_about(world_pt, Point::default(), -w.rotation);
            distance_to_segment(local, Point::new(w.x1, w.y1), Point::new(w.x2, w.y2)) <= WALL_SELECTION_PADDING
        }
    }
}

fn in_rotated_rect(p: Point, origin: Point, width: f64, height: f64, rotation: f64) -> bool {
    let local = rotate_about(p, origin, -rotation);
    let (lx, ly) = (local.x - origin.x, local.y - origin.y);
    (0.0..=width).contains(&lx) && (0.0..=height).contains(&ly)
}

/// Topmost element under `world_pt`, if any. Later elements draw on top.
#[must_use]
pub fn hit_test(world_pt: Point, state: &AppState) -> Option<ElementId> {
    state.elements.iter().rev().find(|el| contains_point(el, world_pt)).map(|el| el.id())
}
