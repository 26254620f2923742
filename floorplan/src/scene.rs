//! Projection of elements into drawable primitives.
//!
//! The scene is a small retained tree: each element becomes a [`Drawable::Group`]
//! carrying the element's translation and rotation, with its shapes in
//! local coordinates. `render` is pure; the `render` module walks the tree
//! onto a 2D context and `export` uses [`Drawable::bounds`] to size images.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use crate::camera::Point;
use crate::doc::AppState;
use crate::element::{Element, ElementId};
use crate::geometry::{Rect, circle_bounds, rotate_about};
use crate::seating;

const TABLE_LABEL_SIZE: f64 = 12.0;
const CHAIR_LABEL_SIZE: f64 = 10.0;
const LINE_HEIGHT: f64 = 1.25;
const WALL_STROKE_WIDTH: f64 = 2.0;
const ROOM_STROKE_WIDTH: f64 = 2.0;
const ARROW_COLOR: &str = "red";

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

/// A node in the scene tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawable {
    /// Children drawn after translating to `(x, y)` and rotating by `rotation` degrees.
    Group { x: f64, y: f64, rotation: f64, children: Vec<Drawable> },
    Circle { center: Point, radius: f64, fill: String },
    Rect { rect: Rect, fill: String, stroke: Option<Stroke> },
    Line { from: Point, to: Point, stroke: Stroke },
    /// Line with an arrow head at `to`.
    Arrow { from: Point, to: Point, stroke: Stroke },
    /// Multi-line text, each line centered horizontally on `center.x`, the
    /// block centered vertically on `center.y`.
    Text { center: Point, text: String, size: f64, color: String },
}

impl Drawable {
    /// Axis-aligned bounds in the parent's coordinate space. `None` for an
    /// empty group.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Group { x, y, rotation, children } => {
                let inner = children.iter().filter_map(Drawable::bounds).reduce(|a, b| a.union(&b))?;
                let origin = Point::default();
                let corners = [
                    Point::new(inner.x, inner.y),
                    Point::new(inner.right(), inner.y),
                    Point::new(inner.right(), inner.bottom()),
                    Point::new(inner.x, inner.bottom()),
                ]
                .map(|p| rotate_about(p, origin, *rotation).offset(*x, *y));
                Rect::enclosing(&corners)
            }
            Self::Circle { center, radius, .. } => Some(circle_bounds(*center, *radius)),
            Self::Rect { rect, stroke, .. } => {
                Some(stroke.as_ref().map_or(*rect, |s| rect.padded(s.width / 2.0)))
            }
            Self::Line { from, to, stroke } | Self::Arrow { from, to, stroke } => {
                Some(Rect::from_corners(*from, *to).padded(stroke.width / 2.0))
            }
            Self::Text { center, text, size, .. } => {
                let lines = text.lines().count().max(1);
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                // Rough metrics; sans-serif glyphs average a bit over half the em size.
                #[allow(clippy::cast_precision_loss)]
                let (width, height) = (longest as f64 * size * 0.6, lines as f64 * size * LINE_HEIGHT);
                Some(Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height))
            }
        }
    }
}

/// Table caption: its name over the number of attached chairs.
#[must_use]
pub fn table_label(name: &str, chairs: usize) -> String {
    format!("{name}\n{chairs} chairs")
}

/// Drawable for one element. With `with_labels` false only geometry is
/// produced, which is what the minimap preview uses.
#[must_use]
pub fn render(element: &Element, with_labels: bool) -> Drawable {
    match element {
        Element::Chair(c) => {
            let mut children = vec![Drawable::Circle { center: Point::default(), radius: c.radius, fill: c.color.clone() }];
            if let Some(name) = c.employee_name.as_ref().filter(|_| with_labels) {
                children.push(Drawable::Text {
                    center: Point::new(0.0, -c.radius - 10.0),
                    text: name.clone(),
                    size: CHAIR_LABEL_SIZE,
                    color: "black".into(),
                });
            }
            Drawable::Group { x: c.x, y: c.y, rotation: c.rotation, children }
        }
        Element::CircleTable(t) => {
            let mut children = vec![Drawable::Circle { center: Point::default(), radius: t.radius, fill: t.color.clone() }];
            if with_labels {
                children.push(Drawable::Text {
                    center: Point::default(),
                    text: table_label(&t.name, t.attached_chairs.len()),
                    size: TABLE_LABEL_SIZE,
                    color: "white".into(),
                });
            }
            Drawable::Group { x: t.x, y: t.y, rotation: t.rotation, children }
        }
        Element::RectTable(t) => {
            let rect = Rect::new(0.0, 0.0, t.width, t.height);
            let mut children = vec![Drawable::Rect { rect, fill: t.color.clone(), stroke: None }];
            if with_labels {
                children.push(Drawable::Text {
                    center: rect.center(),
                    text: table_label(&t.name, t.attached_chairs.len()),
                    size: TABLE_LABEL_SIZE,
                    color: "white".into(),
                });
            }
            Drawable::Group { x: t.x, y: t.y, rotation: t.rotation, children }
        }
        Element::Wall(w) => Drawable::Group {
            x: 0.0,
            y: 0.0,
            rotation: w.rotation,
            children: vec![Drawable::Line {
                from: Point::new(w.x1, w.y1),
                to: Point::new(w.x2, w.y2),
                stroke: Stroke { color: w.color.clone(), width: WALL_STROKE_WIDTH },
            }],
        },
        Element::Room(r) => Drawable::Group {
            x: r.x,
            y: r.y,
            rotation: r.rotation,
            children: vec![Drawable::Rect {
                rect: Rect::new(0.0, 0.0, r.width, r.height),
                fill: r.color.clone(),
                stroke: Some(Stroke { color: r.stroke.clone(), width: ROOM_STROKE_WIDTH }),
            }],
        },
    }
}

/// Every element in draw order.
#[must_use]
pub fn render_all(state: &AppState, with_labels: bool) -> Vec<Drawable> {
    state.elements.iter().map(|el| render(el, with_labels)).collect()
}

/// Arrows from a chair to each of its neighbours at the same table.
#[must_use]
pub fn neighbour_arrows(state: &AppState, chair_id: ElementId) -> Vec<Drawable> {
    let Some(from) = state.element(chair_id).and_then(Element::as_chair).map(|c| Point::new(c.x, c.y)) else {
        return Vec::new();
    };
    seating::neighbours_of(state, chair_id)
        .into_iter()
        .filter_map(|id| state.element(id).and_then(Element::as_chair))
        .map(|c| Drawable::Arrow {
            from,
            to: Point::new(c.x, c.y),
            stroke: Stroke { color: ARROW_COLOR.into(), width: 2.0 },
        })
        .collect()
}
