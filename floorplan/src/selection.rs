//! Marquee selection and the transform-end bake-in for multi-select resize/rotate.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::debug;

use crate::camera::Point;
use crate::config::EditorConfig;
use crate::doc::{AppState, ElementPatch};
use crate::element::{Element, ElementId};
use crate::geometry::Rect;

/// A selection rectangle being dragged out, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    /// Where the drag started.
    pub start: Point,
    /// The pointer's current position.
    pub end: Point,
}

impl Marquee {
    #[must_use]
    pub fn at(start: Point) -> Self {
        Self { start, end: start }
    }

    /// Normalized rectangle between the two corners.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }
}

/// Ids of every element whose rendered bounds intersect `rect`, in element order.
#[must_use]
pub fn select_in_rect(state: &AppState, rect: &Rect) -> Vec<ElementId> {
    state.elements.iter().filter(|el| el.bounds().intersects(rect)).map(|el| el.id()).collect()
}

/// Accumulated transform of one selected node when a resize/rotate gesture ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub id: ElementId,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Absolute rotation in degrees after the gesture.
    pub rotation: f64,
}

impl NodeTransform {
    /// A pure rotation.
    #[must_use]
    pub fn rotated(id: ElementId, rotation: f64) -> Self {
        Self { id, scale_x: 1.0, scale_y: 1.0, rotation }
    }
}

fn unscale(position: f64, scale: f64) -> f64 {
    if scale == 0.0 || !scale.is_finite() { position } else { position / scale }
}

/// Bake each node's scale into the element's own dimensions, leaving the
/// node at identity scale.
///
/// Radius kinds scale by the horizontal factor. Walls scale each endpoint
/// per axis. Rectangular kinds scale width and height per axis and divide
/// their anchor position by the same factors. Sizes never drop below
/// `config.min_transformed_size`. Unknown ids are skipped.
#[must_use]
pub fn transform_patches(state: &AppState, nodes: &[NodeTransform], config: &EditorConfig) -> Vec<ElementPatch> {
    let floor = config.min_transformed_size;
    let patches: Vec<ElementPatch> = nodes
        .iter()
        .filter_map(|node| {
            let element = state.element(node.id)?;
            let (sx, sy) = (node.scale_x, node.scale_y);
            let base = ElementPatch { rotation: Some(node.rotation), ..ElementPatch::new(node.id) };
            let patch = match element {
                Element::Chair(c) => ElementPatch { radius: Some((c.radius * sx).max(floor)), ..base },
                Element::CircleTable(t) => ElementPatch { radius: Some((t.radius * sx).max(floor)), ..base },
                Element::Wall(w) => ElementPatch {
                    x1: Some(w.x1 * sx),
                    y1: Some(w.y1 * sy),
                    x2: Some(w.x2 * sx),
                    y2: Some(w.y2 * sy),
                    ..base
                },
                Element::RectTable(t) => ElementPatch {
                    x: Some(unscale(t.x, sx)),
                    y: Some(unscale(t.y, sy)),
                    width: Some((t.width * sx).max(floor)),
                    height: Some((t.height * sy).max(floor)),
                    ..base
                },
                Element::Room(r) => ElementPatch {
                    x: Some(unscale(r.x, sx)),
                    y: Some(unscale(r.y, sy)),
                    width: Some((r.width * sx).max(floor)),
                    height: Some((r.height * sy).max(floor)),
                    ..base
                },
            };
            Some(patch)
        })
        .collect();
    debug!(nodes = nodes.len(), patches = patches.len(), "baked transform");
    patches
}
