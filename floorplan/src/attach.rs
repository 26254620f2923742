//! Chair-to-table attachment: snapping a dropped chair onto a nearby table,
//! carrying attached chairs along with a dragged table, and the repair pass
//! that keeps `Chair::attached_to` and the tables' `attached_chairs` lists
//! mutually consistent.
//!
//! Offsets are measured from the table's visual center.

#[cfg(test)]
#[path = "attach_test.rs"]
mod attach_test;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::camera::Point;
use crate::config::{EditorConfig, TieBreak};
use crate::consts::AXIS_ALIGNED_TOLERANCE_RAD;
use crate::doc::{AppState, ElementPatch};
use crate::element::{Chair, Element, ElementId, Offset, TableShape};
use crate::geometry::{circle_bounds, distance, is_axis_aligned};

/// Whether a chair of `chair_radius` centered at `drop` is close enough to `table` to attach.
#[must_use]
pub fn qualifies(table: &TableShape, drop: Point, chair_radius: f64, buffer: f64) -> bool {
    match *table {
        TableShape::Circle { center, radius } => distance(drop, center) < radius + chair_radius + buffer,
        TableShape::Rect { .. } => circle_bounds(drop, chair_radius).intersects(&table.bounds()),
    }
}

/// Table a chair dropped at `drop` should attach to, if any.
#[must_use]
pub fn find_table<'a>(state: &'a AppState, chair: &Chair, drop: Point, config: &EditorConfig) -> Option<&'a Element> {
    let mut candidates = state.tables().filter_map(|table| {
        let shape = table.table_shape()?;
        qualifies(&shape, drop, chair.radius, config.attach_buffer).then_some((table, shape))
    });
    let found = match config.tie_break {
        TieBreak::FirstMatch => candidates.next(),
        TieBreak::Nearest => {
            candidates.min_by(|(_, a), (_, b)| distance(drop, a.center()).total_cmp(&distance(drop, b.center())))
        }
    };
    found.map(|(table, _)| table)
}

/// Snapped chair center and facing angle (radians) for a chair dropped at `drop`.
///
/// Rectangular tables rotated away from axis alignment do not snap: the
/// chair stays where it was dropped with angle 0.
#[must_use]
pub fn attach_position(table: &TableShape, chair_radius: f64, drop: Point) -> (Point, f64) {
    match *table {
        TableShape::Circle { center, radius } => {
            let angle = (drop.y - center.y).atan2(drop.x - center.x);
            let reach = radius + chair_radius;
            (Point::new(center.x + reach * angle.cos(), center.y + reach * angle.sin()), angle)
        }
        TableShape::Rect { rotation, .. } if !is_axis_aligned(rotation, AXIS_ALIGNED_TOLERANCE_RAD) => (drop, 0.0),
        TableShape::Rect { origin, width, height, .. } => {
            let half_w = width / 2.0;
            let half_h = height / 2.0;
            let center = origin.offset(half_w, half_h);
            let dx = drop.x - center.x;
            let dy = drop.y - center.y;
            let ratio_x = if half_w > 0.0 { dx.abs() / half_w } else { f64::INFINITY };
            let ratio_y = if half_h > 0.0 { dy.abs() / half_h } else { f64::INFINITY };

            let snapped = if ratio_x > ratio_y {
                let x = if dx < 0.0 { center.x - half_w - chair_radius } else { center.x + half_w + chair_radius };
                Point::new(x, drop.y.clamp(center.y - half_h, center.y + half_h))
            } else {
                let y = if dy < 0.0 { center.y - half_h - chair_radius } else { center.y + half_h + chair_radius };
                Point::new(drop.x.clamp(center.x - half_w, center.x + half_w), y)
            };
            let angle = (center.y - snapped.y).atan2(center.x - snapped.x);
            (snapped, angle)
        }
    }
}

/// `table`'s chair list with `chair` removed, as a patch.
fn without_chair(table: &Element, chair: ElementId) -> Option<ElementPatch> {
    let chairs = table.attached_chairs()?;
    if !chairs.contains(&chair) {
        return None;
    }
    Some(ElementPatch {
        attached_chairs: Some(chairs.iter().copied().filter(|id| *id != chair).collect()),
        ..ElementPatch::new(table.id())
    })
}

/// Resolve the end of a chair drag at `drop` into element patches.
///
/// Attaches to a qualifying table (detaching from any previous one first),
/// detaches when the chair was attached and nothing qualifies, and otherwise
/// just moves the chair. An unknown chair id yields a bare position patch.
#[must_use]
pub fn drop_chair(state: &AppState, chair_id: ElementId, drop: Point, config: &EditorConfig) -> Vec<ElementPatch> {
    let Some(chair) = state.element(chair_id).and_then(Element::as_chair) else {
        return vec![ElementPatch::position(chair_id, drop.x, drop.y)];
    };
    let previous = chair.attached_to.and_then(|id| state.element(id));
    let mut patches = Vec::new();

    let target = find_table(state, chair, drop, config).and_then(|t| t.table_shape().map(|s| (t, s)));
    let Some((table, shape)) = target else {
        if let Some(prev) = previous {
            debug!(chair = %chair_id, table = %prev.id(), "chair dropped clear of its table; detaching");
            patches.extend(without_chair(prev, chair_id));
        }
        if chair.attached_to.is_some() || chair.offset.is_some() {
            patches.push(ElementPatch {
                x: Some(drop.x),
                y: Some(drop.y),
                ..ElementPatch::detached(chair_id)
            });
        } else {
            patches.push(ElementPatch::position(chair_id, drop.x, drop.y));
        }
        return patches;
    };

    if let Some(prev) = previous.filter(|prev| prev.id() != table.id()) {
        patches.extend(without_chair(prev, chair_id));
    }

    let (snapped, angle) = attach_position(&shape, chair.radius, drop);
    let center = shape.center();
    debug!(
        chair = %chair_id,
        table = %table.id(),
        x = snapped.x,
        y = snapped.y,
        angle,
        "attaching chair to table"
    );
    patches.push(ElementPatch {
        x: Some(snapped.x),
        y: Some(snapped.y),
        attached_to: Some(Some(table.id())),
        offset: Some(Some(Offset { dx: snapped.x - center.x, dy: snapped.y - center.y, angle })),
        ..ElementPatch::new(chair_id)
    });

    let chairs = table.attached_chairs().unwrap_or_default();
    if !chairs.contains(&chair_id) {
        let mut next = chairs.to_vec();
        next.push(chair_id);
        patches.push(ElementPatch { attached_chairs: Some(next), ..ElementPatch::new(table.id()) });
    }
    patches
}

/// Patches detaching a chair from its table. Empty if it is not attached.
#[must_use]
pub fn detach_chair(state: &AppState, chair_id: ElementId) -> Vec<ElementPatch> {
    let Some(chair) = state.element(chair_id).and_then(Element::as_chair) else {
        return Vec::new();
    };
    if chair.attached_to.is_none() && chair.offset.is_none() {
        return Vec::new();
    }
    let mut patches: Vec<ElementPatch> = chair
        .attached_to
        .and_then(|id| state.element(id))
        .and_then(|table| without_chair(table, chair_id))
        .into_iter()
        .collect();
    patches.push(ElementPatch::detached(chair_id));
    patches
}

/// Drag-move patches for a table moved to `new_position` (its `x`/`y`) and
/// every attached chair with a stored offset.
#[must_use]
pub fn follow_table(state: &AppState, table_id: ElementId, new_position: Point) -> Vec<ElementPatch> {
    let Some(table) = state.element(table_id) else {
        return Vec::new();
    };
    let Some(shape) = table.table_shape() else {
        return vec![ElementPatch::position(table_id, new_position.x, new_position.y)];
    };
    let old_position = match shape {
        TableShape::Circle { center, .. } => center,
        TableShape::Rect { origin, .. } => origin,
    };
    let center = shape.center().offset(new_position.x - old_position.x, new_position.y - old_position.y);

    let mut patches = vec![ElementPatch::position(table_id, new_position.x, new_position.y)];
    for chair_id in table.attached_chairs().unwrap_or_default() {
        let Some(offset) = state.element(*chair_id).and_then(Element::as_chair).and_then(|c| c.offset) else {
            continue;
        };
        patches.push(ElementPatch::position(*chair_id, center.x + offset.dx, center.y + offset.dy));
    }
    patches
}

// =============================================================
// Invariant repair
// =============================================================

/// Make both sides of every chair-table relation agree.
///
/// The chair side wins: a chair pointing at a missing or non-table element
/// is detached, a chair without a table loses its offset, and each table's
/// list is reduced to the chairs that point at it (first occurrence kept)
/// followed by any such chairs it was missing. Elements that need no repair
/// keep their `Arc`.
#[must_use]
pub fn reconcile(elements: &[Arc<Element>]) -> Vec<Arc<Element>> {
    let tables: HashSet<ElementId> = elements.iter().filter(|el| el.is_table()).map(|el| el.id()).collect();

    let mut owners: HashMap<ElementId, ElementId> = HashMap::new();
    let mut by_table: HashMap<ElementId, Vec<ElementId>> = HashMap::new();
    let mut repaired: Vec<Arc<Element>> = elements
        .iter()
        .map(|el| {
            let Element::Chair(chair) = el.as_ref() else {
                return Arc::clone(el);
            };
            if let Some(table) = chair.attached_to.filter(|t| tables.contains(t)) {
                owners.insert(chair.id, table);
                by_table.entry(table).or_default().push(chair.id);
                return Arc::clone(el);
            }
            if chair.attached_to.is_none() && chair.offset.is_none() {
                return Arc::clone(el);
            }
            debug!(chair = %chair.id, "clearing dangling chair attachment");
            let mut fixed = chair.clone();
            fixed.attached_to = None;
            fixed.offset = None;
            Arc::new(Element::Chair(fixed))
        })
        .collect();

    for el in &mut repaired {
        let Some(current) = el.attached_chairs() else {
            continue;
        };
        let table_id = el.id();
        let mut seen = HashSet::new();
        let mut desired: Vec<ElementId> = current
            .iter()
            .copied()
            .filter(|chair| owners.get(chair) == Some(&table_id) && seen.insert(*chair))
            .collect();
        for chair in by_table.get(&table_id).into_iter().flatten() {
            if seen.insert(*chair) {
                desired.push(*chair);
            }
        }
        if desired.as_slice() != current {
            debug!(table = %table_id, chairs = desired.len(), "repairing table chair list");
            let patch = ElementPatch { attached_chairs: Some(desired), ..ElementPatch::new(table_id) };
            let next = patch.apply(el);
            *el = Arc::new(next);
        }
    }
    repaired
}

/// A broken chair-table relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Chair points at an element that is missing or not a table.
    DanglingChair { chair: ElementId, table: ElementId },
    /// Chair has an offset but no table.
    StrayOffset { chair: ElementId },
    /// Chair points at a table that does not list it.
    MissingFromTable { chair: ElementId, table: ElementId },
    /// Table lists something that is not a chair pointing back at it.
    UnexpectedChair { table: ElementId, chair: ElementId },
    /// Table lists the same chair twice.
    DuplicateChair { table: ElementId, chair: ElementId },
}

/// Every relation violation in `elements`. Empty for a consistent state.
#[must_use]
pub fn check(elements: &[Arc<Element>]) -> Vec<Violation> {
    let by_id: HashMap<ElementId, &Element> = elements.iter().map(|el| (el.id(), el.as_ref())).collect();
    let mut violations = Vec::new();

    for el in elements {
        if let Element::Chair(chair) = el.as_ref() {
            match chair.attached_to {
                Some(table) => match by_id.get(&table).and_then(|t| t.attached_chairs()) {
                    None => violations.push(Violation::DanglingChair { chair: chair.id, table }),
                    Some(list) if !list.contains(&chair.id) => {
                        violations.push(Violation::MissingFromTable { chair: chair.id, table });
                    }
                    Some(_) => {}
                },
                None if chair.offset.is_some() => violations.push(Violation::StrayOffset { chair: chair.id }),
                None => {}
            }
        }
        if let Some(list) = el.attached_chairs() {
            let table = el.id();
            let mut seen = HashSet::new();
            for chair in list {
                if !seen.insert(*chair) {
                    violations.push(Violation::DuplicateChair { table, chair: *chair });
                    continue;
                }
                let points_back = by_id
                    .get(chair)
                    .and_then(|c| c.as_chair())
                    .is_some_and(|c| c.attached_to == Some(table));
                if !points_back {
                    violations.push(Violation::UnexpectedChair { table, chair: *chair });
                }
            }
        }
    }
    violations
}
