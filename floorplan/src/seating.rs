//! Seat allocation helpers: who sits where, and which chairs at a table are
//! close enough to count as neighbours.

#[cfg(test)]
#[path = "seating_test.rs"]
mod seating_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{AppState, ElementPatch};
use crate::element::{Chair, Element, ElementId};
use crate::geometry::are_neighbours;

/// Per table, per attached chair, the other chairs of that table within
/// the neighbour threshold.
pub type NeighbourMap = HashMap<ElementId, HashMap<ElementId, Vec<ElementId>>>;

/// A participant placed on a chair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub employee_id: String,
    pub employee_name: String,
}

fn attached_chairs<'a>(state: &'a AppState, table: &Element) -> Vec<&'a Chair> {
    table
        .attached_chairs()
        .unwrap_or_default()
        .iter()
        .filter_map(|id| state.element(*id).and_then(Element::as_chair))
        .collect()
}

fn near(a: &Chair, b: &Chair) -> bool {
    are_neighbours(Point::new(a.x, a.y), a.radius, Point::new(b.x, b.y), b.radius)
}

/// Neighbour lists for every chair attached to every table.
#[must_use]
pub fn neighbour_map(state: &AppState) -> NeighbourMap {
    state
        .tables()
        .map(|table| {
            let chairs = attached_chairs(state, table);
            let per_chair = chairs
                .iter()
                .map(|a| {
                    let others = chairs.iter().filter(|b| b.id != a.id && near(a, b)).map(|b| b.id).collect();
                    (a.id, others)
                })
                .collect();
            (table.id(), per_chair)
        })
        .collect()
}

/// Neighbours of one chair at its table. Empty for a detached chair.
#[must_use]
pub fn neighbours_of(state: &AppState, chair_id: ElementId) -> Vec<ElementId> {
    let Some(chair) = state.element(chair_id).and_then(Element::as_chair) else {
        return Vec::new();
    };
    let Some(table) = chair.attached_to.and_then(|id| state.element(id)) else {
        return Vec::new();
    };
    attached_chairs(state, table).into_iter().filter(|b| b.id != chair.id && near(chair, b)).map(|b| b.id).collect()
}

/// Employee ids currently seated anywhere on the plan.
#[must_use]
pub fn allocated_employees(state: &AppState) -> HashSet<String> {
    state.elements.iter().filter_map(|el| el.as_chair()?.employee_id.clone()).collect()
}

/// Participants from `participants` who have no seat yet, in input order.
#[must_use]
pub fn unallocated<'a>(state: &AppState, participants: &'a [String]) -> Vec<&'a str> {
    let seated = allocated_employees(state);
    participants.iter().filter(|p| !seated.contains(*p)).map(String::as_str).collect()
}

/// Patch seating `seat` on a chair, or vacating it when `seat` is `None`.
#[must_use]
pub fn seat_patch(chair_id: ElementId, seat: Option<&Seat>) -> ElementPatch {
    ElementPatch {
        employee_id: Some(seat.map(|s| s.employee_id.clone())),
        employee_name: Some(seat.map(|s| s.employee_name.clone())),
        ..ElementPatch::new(chair_id)
    }
}
