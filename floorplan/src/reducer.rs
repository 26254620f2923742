//! Pure state transitions: `(state, action) -> state'`.
//!
//! Nothing here mutates an element in place. Each transition builds a new
//! element list in which untouched elements are the same `Arc` as before,
//! then runs [`attach::reconcile`] so the chair-table relation holds in the
//! result. History actions (`CommitHistoryCheckpoint`, `Undo`, `Redo`) are
//! identity here; [`crate::history::Editor`] gives them meaning.

#[cfg(test)]
#[path = "reducer_test.rs"]
mod reducer_test;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::action::Action;
use crate::attach;
use crate::config::EditorConfig;
use crate::doc::{AppState, ElementPatch};
use crate::element::{Element, ElementId, FieldValue};
use crate::error::EditorError;

/// Result of applying one action.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: AppState,
    /// Ids the host should select afterwards, when the action dictates one.
    pub selection: Option<Vec<ElementId>>,
}

impl Transition {
    fn of(state: AppState) -> Self {
        Self { state, selection: None }
    }
}

/// Apply `action` to `state` with the stock configuration.
///
/// # Errors
///
/// Returns [`EditorError::Deserialization`] when a `SetState` snapshot cannot be decoded.
pub fn apply(state: &AppState, action: &Action) -> Result<Transition, EditorError> {
    apply_with(state, action, &EditorConfig::default())
}

/// Apply `action` to `state`.
///
/// # Errors
///
/// Returns [`EditorError::Deserialization`] when a `SetState` snapshot cannot be decoded.
pub fn apply_with(state: &AppState, action: &Action, config: &EditorConfig) -> Result<Transition, EditorError> {
    let transition = match action {
        Action::SetState(source) => {
            let mut next = source.clone().decode()?;
            next.elements = attach::reconcile(&next.elements);
            debug!(elements = next.elements.len(), "hydrated state");
            Transition::of(next)
        }
        Action::AddElement(element) => {
            let mut elements = state.elements.clone();
            elements.push(Arc::new(element.clone()));
            Transition::of(with_elements(state, &elements))
        }
        Action::RemoveElements(ids) => Transition::of(remove(state, ids)),
        Action::UpdateElement(patch) => Transition::of(update(state, std::slice::from_ref(patch))),
        Action::UpdateElements(patches) | Action::UpdateElementsWithoutHistory(patches) => {
            Transition::of(update(state, patches))
        }
        Action::UpdateElementField { id, key, value } => Transition::of(update_field(state, *id, key, value)),
        Action::DuplicateElements(ids) => {
            let (next, new_ids) = duplicate(state, ids, config.duplicate_offset);
            Transition { state: next, selection: Some(new_ids) }
        }
        Action::ChangeBuildMode(mode) => Transition::of(AppState { build_mode: *mode, ..state.clone() }),
        Action::CreateGroup(group) => {
            let mut next = state.clone();
            next.groups.push(group.clone());
            Transition::of(next)
        }
        Action::UpdateGroup(group) => {
            let mut next = state.clone();
            for existing in next.groups.iter_mut().filter(|g| g.id == group.id) {
                existing.clone_from(group);
            }
            Transition::of(next)
        }
        Action::RemoveGroup(id) => {
            let mut next = state.clone();
            next.groups.retain(|g| g.id != *id);
            Transition::of(next)
        }
        Action::CommitHistoryCheckpoint | Action::Undo | Action::Redo => Transition::of(state.clone()),
    };
    Ok(transition)
}

/// `state` with a new element list, repaired.
fn with_elements(state: &AppState, elements: &[Arc<Element>]) -> AppState {
    AppState { elements: attach::reconcile(elements), ..state.clone() }
}

fn remove(state: &AppState, ids: &[ElementId]) -> AppState {
    let doomed: HashSet<ElementId> = ids.iter().copied().collect();
    let elements: Vec<Arc<Element>> =
        state.elements.iter().filter(|el| !doomed.contains(&el.id())).cloned().collect();
    let mut next = with_elements(state, &elements);
    for group in &mut next.groups {
        group.element_ids.retain(|id| !doomed.contains(id));
    }
    next
}

/// Apply every patch to its element. Several patches for one id merge in
/// order; ids with no matching element are skipped.
fn update(state: &AppState, patches: &[ElementPatch]) -> AppState {
    let mut by_id: HashMap<ElementId, ElementPatch> = HashMap::new();
    for patch in patches {
        match by_id.get_mut(&patch.id) {
            Some(existing) => existing.merge(patch.clone()),
            None => {
                by_id.insert(patch.id, patch.clone());
            }
        }
    }

    let elements: Vec<Arc<Element>> = state
        .elements
        .iter()
        .map(|el| match by_id.get(&el.id()) {
            Some(patch) => {
                let next = patch.apply(el);
                if next == **el { Arc::clone(el) } else { Arc::new(next) }
            }
            None => Arc::clone(el),
        })
        .collect();
    with_elements(state, &elements)
}

fn update_field(state: &AppState, id: ElementId, key: &str, value: &FieldValue) -> AppState {
    let elements: Vec<Arc<Element>> = state
        .elements
        .iter()
        .map(|el| {
            if el.id() != id {
                return Arc::clone(el);
            }
            match el.with_field(key, value) {
                Some(next) if next != **el => Arc::new(next),
                Some(_) => Arc::clone(el),
                None => {
                    warn!(element = %id, key, ?value, "rejected field edit");
                    Arc::clone(el)
                }
            }
        })
        .collect();
    with_elements(state, &elements)
}

/// Clone each listed element under a fresh id, shifted by `offset` on both
/// axes. References between duplicated elements are rewritten to point at
/// the clones; a cloned chair whose table was not duplicated starts detached.
fn duplicate(state: &AppState, ids: &[ElementId], offset: f64) -> (AppState, Vec<ElementId>) {
    let mut remap: HashMap<ElementId, ElementId> = HashMap::new();
    let mut originals: Vec<(&Element, ElementId)> = Vec::new();
    for id in ids {
        if remap.contains_key(id) {
            continue;
        }
        let Some(original) = state.element(*id) else {
            continue;
        };
        let new_id = Uuid::new_v4();
        remap.insert(*id, new_id);
        originals.push((original, new_id));
    }

    let mut new_ids = Vec::with_capacity(originals.len());
    let mut elements = state.elements.clone();
    for (original, new_id) in originals {
        let mut clone = original.with_id(new_id).translated(offset, offset);
        match &mut clone {
            Element::Chair(chair) => match chair.attached_to.and_then(|t| remap.get(&t)) {
                Some(table) => chair.attached_to = Some(*table),
                None => {
                    chair.attached_to = None;
                    chair.offset = None;
                }
            },
            Element::RectTable(table) => remap_ids(&mut table.attached_chairs, &remap),
            Element::CircleTable(table) => remap_ids(&mut table.attached_chairs, &remap),
            Element::Wall(_) | Element::Room(_) => {}
        }
        new_ids.push(new_id);
        elements.push(Arc::new(clone));
    }
    debug!(count = new_ids.len(), "duplicated elements");
    (with_elements(state, &elements), new_ids)
}

/// Keep only the ids that were duplicated, mapped to their clones.
fn remap_ids(ids: &mut Vec<ElementId>, remap: &HashMap<ElementId, ElementId>) {
    *ids = ids.iter().filter_map(|id| remap.get(id).copied()).collect();
}
