#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;
use crate::attach::check;
use crate::doc::{BuildMode, Group, SnapshotSource};
use crate::element::{ElementKind, Offset, create_default};

// =============================================================
// Helpers
// =============================================================

fn circle_table_at(x: f64, y: f64) -> Element {
    let mut el = create_default(ElementKind::CircleTable);
    if let Element::CircleTable(t) = &mut el {
        t.x = x;
        t.y = y;
    }
    el
}

fn chair_at(x: f64, y: f64) -> Element {
    let mut el = create_default(ElementKind::Chair);
    if let Element::Chair(c) = &mut el {
        c.x = x;
        c.y = y;
    }
    el
}

/// A circle table at (100, 100) with one chair seated to its right.
fn table_with_chair() -> (AppState, ElementId, ElementId) {
    let table = circle_table_at(100.0, 100.0);
    let mut chair = chair_at(150.0, 100.0);
    if let Element::Chair(c) = &mut chair {
        c.attached_to = Some(table.id());
        c.offset = Some(Offset { dx: 50.0, dy: 0.0, angle: 0.0 });
    }
    let (table_id, chair_id) = (table.id(), chair.id());
    let table = ElementPatch { attached_chairs: Some(vec![chair_id]), ..ElementPatch::new(table_id) }.apply(&table);
    let state = AppState { elements: vec![Arc::new(table), Arc::new(chair)], ..AppState::default() };
    (state, table_id, chair_id)
}

fn run(state: &AppState, action: Action) -> AppState {
    apply(state, &action).unwrap().state
}

// =============================================================
// SetState
// =============================================================

#[test]
fn set_state_from_text() {
    let text = r#"{"buildMode":0,"elements":[],"groups":[],"canvasPosition":{"x":5,"y":6},"scale":2}"#;
    let next = run(&AppState::default(), Action::SetState(SnapshotSource::Text(text.into())));
    assert_eq!(next.canvas_position.x, 5.0);
    assert_eq!(next.scale, 2.0);
}

#[test]
fn set_state_decode_failure_is_error() {
    let err = apply(&AppState::default(), &Action::SetState(SnapshotSource::Text("nope".into()))).unwrap_err();
    assert!(matches!(err, EditorError::Deserialization(_)));
}

#[test]
fn set_state_repairs_inconsistent_snapshot() {
    let table_id = uuid::Uuid::new_v4();
    let chair_id = uuid::Uuid::new_v4();
    let snapshot = json!({
        "elements": [
            { "type": "circleTable", "id": table_id, "x": 0, "y": 0, "radius": 40, "attachedChairs": [] },
            { "type": "chair", "id": chair_id, "x": 50, "y": 0, "attachedTo": table_id }
        ]
    });
    let next = run(&AppState::default(), Action::SetState(SnapshotSource::Value(snapshot)));
    assert_eq!(next.element(table_id).unwrap().attached_chairs(), Some(&[chair_id][..]));
    assert!(check(&next.elements).is_empty());
}

// =============================================================
// AddElement / RemoveElements
// =============================================================

#[test]
fn add_appends_and_shares_existing() {
    let (state, _, _) = table_with_chair();
    let wall = create_default(ElementKind::Wall);
    let next = run(&state, Action::AddElement(wall.clone()));
    assert_eq!(next.elements.len(), 3);
    assert_eq!(next.elements[2].id(), wall.id());
    assert!(Arc::ptr_eq(&state.elements[0], &next.elements[0]));
    assert!(Arc::ptr_eq(&state.elements[1], &next.elements[1]));
}

#[test]
fn remove_table_detaches_its_chairs() {
    let (state, table_id, chair_id) = table_with_chair();
    let next = run(&state, Action::RemoveElements(vec![table_id]));
    assert!(!next.contains(table_id));
    let chair = next.element(chair_id).unwrap().as_chair().unwrap();
    assert!(chair.attached_to.is_none());
    assert!(chair.offset.is_none());
}

#[test]
fn remove_chair_strips_table_list() {
    let (state, table_id, chair_id) = table_with_chair();
    let next = run(&state, Action::RemoveElements(vec![chair_id]));
    assert_eq!(next.element(table_id).unwrap().attached_chairs(), Some(&[][..]));
    assert!(check(&next.elements).is_empty());
}

#[test]
fn remove_drops_group_membership() {
    let (mut state, table_id, chair_id) = table_with_chair();
    let group_id = uuid::Uuid::new_v4();
    state.groups.push(Group { id: group_id, element_ids: vec![table_id, chair_id] });
    let next = run(&state, Action::RemoveElements(vec![chair_id]));
    assert_eq!(next.groups[0].element_ids, vec![table_id]);
}

#[test]
fn remove_unknown_is_noop() {
    let (state, _, _) = table_with_chair();
    let next = run(&state, Action::RemoveElements(vec![uuid::Uuid::new_v4()]));
    assert_eq!(next, state);
}

// =============================================================
// Updates
// =============================================================

#[test]
fn update_elements_touches_only_listed() {
    let a = chair_at(0.0, 0.0);
    let b = chair_at(10.0, 10.0);
    let state = AppState { elements: vec![Arc::new(a.clone()), Arc::new(b)], ..AppState::default() };
    let next = run(&state, Action::UpdateElements(vec![ElementPatch::position(a.id(), 5.0, 5.0)]));
    assert_eq!(next.element(a.id()).unwrap().as_chair().unwrap().x, 5.0);
    assert!(!Arc::ptr_eq(&state.elements[0], &next.elements[0]));
    assert!(Arc::ptr_eq(&state.elements[1], &next.elements[1]));
}

#[test]
fn update_with_unknown_id_still_applies_others() {
    let a = chair_at(0.0, 0.0);
    let state = AppState { elements: vec![Arc::new(a.clone())], ..AppState::default() };
    let next = run(
        &state,
        Action::UpdateElementsWithoutHistory(vec![
            ElementPatch::position(uuid::Uuid::new_v4(), 1.0, 1.0),
            ElementPatch::position(a.id(), 7.0, 8.0),
        ]),
    );
    let chair = next.element(a.id()).unwrap().as_chair().unwrap();
    assert_eq!((chair.x, chair.y), (7.0, 8.0));
}

#[test]
fn update_patches_for_same_id_merge_in_order() {
    let a = chair_at(0.0, 0.0);
    let state = AppState { elements: vec![Arc::new(a.clone())], ..AppState::default() };
    let next = run(
        &state,
        Action::UpdateElements(vec![
            ElementPatch::position(a.id(), 1.0, 2.0),
            ElementPatch { x: Some(9.0), ..ElementPatch::new(a.id()) },
        ]),
    );
    let chair = next.element(a.id()).unwrap().as_chair().unwrap();
    assert_eq!((chair.x, chair.y), (9.0, 2.0));
}

#[test]
fn update_with_identical_values_keeps_arc() {
    let a = chair_at(3.0, 4.0);
    let state = AppState { elements: vec![Arc::new(a.clone())], ..AppState::default() };
    let next = run(&state, Action::UpdateElement(ElementPatch::position(a.id(), 3.0, 4.0)));
    assert!(Arc::ptr_eq(&state.elements[0], &next.elements[0]));
}

#[test]
fn update_attaching_chair_repairs_table() {
    let table = circle_table_at(0.0, 0.0);
    let chair = chair_at(50.0, 0.0);
    let state = AppState { elements: vec![Arc::new(table.clone()), Arc::new(chair.clone())], ..AppState::default() };
    let next = run(
        &state,
        Action::UpdateElement(ElementPatch {
            attached_to: Some(Some(table.id())),
            offset: Some(Some(Offset { dx: 50.0, dy: 0.0, angle: 0.0 })),
            ..ElementPatch::new(chair.id())
        }),
    );
    assert_eq!(next.element(table.id()).unwrap().attached_chairs(), Some(&[chair.id()][..]));
}

#[test]
fn update_field_sets_value() {
    let (state, table_id, _) = table_with_chair();
    let next = run(
        &state,
        Action::UpdateElementField { id: table_id, key: "name".into(), value: FieldValue::Text("Head table".into()) },
    );
    assert_eq!(next.element(table_id).unwrap().field("name"), Some(FieldValue::Text("Head table".into())));
}

#[test]
fn update_field_rejected_is_noop() {
    let (state, table_id, _) = table_with_chair();
    let next = run(
        &state,
        Action::UpdateElementField { id: table_id, key: "attachedChairs".into(), value: FieldValue::Text("x".into()) },
    );
    assert_eq!(next, state);
    assert!(Arc::ptr_eq(&state.elements[0], &next.elements[0]));
}

#[test]
fn update_field_table_type_keeps_chairs() {
    let (state, table_id, chair_id) = table_with_chair();
    let next = run(
        &state,
        Action::UpdateElementField { id: table_id, key: "type".into(), value: FieldValue::Text("rectTable".into()) },
    );
    let table = next.element(table_id).unwrap();
    assert_eq!(table.kind(), ElementKind::RectTable);
    assert_eq!(table.attached_chairs(), Some(&[chair_id][..]));
    assert!(check(&next.elements).is_empty());
}

// =============================================================
// DuplicateElements
// =============================================================

#[test]
fn duplicate_offsets_and_selects_clones() {
    let wall = create_default(ElementKind::Wall);
    let state = AppState { elements: vec![Arc::new(wall.clone())], ..AppState::default() };
    let transition = apply(&state, &Action::DuplicateElements(vec![wall.id()])).unwrap();
    let new_ids = transition.selection.unwrap();
    assert_eq!(new_ids.len(), 1);
    assert_ne!(new_ids[0], wall.id());
    let Element::Wall(w) = transition.state.element(new_ids[0]).unwrap() else {
        panic!("expected wall");
    };
    assert_eq!((w.x1, w.y1, w.x2, w.y2), (250.0, 150.0, 400.0, 150.0));
}

#[test]
fn duplicate_preserves_table_chair_topology() {
    let (state, table_id, chair_id) = table_with_chair();
    let transition = apply(&state, &Action::DuplicateElements(vec![table_id, chair_id])).unwrap();
    let new_ids = transition.selection.unwrap();
    let (new_table, new_chair) = (new_ids[0], new_ids[1]);
    let next = transition.state;

    assert_eq!(next.elements.len(), 4);
    assert_eq!(next.element(new_table).unwrap().attached_chairs(), Some(&[new_chair][..]));
    let chair = next.element(new_chair).unwrap().as_chair().unwrap();
    assert_eq!(chair.attached_to, Some(new_table));
    assert_eq!((chair.x, chair.y), (200.0, 150.0));
    assert_eq!(next.element(table_id).unwrap().attached_chairs(), Some(&[chair_id][..]));
    assert!(check(&next.elements).is_empty());
}

#[test]
fn duplicate_table_alone_has_no_chairs() {
    let (state, table_id, chair_id) = table_with_chair();
    let transition = apply(&state, &Action::DuplicateElements(vec![table_id])).unwrap();
    let clone = transition.selection.unwrap()[0];
    assert_eq!(transition.state.element(clone).unwrap().attached_chairs(), Some(&[][..]));
    assert_eq!(transition.state.element(table_id).unwrap().attached_chairs(), Some(&[chair_id][..]));
}

#[test]
fn duplicate_chair_alone_is_detached() {
    let (state, table_id, chair_id) = table_with_chair();
    let transition = apply(&state, &Action::DuplicateElements(vec![chair_id])).unwrap();
    let clone = transition.selection.unwrap()[0];
    let chair = transition.state.element(clone).unwrap().as_chair().unwrap();
    assert!(chair.attached_to.is_none());
    assert!(chair.offset.is_none());
    assert_eq!(transition.state.element(table_id).unwrap().attached_chairs(), Some(&[chair_id][..]));
}

#[test]
fn duplicate_respects_configured_offset() {
    let chair = chair_at(0.0, 0.0);
    let state = AppState { elements: vec![Arc::new(chair.clone())], ..AppState::default() };
    let config = EditorConfig { duplicate_offset: 5.0, ..EditorConfig::default() };
    let transition = apply_with(&state, &Action::DuplicateElements(vec![chair.id()]), &config).unwrap();
    let clone = transition.selection.unwrap()[0];
    let c = transition.state.element(clone).unwrap().as_chair().unwrap();
    assert_eq!((c.x, c.y), (5.0, 5.0));
}

#[test]
fn duplicate_skips_unknown_and_repeated_ids() {
    let chair = chair_at(0.0, 0.0);
    let state = AppState { elements: vec![Arc::new(chair.clone())], ..AppState::default() };
    let ids = vec![chair.id(), uuid::Uuid::new_v4(), chair.id()];
    let transition = apply(&state, &Action::DuplicateElements(ids)).unwrap();
    assert_eq!(transition.selection.unwrap().len(), 1);
    assert_eq!(transition.state.elements.len(), 2);
}

// =============================================================
// Build mode, groups, history markers
// =============================================================

#[test]
fn change_build_mode() {
    let next = run(&AppState::default(), Action::ChangeBuildMode(BuildMode::QuickWall));
    assert_eq!(next.build_mode, BuildMode::QuickWall);
}

#[test]
fn group_lifecycle() {
    let id = uuid::Uuid::new_v4();
    let member = uuid::Uuid::new_v4();
    let created = run(&AppState::default(), Action::CreateGroup(Group { id, element_ids: vec![] }));
    assert_eq!(created.groups.len(), 1);

    let updated = run(&created, Action::UpdateGroup(Group { id, element_ids: vec![member] }));
    assert_eq!(updated.groups[0].element_ids, vec![member]);

    let removed = run(&updated, Action::RemoveGroup(id));
    assert!(removed.groups.is_empty());
}

#[test]
fn history_markers_are_identity() {
    let (state, _, _) = table_with_chair();
    for action in [Action::CommitHistoryCheckpoint, Action::Undo, Action::Redo] {
        assert_eq!(run(&state, action), state);
    }
}
