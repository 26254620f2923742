#![allow(clippy::float_cmp)]

use std::sync::Arc;

use super::*;
use crate::camera::Point;
use crate::element::{Element, ElementKind, create_default};

fn chair_at(x: f64, y: f64) -> Element {
    let mut el = create_default(ElementKind::Chair);
    if let Element::Chair(c) = &mut el {
        c.x = x;
        c.y = y;
    }
    el
}

fn state_of(elements: &[Element]) -> AppState {
    AppState { elements: elements.iter().cloned().map(Arc::new).collect(), ..AppState::default() }
}

// =============================================================
// plan
// =============================================================

#[test]
fn empty_plan_is_unavailable() {
    assert_eq!(plan(&AppState::default()), Err(ExportUnavailable::NoContent));
}

#[test]
fn region_is_content_padded_by_fifty() {
    let state = state_of(&[chair_at(0.0, 0.0), chair_at(100.0, 50.0)]);
    let planned = plan(&state).unwrap();
    // Chairs span (-10, -10) to (110, 60).
    assert_eq!(planned.region, Rect::new(-60.0, -60.0, 220.0, 170.0));
    assert_eq!(planned.pixel_ratio, 2.0);
    assert_eq!(planned.background, "#ffffff");
}

#[test]
fn pixel_size_doubles_region() {
    let state = state_of(&[chair_at(0.0, 0.0)]);
    let planned = plan(&state).unwrap();
    assert_eq!(planned.pixel_size(), (240, 240));
}

#[test]
fn export_ignores_camera() {
    let mut state = state_of(&[chair_at(0.0, 0.0)]);
    let before = plan(&state).unwrap();
    state.canvas_position = Point::new(300.0, -200.0);
    state.scale = 3.0;
    assert_eq!(plan(&state).unwrap(), before);
}

#[test]
fn labels_widen_content() {
    let mut seated = chair_at(0.0, 0.0);
    if let Element::Chair(c) = &mut seated {
        c.employee_name = Some("A very long participant name".into());
    }
    let plain = plan(&state_of(&[chair_at(0.0, 0.0)])).unwrap();
    let labelled = plan(&state_of(&[seated])).unwrap();
    assert!(labelled.region.width > plain.region.width);
}

// =============================================================
// content_bounds
// =============================================================

#[test]
fn content_bounds_skips_degenerate_drawables() {
    let empty = Drawable::Group { x: 0.0, y: 0.0, rotation: 0.0, children: Vec::new() };
    let dot = Drawable::Rect { rect: Rect::new(5.0, 5.0, 0.0, 0.0), fill: "#000".into(), stroke: None };
    assert_eq!(content_bounds(&[empty, dot]), None);
}
