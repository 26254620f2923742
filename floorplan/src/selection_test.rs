#![allow(clippy::float_cmp)]

use std::sync::Arc;

use super::*;
use crate::element::{ElementKind, create_default};

// =============================================================
// Helpers
// =============================================================

fn chair(x: f64, y: f64, radius: f64) -> Element {
    let mut el = create_default(ElementKind::Chair);
    if let Element::Chair(c) = &mut el {
        c.x = x;
        c.y = y;
        c.radius = radius;
    }
    el
}

fn room(x: f64, y: f64, width: f64, height: f64) -> Element {
    let mut el = create_default(ElementKind::Room);
    if let Element::Room(r) = &mut el {
        r.x = x;
        r.y = y;
        r.width = width;
        r.height = height;
    }
    el
}

fn state_of(elements: &[Element]) -> AppState {
    AppState { elements: elements.iter().cloned().map(Arc::new).collect(), ..AppState::default() }
}

// =============================================================
// Marquee
// =============================================================

#[test]
fn marquee_rect_normalizes_direction() {
    let marquee = Marquee { start: Point::new(30.0, 40.0), end: Point::new(10.0, 0.0) };
    assert_eq!(marquee.rect(), Rect::new(10.0, 0.0, 20.0, 40.0));
}

#[test]
fn marquee_at_is_empty() {
    let marquee = Marquee::at(Point::new(5.0, 5.0));
    assert_eq!(marquee.rect(), Rect::new(5.0, 5.0, 0.0, 0.0));
}

#[test]
fn marquee_selects_intersecting_bounds() {
    let a = chair(5.0, 5.0, 5.0);
    let b = chair(25.0, 25.0, 5.0);
    let c = chair(105.0, 105.0, 5.0);
    let state = state_of(&[a.clone(), b.clone(), c]);

    let rect = Marquee { start: Point::new(0.0, 0.0), end: Point::new(35.0, 35.0) }.rect();
    assert_eq!(select_in_rect(&state, &rect), vec![a.id(), b.id()]);
}

#[test]
fn marquee_counts_touching_edges() {
    let a = room(10.0, 10.0, 20.0, 20.0);
    let state = state_of(&[a.clone()]);
    assert_eq!(select_in_rect(&state, &Rect::new(0.0, 0.0, 10.0, 10.0)), vec![a.id()]);
}

#[test]
fn marquee_on_empty_area_selects_nothing() {
    let state = state_of(&[chair(500.0, 500.0, 10.0)]);
    assert!(select_in_rect(&state, &Rect::new(0.0, 0.0, 50.0, 50.0)).is_empty());
}

// =============================================================
// Transform bake-in
// =============================================================

#[test]
fn radius_kinds_scale_by_horizontal_factor() {
    let c = chair(50.0, 50.0, 10.0);
    let state = state_of(&[c.clone()]);
    let node = NodeTransform { id: c.id(), scale_x: 2.0, scale_y: 3.0, rotation: 15.0 };

    let patches = transform_patches(&state, &[node], &EditorConfig::default());
    assert_eq!(patches.len(), 1);
    assert_eq!(patches[0].radius, Some(20.0));
    assert_eq!(patches[0].rotation, Some(15.0));
    assert_eq!(patches[0].x, None);
}

#[test]
fn radius_has_floor() {
    let c = chair(50.0, 50.0, 10.0);
    let state = state_of(&[c.clone()]);
    let node = NodeTransform { id: c.id(), scale_x: 0.1, scale_y: 0.1, rotation: 0.0 };

    let patches = transform_patches(&state, &[node], &EditorConfig::default());
    assert_eq!(patches[0].radius, Some(10.0));
}

#[test]
fn wall_endpoints_scale_per_axis() {
    let wall = create_default(ElementKind::Wall);
    let state = state_of(&[wall.clone()]);
    let node = NodeTransform { id: wall.id(), scale_x: 2.0, scale_y: 0.5, rotation: 30.0 };

    let patches = transform_patches(&state, &[node], &EditorConfig::default());
    let p = &patches[0];
    assert_eq!((p.x1, p.y1, p.x2, p.y2), (Some(400.0), Some(50.0), Some(700.0), Some(50.0)));
    assert_eq!(p.rotation, Some(30.0));
}

#[test]
fn rect_kinds_scale_size_and_unscale_position() {
    let r = room(100.0, 40.0, 200.0, 100.0);
    let state = state_of(&[r.clone()]);
    let node = NodeTransform { id: r.id(), scale_x: 2.0, scale_y: 0.5, rotation: 90.0 };

    let patches = transform_patches(&state, &[node], &EditorConfig::default());
    let p = &patches[0];
    assert_eq!(p.width, Some(400.0));
    assert_eq!(p.height, Some(50.0));
    assert_eq!(p.x, Some(50.0));
    assert_eq!(p.y, Some(80.0));
    assert_eq!(p.rotation, Some(90.0));
}

#[test]
fn rect_size_floor_comes_from_config() {
    let r = room(0.0, 0.0, 100.0, 100.0);
    let state = state_of(&[r.clone()]);
    let config = EditorConfig { min_transformed_size: 25.0, ..EditorConfig::default() };
    let node = NodeTransform { id: r.id(), scale_x: 0.1, scale_y: 0.1, rotation: 0.0 };

    let patches = transform_patches(&state, &[node], &config);
    assert_eq!(patches[0].width, Some(25.0));
    assert_eq!(patches[0].height, Some(25.0));
}

#[test]
fn zero_scale_keeps_position() {
    let r = room(100.0, 40.0, 200.0, 100.0);
    let state = state_of(&[r.clone()]);
    let node = NodeTransform { id: r.id(), scale_x: 0.0, scale_y: 1.0, rotation: 0.0 };

    let patches = transform_patches(&state, &[node], &EditorConfig::default());
    assert_eq!(patches[0].x, Some(100.0));
}

#[test]
fn pure_rotation_only_changes_rotation() {
    let c = chair(0.0, 0.0, 12.0);
    let state = state_of(&[c.clone()]);

    let patches = transform_patches(&state, &[NodeTransform::rotated(c.id(), 45.0)], &EditorConfig::default());
    assert_eq!(patches[0].radius, Some(12.0));
    assert_eq!(patches[0].rotation, Some(45.0));
}

#[test]
fn unknown_ids_are_skipped() {
    let state = state_of(&[chair(0.0, 0.0, 10.0)]);
    let node = NodeTransform::rotated(uuid::Uuid::new_v4(), 10.0);
    assert!(transform_patches(&state, &[node], &EditorConfig::default()).is_empty());
}
