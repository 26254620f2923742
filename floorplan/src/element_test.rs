#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn chair_at(x: f64, y: f64) -> Element {
    let mut el = create_default(ElementKind::Chair);
    if let Element::Chair(c) = &mut el {
        c.x = x;
        c.y = y;
    }
    el
}

// =============================================================
// Factory
// =============================================================

#[test]
fn create_default_produces_each_kind() {
    for kind in ElementKind::ALL {
        assert_eq!(create_default(kind).kind(), kind);
    }
}

#[test]
fn create_default_ids_are_unique() {
    let a = create_default(ElementKind::Chair);
    let b = create_default(ElementKind::Chair);
    assert_ne!(a.id(), b.id());
}

#[test]
fn default_chair_is_unattached() {
    let Element::Chair(c) = create_default(ElementKind::Chair) else {
        panic!("expected chair");
    };
    assert_eq!(c.radius, 10.0);
    assert_eq!(c.color, "#888");
    assert!(c.draggable);
    assert!(c.attached_to.is_none());
    assert!(c.offset.is_none());
}

#[test]
fn default_tables_have_no_chairs() {
    let rect = create_default(ElementKind::RectTable);
    let circle = create_default(ElementKind::CircleTable);
    assert_eq!(rect.attached_chairs(), Some(&[][..]));
    assert_eq!(circle.attached_chairs(), Some(&[][..]));
}

#[test]
fn wall_between_sets_endpoints() {
    let Element::Wall(w) = wall_between(Point::new(1.0, 2.0), Point::new(3.0, 4.0)) else {
        panic!("expected wall");
    };
    assert_eq!((w.x1, w.y1, w.x2, w.y2), (1.0, 2.0, 3.0, 4.0));
}

// =============================================================
// Serde
// =============================================================

#[test]
fn kind_discriminators() {
    for kind in ElementKind::ALL {
        let json = serde_json::to_value(kind).unwrap();
        assert_eq!(json, json!(kind.as_str()));
        assert_eq!(ElementKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(ElementKind::parse("sofa"), None);
}

#[test]
fn chair_serializes_with_type_tag_and_camel_case() {
    let el = chair_at(5.0, 6.0);
    let json = serde_json::to_value(&el).unwrap();
    assert_eq!(json["type"], "chair");
    assert_eq!(json["x"], 5.0);
    assert!(json["attachedTo"].is_null());
    assert!(json["offset"].is_null());
    assert!(json.get("employeeId").is_none());
}

#[test]
fn table_deserializes_with_missing_optional_fields() {
    let id = Uuid::new_v4();
    let el: Element = serde_json::from_value(json!({
        "type": "circleTable",
        "id": id,
        "x": 100,
        "y": 100,
        "radius": 40
    }))
    .unwrap();
    let Element::CircleTable(t) = el else {
        panic!("expected circle table");
    };
    assert_eq!(t.id, id);
    assert_eq!(t.name, "Table");
    assert!(t.attached_chairs.is_empty());
    assert!(t.draggable);
}

#[test]
fn chair_offset_without_angle_defaults_to_zero() {
    let el: Element = serde_json::from_value(json!({
        "type": "chair",
        "id": Uuid::new_v4(),
        "x": 0, "y": 0,
        "offset": { "dx": 3, "dy": 4 }
    }))
    .unwrap();
    let chair = el.as_chair().unwrap();
    assert_eq!(chair.offset, Some(Offset { dx: 3.0, dy: 4.0, angle: 0.0 }));
}

#[test]
fn unknown_kind_is_rejected() {
    let result = serde_json::from_value::<Element>(json!({ "type": "sofa", "id": Uuid::new_v4() }));
    assert!(result.is_err());
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn chair_bounds_are_centered_square() {
    assert_eq!(chair_at(100.0, 50.0).bounds(), Rect::new(90.0, 40.0, 20.0, 20.0));
}

#[test]
fn wall_bounds_include_selection_padding() {
    let wall = wall_between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    assert_eq!(wall.bounds(), Rect::new(-8.0, -8.0, 116.0, 16.0));
}

#[test]
fn rect_table_center_follows_rotation() {
    let mut el = create_default(ElementKind::RectTable);
    if let Element::RectTable(t) = &mut el {
        t.x = 0.0;
        t.y = 0.0;
        t.width = 80.0;
        t.height = 50.0;
        t.rotation = 90.0;
    }
    let center = el.table_shape().unwrap().center();
    assert!((center.x + 25.0).abs() < 1e-9);
    assert!((center.y - 40.0).abs() < 1e-9);
}

#[test]
fn translated_moves_wall_endpoints() {
    let wall = wall_between(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    let Element::Wall(w) = wall.translated(50.0, 50.0) else {
        panic!("expected wall");
    };
    assert_eq!((w.x1, w.y1, w.x2, w.y2), (50.0, 50.0, 60.0, 50.0));
}

#[test]
fn translated_rotated_wall_moves_in_world_space() {
    let mut wall = wall_between(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
    if let Element::Wall(w) = &mut wall {
        w.rotation = 90.0;
    }
    let moved = wall.translated(30.0, 0.0);
    let Element::Wall(w) = &moved else {
        panic!("expected wall");
    };
    let start = rotate_about(Point::new(w.x1, w.y1), Point::default(), w.rotation);
    let end = rotate_about(Point::new(w.x2, w.y2), Point::default(), w.rotation);
    assert!((start.x - 30.0).abs() < 1e-9 && start.y.abs() < 1e-9);
    assert!((end.x - 30.0).abs() < 1e-9 && (end.y - 100.0).abs() < 1e-9);
}

#[test]
fn with_id_keeps_everything_else() {
    let el = chair_at(1.0, 2.0);
    let new_id = Uuid::new_v4();
    let copy = el.with_id(new_id);
    assert_eq!(copy.id(), new_id);
    assert_eq!(copy.translated(0.0, 0.0).bounds(), el.bounds());
}

// =============================================================
// Inspector fields
// =============================================================

#[test]
fn editable_fields_per_kind() {
    let names = |kind| editable_fields(&create_default(kind)).iter().map(|f| f.name).collect::<Vec<_>>();
    assert_eq!(names(ElementKind::Chair), ["x", "y", "radius", "color"]);
    assert_eq!(names(ElementKind::Wall), ["x1", "y1", "x2", "y2", "color"]);
    assert_eq!(
        names(ElementKind::RectTable),
        ["name", "type", "x", "y", "width", "height", "rotation", "color"]
    );
    assert_eq!(names(ElementKind::CircleTable), ["name", "type", "x", "y", "radius", "rotation", "color"]);
    assert_eq!(names(ElementKind::Room), ["name", "x", "y", "width", "height", "rotation", "color"]);
}

#[test]
fn table_type_field_is_a_choice() {
    let table = create_default(ElementKind::RectTable);
    let field = editable_fields(&table).iter().find(|f| f.name == "type").unwrap();
    assert_eq!(field.control, FieldControl::Choice(&["rectTable", "circleTable"]));
}

#[test]
fn with_field_sets_number() {
    let el = chair_at(0.0, 0.0);
    let next = el.with_field("radius", &FieldValue::Number(15.0)).unwrap();
    assert_eq!(next.field("radius"), Some(FieldValue::Number(15.0)));
    assert_eq!(el.field("radius"), Some(FieldValue::Number(10.0)));
}

#[test]
fn with_field_parses_numeric_text() {
    let el = chair_at(0.0, 0.0);
    let next = el.with_field("x", &FieldValue::Text(" 42.5 ".into())).unwrap();
    assert_eq!(next.field("x"), Some(FieldValue::Number(42.5)));
}

#[test]
fn with_field_rejects_unlisted_and_mismatched() {
    let el = chair_at(0.0, 0.0);
    assert!(el.with_field("id", &FieldValue::Text("x".into())).is_none());
    assert!(el.with_field("attachedTo", &FieldValue::Text("x".into())).is_none());
    assert!(el.with_field("color", &FieldValue::Number(1.0)).is_none());
    assert!(el.with_field("x", &FieldValue::Text("abc".into())).is_none());
    assert!(el.with_field("radius", &FieldValue::Number(0.0)).is_none());
    assert!(el.with_field("x", &FieldValue::Number(f64::NAN)).is_none());
}

#[test]
fn switching_table_type_keeps_identity_and_chairs() {
    let chair_id = Uuid::new_v4();
    let mut el = create_default(ElementKind::RectTable);
    if let Element::RectTable(t) = &mut el {
        t.width = 80.0;
        t.height = 50.0;
        t.attached_chairs = vec![chair_id];
    }
    let circle = el.with_field("type", &FieldValue::Text("circleTable".into())).unwrap();
    assert_eq!(circle.kind(), ElementKind::CircleTable);
    assert_eq!(circle.id(), el.id());
    assert_eq!(circle.attached_chairs(), Some(&[chair_id][..]));
    assert_eq!(circle.field("radius"), Some(FieldValue::Number(25.0)));

    let back = circle.with_field("type", &FieldValue::Text("rectTable".into())).unwrap();
    assert_eq!(back.field("width"), Some(FieldValue::Number(50.0)));
    assert!(el.with_field("type", &FieldValue::Text("wall".into())).is_none());
}
