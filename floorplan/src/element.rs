//! Element model: the five kinds of things that can be placed on a floor plan.
//!
//! Every element is a plain record; "mutations" construct a new record and
//! leave the original untouched. Chairs and tables reference each other by
//! id only (`Chair::attached_to`, `attached_chairs` on tables); the reducer
//! keeps both sides consistent.
//!
//! Coordinates follow the scene graph: chairs and circular tables are
//! positioned by their center, rectangular tables and rooms by their
//! top-left corner (and rotate about it), walls by their two endpoints
//! (and rotate about the world origin of their own group).

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::WALL_SELECTION_PADDING;
use crate::geometry::{Rect, circle_bounds, rotate_about, rotated_rect_bounds};

/// Unique identifier for an element. Generated once, never reused.
pub type ElementId = Uuid;

/// Discriminator for the five element kinds, as it appears in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Chair,
    RectTable,
    CircleTable,
    Wall,
    Room,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [Self::Chair, Self::RectTable, Self::CircleTable, Self::Wall, Self::Room];

    /// Snapshot discriminator string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chair => "chair",
            Self::RectTable => "rectTable",
            Self::CircleTable => "circleTable",
            Self::Wall => "wall",
            Self::Room => "room",
        }
    }

    /// Inverse of [`ElementKind::as_str`].
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    #[must_use]
    pub fn is_table(self) -> bool {
        matches!(self, Self::RectTable | Self::CircleTable)
    }
}

/// Position of an attached chair relative to its table's center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
    /// Snap angle in radians.
    #[serde(default)]
    pub angle: f64,
}

fn default_true() -> bool {
    true
}

fn default_chair_radius() -> f64 {
    10.0
}

fn default_chair_color() -> String {
    "#888".into()
}

fn default_table_name() -> String {
    "Table".into()
}

fn default_table_color() -> String {
    "#a57272".into()
}

fn default_stroke() -> String {
    "#333".into()
}

fn default_rect_table_width() -> f64 {
    120.0
}

fn default_rect_table_height() -> f64 {
    60.0
}

fn default_circle_table_radius() -> f64 {
    40.0
}

fn default_wall_color() -> String {
    "#444".into()
}

fn default_room_name() -> String {
    "Room".into()
}

fn default_room_color() -> String {
    "#EEE".into()
}

fn default_room_size() -> f64 {
    200.0
}

/// A single seat. May be attached to at most one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chair {
    pub id: ElementId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    #[serde(default = "default_chair_radius")]
    pub radius: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_chair_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub draggable: bool,
    /// Table this chair is snapped to.
    #[serde(default)]
    pub attached_to: Option<ElementId>,
    /// Only meaningful while `attached_to` is set.
    #[serde(default)]
    pub offset: Option<Offset>,
    /// Participant seated on this chair, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<String>,
}

/// Rectangular table, positioned by its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectTable {
    pub id: ElementId,
    #[serde(default = "default_table_name")]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_rect_table_width")]
    pub width: f64,
    #[serde(default = "default_rect_table_height")]
    pub height: f64,
    /// Degrees, about the top-left corner.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_table_color")]
    pub color: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_true")]
    pub draggable: bool,
    #[serde(default)]
    pub attached_chairs: Vec<ElementId>,
}

/// Round table, positioned by its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleTable {
    pub id: ElementId,
    #[serde(default = "default_table_name")]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_circle_table_radius")]
    pub radius: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_table_color")]
    pub color: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_true")]
    pub draggable: bool,
    #[serde(default)]
    pub attached_chairs: Vec<ElementId>,
}

/// A straight wall segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: ElementId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Degrees, about the origin of the wall's own coordinate space.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_wall_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub draggable: bool,
}

/// A filled, outlined floor area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: ElementId,
    #[serde(default = "default_room_name")]
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_room_size")]
    pub width: f64,
    #[serde(default = "default_room_size")]
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_room_color")]
    pub color: String,
    #[serde(default = "default_stroke")]
    pub stroke: String,
    #[serde(default = "default_true")]
    pub draggable: bool,
}

/// A placed floor-plan element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Element {
    Chair(Chair),
    RectTable(RectTable),
    CircleTable(CircleTable),
    Wall(Wall),
    Room(Room),
}

/// Geometry of a table, independent of its variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TableShape {
    Circle { center: Point, radius: f64 },
    Rect { origin: Point, width: f64, height: f64, rotation: f64 },
}

impl TableShape {
    /// Visual center of the table.
    #[must_use]
    pub fn center(&self) -> Point {
        match *self {
            Self::Circle { center, .. } => center,
            Self::Rect { origin, width, height, rotation } => {
                rotate_about(origin.offset(width / 2.0, height / 2.0), origin, rotation)
            }
        }
    }

    /// On-screen axis-aligned bounds.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match *self {
            Self::Circle { center, radius } => circle_bounds(center, radius),
            Self::Rect { origin, width, height, rotation } => rotated_rect_bounds(origin, width, height, rotation),
        }
    }
}

/// Create a new element of `kind` with a fresh id and the kind's defaults.
#[must_use]
pub fn create_default(kind: ElementKind) -> Element {
    let id = Uuid::new_v4();
    match kind {
        ElementKind::Chair => Element::Chair(Chair {
            id,
            x: 200.0,
            y: 100.0,
            radius: default_chair_radius(),
            rotation: 0.0,
            color: default_chair_color(),
            draggable: true,
            attached_to: None,
            offset: None,
            employee_id: None,
            employee_name: None,
        }),
        ElementKind::RectTable => Element::RectTable(RectTable {
            id,
            name: default_table_name(),
            x: 200.0,
            y: 100.0,
            width: default_rect_table_width(),
            height: default_rect_table_height(),
            rotation: 0.0,
            color: default_table_color(),
            stroke: default_stroke(),
            draggable: true,
            attached_chairs: Vec::new(),
        }),
        ElementKind::CircleTable => Element::CircleTable(CircleTable {
            id,
            name: default_table_name(),
            x: 200.0,
            y: 100.0,
            radius: default_circle_table_radius(),
            rotation: 0.0,
            color: default_table_color(),
            stroke: default_stroke(),
            draggable: true,
            attached_chairs: Vec::new(),
        }),
        ElementKind::Wall => Element::Wall(Wall {
            id,
            x1: 200.0,
            y1: 100.0,
            x2: 350.0,
            y2: 100.0,
            rotation: 0.0,
            color: default_wall_color(),
            draggable: true,
        }),
        ElementKind::Room => Element::Room(Room {
            id,
            name: default_room_name(),
            x: 200.0,
            y: 100.0,
            width: default_room_size(),
            height: default_room_size(),
            rotation: 0.0,
            color: default_room_color(),
            stroke: default_stroke(),
            draggable: true,
        }),
    }
}

/// A new wall between two points, otherwise defaulted.
#[must_use]
pub fn wall_between(a: Point, b: Point) -> Element {
    let mut wall = create_default(ElementKind::Wall);
    if let Element::Wall(w) = &mut wall {
        w.x1 = a.x;
        w.y1 = a.y;
        w.x2 = b.x;
        w.y2 = b.y;
    }
    wall
}

// =============================================================
// Inspector fields
// =============================================================

/// Control a property inspector should use for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldControl {
    Number,
    Text,
    Choice(&'static [&'static str]),
}

/// One user-editable field of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditableField {
    pub name: &'static str,
    pub control: FieldControl,
}

const fn number(name: &'static str) -> EditableField {
    EditableField { name, control: FieldControl::Number }
}

const fn text(name: &'static str) -> EditableField {
    EditableField { name, control: FieldControl::Text }
}

const TABLE_TYPES: &[&str] = &["rectTable", "circleTable"];

const CHAIR_FIELDS: &[EditableField] = &[number("x"), number("y"), number("radius"), text("color")];

const RECT_TABLE_FIELDS: &[EditableField] = &[
    text("name"),
    EditableField { name: "type", control: FieldControl::Choice(TABLE_TYPES) },
    number("x"),
    number("y"),
    number("width"),
    number("height"),
    number("rotation"),
    text("color"),
];

const CIRCLE_TABLE_FIELDS: &[EditableField] = &[
    text("name"),
    EditableField { name: "type", control: FieldControl::Choice(TABLE_TYPES) },
    number("x"),
    number("y"),
    number("radius"),
    number("rotation"),
    text("color"),
];

const WALL_FIELDS: &[EditableField] = &[number("x1"), number("y1"), number("x2"), number("y2"), text("color")];

const ROOM_FIELDS: &[EditableField] = &[
    text("name"),
    number("x"),
    number("y"),
    number("width"),
    number("height"),
    number("rotation"),
    text("color"),
];

/// Fields a property inspector may edit, in display order.
#[must_use]
pub fn editable_fields(element: &Element) -> &'static [EditableField] {
    match element {
        Element::Chair(_) => CHAIR_FIELDS,
        Element::RectTable(_) => RECT_TABLE_FIELDS,
        Element::CircleTable(_) => CIRCLE_TABLE_FIELDS,
        Element::Wall(_) => WALL_FIELDS,
        Element::Room(_) => ROOM_FIELDS,
    }
}

/// A value written by the property inspector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view; text that parses as a finite number is accepted.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            Self::Number(n) => *n,
            Self::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => n,
                Err(_) => return None,
            },
        };
        n.is_finite().then_some(n)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

// =============================================================
// Element accessors
// =============================================================

impl Element {
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Self::Chair(c) => c.id,
            Self::RectTable(t) => t.id,
            Self::CircleTable(t) => t.id,
            Self::Wall(w) => w.id,
            Self::Room(r) => r.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Chair(_) => ElementKind::Chair,
            Self::RectTable(_) => ElementKind::RectTable,
            Self::CircleTable(_) => ElementKind::CircleTable,
            Self::Wall(_) => ElementKind::Wall,
            Self::Room(_) => ElementKind::Room,
        }
    }

    #[must_use]
    pub fn rotation(&self) -> f64 {
        match self {
            Self::Chair(c) => c.rotation,
            Self::RectTable(t) => t.rotation,
            Self::CircleTable(t) => t.rotation,
            Self::Wall(w) => w.rotation,
            Self::Room(r) => r.rotation,
        }
    }

    #[must_use]
    pub fn draggable(&self) -> bool {
        match self {
            Self::Chair(c) => c.draggable,
            Self::RectTable(t) => t.draggable,
            Self::CircleTable(t) => t.draggable,
            Self::Wall(w) => w.draggable,
            Self::Room(r) => r.draggable,
        }
    }

    #[must_use]
    pub fn as_chair(&self) -> Option<&Chair> {
        match self {
            Self::Chair(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_table(&self) -> bool {
        self.kind().is_table()
    }

    /// Chairs attached to this element, if it is a table.
    #[must_use]
    pub fn attached_chairs(&self) -> Option<&[ElementId]> {
        match self {
            Self::RectTable(t) => Some(&t.attached_chairs),
            Self::CircleTable(t) => Some(&t.attached_chairs),
            _ => None,
        }
    }

    /// Table geometry, if this element is a table.
    #[must_use]
    pub fn table_shape(&self) -> Option<TableShape> {
        match self {
            Self::RectTable(t) => Some(TableShape::Rect {
                origin: Point::new(t.x, t.y),
                width: t.width,
                height: t.height,
                rotation: t.rotation,
            }),
            Self::CircleTable(t) => Some(TableShape::Circle { center: Point::new(t.x, t.y), radius: t.radius }),
            _ => None,
        }
    }

    /// Rendered bounding box in world coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Chair(c) => circle_bounds(Point::new(c.x, c.y), c.radius),
            Self::RectTable(t) => rotated_rect_bounds(Point::new(t.x, t.y), t.width, t.height, t.rotation),
            Self::CircleTable(t) => circle_bounds(Point::new(t.x, t.y), t.radius),
            Self::Room(r) => rotated_rect_bounds(Point::new(r.x, r.y), r.width, r.height, r.rotation),
            Self::Wall(w) => {
                let hit_area = Rect::from_corners(Point::new(w.x1, w.y1), Point::new(w.x2, w.y2))
                    .padded(WALL_SELECTION_PADDING);
                let origin = Point::default();
                let corners = [
                    Point::new(hit_area.x, hit_area.y),
                    Point::new(hit_area.right(), hit_area.y),
                    Point::new(hit_area.right(), hit_area.bottom()),
                    Point::new(hit_area.x, hit_area.bottom()),
                ]
                .map(|p| rotate_about(p, origin, w.rotation));
                Rect::enclosing(&corners).unwrap_or(hit_area)
            }
        }
    }

    /// Copy of this element under a different id.
    #[must_use]
    pub fn with_id(&self, id: ElementId) -> Element {
        let mut next = self.clone();
        match &mut next {
            Self::Chair(c) => c.id = id,
            Self::RectTable(t) => t.id = id,
            Self::CircleTable(t) => t.id = id,
            Self::Wall(w) => w.id = id,
            Self::Room(r) => r.id = id,
        }
        next
    }

    /// Copy of this element moved by the world-space delta `(dx, dy)`.
    #[must_use]
    pub fn translated(&self, dx: f64, dy: f64) -> Element {
        let mut next = self.clone();
        match &mut next {
            Self::Chair(c) => {
                c.x += dx;
                c.y += dy;
            }
            Self::RectTable(t) => {
                t.x += dx;
                t.y += dy;
            }
            Self::CircleTable(t) => {
                t.x += dx;
                t.y += dy;
            }
            Self::Wall(w) => {
                // Endpoints live in the wall's rotated frame.
                let local = rotate_about(Point::new(dx, dy), Point::default(), -w.rotation);
                w.x1 += local.x;
                w.y1 += local.y;
                w.x2 += local.x;
                w.y2 += local.y;
            }
            Self::Room(r) => {
                r.x += dx;
                r.y += dy;
            }
        }
        next
    }

    /// Current value of an inspector field, if the element has it.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<FieldValue> {
        let num = |n: f64| Some(FieldValue::Number(n));
        let txt = |s: &str| Some(FieldValue::Text(s.to_owned()));
        match (self, key) {
            (_, "type") => txt(self.kind().as_str()),
            (Self::Chair(c), "x") => num(c.x),
            (Self::Chair(c), "y") => num(c.y),
            (Self::Chair(c), "radius") => num(c.radius),
            (Self::Chair(c), "color") => txt(&c.color),
            (Self::RectTable(t), "name") => txt(&t.name),
            (Self::RectTable(t), "x") => num(t.x),
            (Self::RectTable(t), "y") => num(t.y),
            (Self::RectTable(t), "width") => num(t.width),
            (Self::RectTable(t), "height") => num(t.height),
            (Self::RectTable(t), "rotation") => num(t.rotation),
            (Self::RectTable(t), "color") => txt(&t.color),
            (Self::CircleTable(t), "name") => txt(&t.name),
            (Self::CircleTable(t), "x") => num(t.x),
            (Self::CircleTable(t), "y") => num(t.y),
            (Self::CircleTable(t), "radius") => num(t.radius),
            (Self::CircleTable(t), "rotation") => num(t.rotation),
            (Self::CircleTable(t), "color") => txt(&t.color),
            (Self::Wall(w), "x1") => num(w.x1),
            (Self::Wall(w), "y1") => num(w.y1),
            (Self::Wall(w), "x2") => num(w.x2),
            (Self::Wall(w), "y2") => num(w.y2),
            (Self::Wall(w), "color") => txt(&w.color),
            (Self::Room(r), "name") => txt(&r.name),
            (Self::Room(r), "x") => num(r.x),
            (Self::Room(r), "y") => num(r.y),
            (Self::Room(r), "width") => num(r.width),
            (Self::Room(r), "height") => num(r.height),
            (Self::Room(r), "rotation") => num(r.rotation),
            (Self::Room(r), "color") => txt(&r.color),
            _ => None,
        }
    }

    /// Copy of this element with one inspector field replaced.
    ///
    /// Returns `None` when `key` is not editable for this kind or `value`
    /// does not fit the field (wrong type, non-finite, non-positive size).
    #[must_use]
    pub fn with_field(&self, key: &str, value: &FieldValue) -> Option<Element> {
        let field = editable_fields(self).iter().find(|f| f.name == key)?;
        match field.control {
            FieldControl::Choice(options) => {
                let choice = value.as_text()?;
                if !options.contains(&choice) {
                    return None;
                }
                self.with_table_type(ElementKind::parse(choice)?)
            }
            FieldControl::Text => {
                let s = value.as_text()?.to_owned();
                let mut next = self.clone();
                match (&mut next, key) {
                    (Self::Chair(c), "color") => c.color = s,
                    (Self::RectTable(t), "name") => t.name = s,
                    (Self::RectTable(t), "color") => t.color = s,
                    (Self::CircleTable(t), "name") => t.name = s,
                    (Self::CircleTable(t), "color") => t.color = s,
                    (Self::Wall(w), "color") => w.color = s,
                    (Self::Room(r), "name") => r.name = s,
                    (Self::Room(r), "color") => r.color = s,
                    _ => return None,
                }
                Some(next)
            }
            FieldControl::Number => {
                let n = value.as_number()?;
                if matches!(key, "radius" | "width" | "height") && n <= 0.0 {
                    return None;
                }
                let mut next = self.clone();
                let slot = match (&mut next, key) {
                    (Self::Chair(c), "x") => &mut c.x,
                    (Self::Chair(c), "y") => &mut c.y,
                    (Self::Chair(c), "radius") => &mut c.radius,
                    (Self::RectTable(t), "x") => &mut t.x,
                    (Self::RectTable(t), "y") => &mut t.y,
                    (Self::RectTable(t), "width") => &mut t.width,
                    (Self::RectTable(t), "height") => &mut t.height,
                    (Self::RectTable(t), "rotation") => &mut t.rotation,
                    (Self::CircleTable(t), "x") => &mut t.x,
                    (Self::CircleTable(t), "y") => &mut t.y,
                    (Self::CircleTable(t), "radius") => &mut t.radius,
                    (Self::CircleTable(t), "rotation") => &mut t.rotation,
                    (Self::Wall(w), "x1") => &mut w.x1,
                    (Self::Wall(w), "y1") => &mut w.y1,
                    (Self::Wall(w), "x2") => &mut w.x2,
                    (Self::Wall(w), "y2") => &mut w.y2,
                    (Self::Room(r), "x") => &mut r.x,
                    (Self::Room(r), "y") => &mut r.y,
                    (Self::Room(r), "width") => &mut r.width,
                    (Self::Room(r), "height") => &mut r.height,
                    (Self::Room(r), "rotation") => &mut r.rotation,
                    _ => return None,
                };
                *slot = n;
                Some(next)
            }
        }
    }

    /// Convert a table between its rectangular and circular variants,
    /// keeping identity, placement, styling and attachments.
    fn with_table_type(&self, target: ElementKind) -> Option<Element> {
        match (self, target) {
            (Self::RectTable(_), ElementKind::RectTable) | (Self::CircleTable(_), ElementKind::CircleTable) => {
                Some(self.clone())
            }
            (Self::RectTable(t), ElementKind::CircleTable) => Some(Self::CircleTable(CircleTable {
                id: t.id,
                name: t.name.clone(),
                x: t.x,
                y: t.y,
                radius: t.width.min(t.height) / 2.0,
                rotation: t.rotation,
                color: t.color.clone(),
                stroke: t.stroke.clone(),
                draggable: t.draggable,
                attached_chairs: t.attached_chairs.clone(),
            })),
            (Self::CircleTable(t), ElementKind::RectTable) => Some(Self::RectTable(RectTable {
                id: t.id,
                name: t.name.clone(),
                x: t.x,
                y: t.y,
                width: t.radius * 2.0,
                height: t.radius * 2.0,
                rotation: t.rotation,
                color: t.color.clone(),
                stroke: t.stroke.clone(),
                draggable: t.draggable,
                attached_chairs: t.attached_chairs.clone(),
            })),
            _ => None,
        }
    }
}
