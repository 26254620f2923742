//! Document model: the editor's `AppState`, sparse element patches, and
//! snapshot decoding.
//!
//! `AppState` is both the unit of undo/redo snapshotting and the persisted
//! JSON format. Elements are held behind `Arc` so that a state transition
//! only allocates for the elements it actually changes; everything else is
//! shared with the previous state.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::element::{Element, ElementId, Offset};
use crate::error::EditorError;

/// Interaction mode of the editor. Persisted as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BuildMode {
    #[default]
    Select,
    /// Each click extends a chain of walls.
    QuickWall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown build mode {0}")]
pub struct UnknownBuildMode(pub u8);

impl TryFrom<u8> for BuildMode {
    type Error = UnknownBuildMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Select),
            1 => Ok(Self::QuickWall),
            other => Err(UnknownBuildMode(other)),
        }
    }
}

impl From<BuildMode> for u8 {
    fn from(mode: BuildMode) -> Self {
        match mode {
            BuildMode::Select => 0,
            BuildMode::QuickWall => 1,
        }
    }
}

/// A named set of elements. Groups are carried in snapshots but have no
/// behavior beyond membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,
    #[serde(default)]
    pub element_ids: Vec<ElementId>,
}

fn default_scale() -> f64 {
    1.0
}

/// Complete editor state, as snapshotted by history and persisted by save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub build_mode: BuildMode,
    /// Draw order; later elements are on top.
    #[serde(default)]
    pub elements: Vec<Arc<Element>>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub canvas_position: Point,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            build_mode: BuildMode::Select,
            elements: Vec::new(),
            groups: Vec::new(),
            canvas_position: Point::default(),
            scale: 1.0,
        }
    }
}

impl AppState {
    /// Decode a snapshot from its JSON text form.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Deserialization`] if the text is not a valid snapshot.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode a snapshot from a parsed JSON value. A JSON string is treated
    /// as the snapshot's text form and decoded in turn.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Deserialization`] if the value is not a valid snapshot.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, EditorError> {
        match value {
            serde_json::Value::String(text) => Self::from_json(&text),
            other => Ok(serde_json::from_value(other)?),
        }
    }

    /// Encode as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Serialization`] if serde cannot encode the state.
    pub fn to_json(&self) -> Result<String, EditorError> {
        serde_json::to_string(self).map_err(EditorError::Serialization)
    }

    /// Element with the given id.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id() == id).map(AsRef::as_ref)
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.iter().any(|el| el.id() == id)
    }

    /// Tables (both variants) in element order.
    pub fn tables(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().map(AsRef::as_ref).filter(|el| el.is_table())
    }

    /// Ids of every element, in element order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(|el| el.id()).collect()
    }
}

/// A snapshot handed to the editor by a load, in whatever form it arrived.
#[derive(Debug, Clone)]
pub enum SnapshotSource {
    /// Serialized JSON text.
    Text(String),
    /// Already-parsed JSON.
    Value(serde_json::Value),
    /// A decoded state.
    State(AppState),
}

impl SnapshotSource {
    /// Decode into an `AppState` without touching any editor.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Deserialization`] on malformed input.
    pub fn decode(self) -> Result<AppState, EditorError> {
        match self {
            Self::Text(text) => AppState::from_json(&text),
            Self::Value(value) => AppState::from_json_value(value),
            Self::State(state) => Ok(state),
        }
    }
}

/// Present-but-null deserializes to `Some(None)`, absent to `None`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Sparse update for one element. Only present fields are applied; fields
/// the element's kind does not have are ignored.
///
/// `attached_to`, `offset` and the employee fields are doubly optional:
/// `Some(None)` clears the field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    pub id: ElementId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub attached_to: Option<Option<ElementId>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub offset: Option<Option<Offset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attached_chairs: Option<Vec<ElementId>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub employee_name: Option<Option<String>>,
}

impl ElementPatch {
    /// Empty patch for `id`.
    #[must_use]
    pub fn new(id: ElementId) -> Self {
        Self { id, ..Self::default() }
    }

    /// Patch moving a positioned element to `(x, y)`.
    #[must_use]
    pub fn position(id: ElementId, x: f64, y: f64) -> Self {
        Self { id, x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Patch placing `element` at its position shifted by `(dx, dy)`. Walls
    /// move both endpoints.
    #[must_use]
    pub fn moved(element: &Element, dx: f64, dy: f64) -> Self {
        match element.translated(dx, dy) {
            Element::Chair(c) => Self::position(c.id, c.x, c.y),
            Element::RectTable(t) => Self::position(t.id, t.x, t.y),
            Element::CircleTable(t) => Self::position(t.id, t.x, t.y),
            Element::Room(r) => Self::position(r.id, r.x, r.y),
            Element::Wall(w) => Self {
                id: w.id,
                x1: Some(w.x1),
                y1: Some(w.y1),
                x2: Some(w.x2),
                y2: Some(w.y2),
                ..Self::default()
            },
        }
    }

    /// Patch clearing a chair's attachment.
    #[must_use]
    pub fn detached(id: ElementId) -> Self {
        Self { id, attached_to: Some(None), offset: Some(None), ..Self::default() }
    }

    /// Fold `other` into `self`; fields present in `other` win.
    pub fn merge(&mut self, other: ElementPatch) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field;
                })*
            };
        }
        take!(
            x,
            y,
            x1,
            y1,
            x2,
            y2,
            radius,
            width,
            height,
            rotation,
            name,
            color,
            attached_to,
            offset,
            attached_chairs,
            employee_id,
            employee_name
        );
    }

    /// Copy of `element` with this patch applied.
    #[must_use]
    pub fn apply(&self, element: &Element) -> Element {
        fn set<T: Clone>(slot: &mut T, value: Option<&T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        let mut next = element.clone();
        match &mut next {
            Element::Chair(c) => {
                set(&mut c.x, self.x.as_ref());
                set(&mut c.y, self.y.as_ref());
                set(&mut c.radius, self.radius.as_ref());
                set(&mut c.rotation, self.rotation.as_ref());
                set(&mut c.color, self.color.as_ref());
                set(&mut c.attached_to, self.attached_to.as_ref());
                set(&mut c.offset, self.offset.as_ref());
                set(&mut c.employee_id, self.employee_id.as_ref());
                set(&mut c.employee_name, self.employee_name.as_ref());
            }
            Element::RectTable(t) => {
                set(&mut t.name, self.name.as_ref());
                set(&mut t.x, self.x.as_ref());
                set(&mut t.y, self.y.as_ref());
                set(&mut t.width, self.width.as_ref());
                set(&mut t.height, self.height.as_ref());
                set(&mut t.rotation, self.rotation.as_ref());
                set(&mut t.color, self.color.as_ref());
                set(&mut t.attached_chairs, self.attached_chairs.as_ref());
            }
            Element::CircleTable(t) => {
                set(&mut t.name, self.name.as_ref());
                set(&mut t.x, self.x.as_ref());
                set(&mut t.y, self.y.as_ref());
                set(&mut t.radius, self.radius.as_ref());
                set(&mut t.rotation, self.rotation.as_ref());
                set(&mut t.color, self.color.as_ref());
                set(&mut t.attached_chairs, self.attached_chairs.as_ref());
            }
            Element::Wall(w) => {
                set(&mut w.x1, self.x1.as_ref());
                set(&mut w.y1, self.y1.as_ref());
                set(&mut w.x2, self.x2.as_ref());
                set(&mut w.y2, self.y2.as_ref());
                set(&mut w.rotation, self.rotation.as_ref());
                set(&mut w.color, self.color.as_ref());
            }
            Element::Room(r) => {
                set(&mut r.name, self.name.as_ref());
                set(&mut r.x, self.x.as_ref());
                set(&mut r.y, self.y.as_ref());
                set(&mut r.width, self.width.as_ref());
                set(&mut r.height, self.height.as_ref());
                set(&mut r.rotation, self.rotation.as_ref());
                set(&mut r.color, self.color.as_ref());
            }
        }
        next
    }
}
