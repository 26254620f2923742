//! Input model: modifier keys, mouse buttons, keyboard shortcuts, and the
//! gesture state machine.
//!
//! `UiState` is what the renderer needs to see (selection, the marquee
//! rectangle, a pending quick-wall point). `InputState` is the gesture being
//! tracked between pointer-down and pointer-up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::sync::Arc;

use crate::camera::Point;
use crate::element::{Element, ElementId};
use crate::selection::Marquee;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"Delete"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Positive scrolls down.
    pub dy: f64,
}

/// Editor-wide keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    /// Remove the selection.
    Delete,
    /// Duplicate the selection.
    Duplicate,
    /// Clear selection and any pending wall, and return to select mode.
    Escape,
}

impl Shortcut {
    /// Map a key press to a shortcut. Nothing fires while a text field has focus.
    #[must_use]
    pub fn from_key(key: &Key, modifiers: Modifiers, text_input_focused: bool) -> Option<Self> {
        if text_input_focused {
            return None;
        }
        match key.0.as_str() {
            "z" | "Z" if modifiers.command() => Some(if modifiers.shift { Self::Redo } else { Self::Undo }),
            "y" | "Y" if modifiers.command() => Some(Self::Redo),
            "Delete" | "Backspace" => Some(Self::Delete),
            "d" | "D" if !modifiers.command() => Some(Self::Duplicate),
            "Escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Selected element ids, in selection order.
    pub selected: Vec<ElementId>,
    /// Marquee being dragged out, if any.
    pub marquee: Option<Marquee>,
    /// Start of the next quick-wall segment.
    pub pending_wall: Option<Point>,
}

impl UiState {
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }
}

/// Gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// Waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging out a marquee; the rectangle lives in `UiState::marquee`.
    Selecting,
    /// Moving one element.
    DraggingElement {
        id: ElementId,
        /// World-space pointer position at pointer-down.
        start_world: Point,
        /// The element as it was at pointer-down.
        original: Arc<Element>,
        /// Whether the pre-drag undo checkpoint has been taken. It is taken
        /// on the first move so a plain click leaves history alone.
        committed: bool,
    },
    /// Panning the camera.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
}
