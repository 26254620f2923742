//! Top-level editor engine.
//!
//! `EngineCore` turns pointer, wheel, keyboard and toolbox events into
//! dispatched [`Action`]s and reports what the host should do next as
//! [`Effect`]s. It has no browser dependencies so it can be tested natively.
//! `Engine` adds the canvas element: drawing and image export.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::sync::Arc;

use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::action::Action;
use crate::attach;
use crate::camera::{Camera, Point};
use crate::config::EditorConfig;
use crate::consts::WHEEL_ZOOM_STEP;
use crate::doc::{AppState, BuildMode, ElementPatch, SnapshotSource};
use crate::element::{Element, ElementId, ElementKind, FieldValue, create_default, wall_between};
use crate::error::{EditorError, ExportUnavailable};
use crate::export::{self, ExportPlan};
use crate::hit;
use crate::history::Editor;
use crate::input::{Button, InputState, Key, Modifiers, Shortcut, UiState, WheelDelta};
use crate::render;
use crate::seating::{self, Seat};
use crate::selection::{self, Marquee, NodeTransform};

/// Follow-up work for the host after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The view changed and should be redrawn.
    RenderNeeded,
    /// The selection changed; carries the new selection.
    SelectionChanged(Vec<ElementId>),
    /// Set the canvas CSS cursor.
    SetCursor(String),
}

/// Handle for an in-flight load. Only the most recently issued ticket may
/// hydrate the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Core engine state: everything that doesn't depend on the canvas element.
#[derive(Debug, Default)]
pub struct EngineCore {
    pub editor: Editor,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    load_generation: u64,
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        Self { editor: Editor::new(config), dpr: 1.0, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &AppState {
        self.editor.state()
    }

    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.ui.selected
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.state().element(id)
    }

    #[must_use]
    pub fn build_mode(&self) -> BuildMode {
        self.state().build_mode
    }

    // --- Dispatch ---

    /// Dispatch one action and translate the outcome into effects. The
    /// selection is pruned of ids the action removed.
    ///
    /// # Errors
    ///
    /// Propagates [`EditorError::Deserialization`] from `SetState`.
    pub fn dispatch(&mut self, action: &Action) -> Result<Vec<Effect>, EditorError> {
        let outcome = self.editor.dispatch(action)?;
        let mut effects = Vec::new();
        if let Some(selection) = outcome.selection {
            self.set_selection(selection, &mut effects);
        } else {
            let kept: Vec<ElementId> = self.ui.selected.iter().copied().filter(|id| self.state().contains(*id)).collect();
            if kept.len() != self.ui.selected.len() {
                self.set_selection(kept, &mut effects);
            }
        }
        if outcome.changed {
            push_render(&mut effects);
        }
        Ok(effects)
    }

    /// Dispatch an action that cannot fail to decode anything.
    fn apply(&mut self, action: &Action, effects: &mut Vec<Effect>) {
        match self.dispatch(action) {
            Ok(more) => {
                for effect in more {
                    push_effect(effects, effect);
                }
            }
            Err(err) => warn!(action = action.name(), %err, "dispatch failed"),
        }
    }

    fn set_selection(&mut self, selection: Vec<ElementId>, effects: &mut Vec<Effect>) {
        if selection != self.ui.selected {
            self.ui.selected = selection;
            push_effect(effects, Effect::SelectionChanged(self.ui.selected.clone()));
            push_render(effects);
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    // --- Toolbox and inspector ---

    /// Place a new default element of `kind` and select it.
    pub fn add_element(&mut self, kind: ElementKind) -> Vec<Effect> {
        let element = create_default(kind);
        let id = element.id();
        let mut effects = Vec::new();
        self.apply(&Action::AddElement(element), &mut effects);
        self.set_selection(vec![id], &mut effects);
        effects
    }

    /// Enter quick-wall mode, or leave it and drop any pending wall point.
    pub fn toggle_quick_wall(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        let next = match self.build_mode() {
            BuildMode::Select => BuildMode::QuickWall,
            BuildMode::QuickWall => BuildMode::Select,
        };
        self.ui.pending_wall = None;
        self.apply(&Action::ChangeBuildMode(next), &mut effects);
        push_render(&mut effects);
        effects
    }

    /// Inspector edit of one field.
    pub fn set_field(&mut self, id: ElementId, key: &str, value: FieldValue) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.apply(&Action::UpdateElementField { id, key: key.to_owned(), value }, &mut effects);
        effects
    }

    /// Seat a participant on a chair, or vacate it.
    pub fn assign_seat(&mut self, chair_id: ElementId, seat: Option<&Seat>) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.element(chair_id).and_then(Element::as_chair).is_none() {
            return effects;
        }
        self.apply(&Action::UpdateElement(seating::seat_patch(chair_id, seat)), &mut effects);
        effects
    }

    /// Detach a chair from its table. Does nothing for a detached chair.
    pub fn detach(&mut self, chair_id: ElementId) -> Vec<Effect> {
        let mut effects = Vec::new();
        let patches = attach::detach_chair(self.state(), chair_id);
        if !patches.is_empty() {
            self.apply(&Action::UpdateElements(patches), &mut effects);
        }
        effects
    }

    /// Bake a finished resize/rotate gesture into the transformed elements.
    pub fn on_transform_end(&mut self, nodes: &[NodeTransform]) -> Vec<Effect> {
        let mut effects = Vec::new();
        let patches = selection::transform_patches(self.state(), nodes, self.editor.config());
        if !patches.is_empty() {
            self.apply(&Action::UpdateElements(patches), &mut effects);
        }
        let ids = nodes.iter().map(|n| n.id).filter(|id| self.state().contains(*id)).collect();
        self.set_selection(ids, &mut effects);
        effects
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Effect> {
        let mut effects = Vec::new();
        if button != Button::Primary {
            self.input = InputState::Panning { last_screen: screen_pt };
            effects.push(Effect::SetCursor("grabbing".into()));
            return effects;
        }

        let world = self.camera.screen_to_world(screen_pt);
        if self.build_mode() == BuildMode::QuickWall {
            self.place_wall_point(world, &mut effects);
            return effects;
        }

        match hit::hit_test(world, self.state()) {
            Some(id) if modifiers.shift && self.ui.is_selected(id) => {
                let rest = self.ui.selected.iter().copied().filter(|s| *s != id).collect();
                self.set_selection(rest, &mut effects);
            }
            Some(id) => {
                let selection = if modifiers.shift {
                    let mut more = self.ui.selected.clone();
                    more.push(id);
                    more
                } else if self.ui.is_selected(id) {
                    self.ui.selected.clone()
                } else {
                    vec![id]
                };
                self.set_selection(selection, &mut effects);
                let original = self.state().elements.iter().find(|el| el.id() == id).map(Arc::clone);
                if let Some(original) = original.filter(|el| el.draggable()) {
                    self.input = InputState::DraggingElement { id, start_world: world, original, committed: false };
                }
            }
            None => {
                self.set_selection(Vec::new(), &mut effects);
                self.ui.marquee = Some(Marquee::at(world));
                self.input = InputState::Selecting;
                push_render(&mut effects);
            }
        }
        effects
    }

    /// Quick-wall click: the first click records a start point, each later
    /// click builds a wall from the pending point and moves it forward.
    fn place_wall_point(&mut self, world: Point, effects: &mut Vec<Effect>) {
        if let Some(start) = self.ui.pending_wall {
            self.apply(&Action::AddElement(wall_between(start, world)), effects);
        }
        self.ui.pending_wall = Some(world);
        push_render(effects);
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Effect> {
        let mut effects = Vec::new();
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Idle => {}
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                self.camera.pan_by(dx, dy);
                push_render(&mut effects);
            }
            InputState::Selecting => {
                if let Some(marquee) = &mut self.ui.marquee {
                    marquee.end = world;
                }
                push_render(&mut effects);
            }
            InputState::DraggingElement { id, start_world, original, committed } => {
                let first_move = !*committed;
                *committed = true;
                let (id, dx, dy) = (*id, world.x - start_world.x, world.y - start_world.y);
                let original = Arc::clone(original);
                if first_move {
                    self.apply(&Action::CommitHistoryCheckpoint, &mut effects);
                }
                let patches = self.drag_patches(id, &original, dx, dy);
                self.apply(&Action::UpdateElementsWithoutHistory(patches), &mut effects);
            }
        }
        effects
    }

    /// Patches moving `original` by `(dx, dy)`. A table carries its chairs along.
    fn drag_patches(&self, id: ElementId, original: &Element, dx: f64, dy: f64) -> Vec<ElementPatch> {
        match original {
            Element::CircleTable(t) => attach::follow_table(self.state(), id, Point::new(t.x + dx, t.y + dy)),
            Element::RectTable(t) => attach::follow_table(self.state(), id, Point::new(t.x + dx, t.y + dy)),
            other => vec![ElementPatch::moved(other, dx, dy)],
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Effect> {
        let mut effects = Vec::new();
        let world = self.camera.screen_to_world(screen_pt);
        match std::mem::take(&mut self.input) {
            InputState::Idle => {}
            InputState::Panning { .. } => effects.push(Effect::SetCursor("default".into())),
            InputState::Selecting => {
                if let Some(marquee) = self.ui.marquee.take() {
                    let picked = selection::select_in_rect(self.state(), &marquee.rect());
                    self.set_selection(picked, &mut effects);
                }
                push_render(&mut effects);
            }
            InputState::DraggingElement { id, start_world, original, committed } => {
                if !committed {
                    return effects;
                }
                let (dx, dy) = (world.x - start_world.x, world.y - start_world.y);
                let patches = match original.as_ref() {
                    Element::Chair(c) => {
                        let drop = Point::new(c.x + dx, c.y + dy);
                        attach::drop_chair(self.state(), id, drop, self.editor.config())
                    }
                    other => self.drag_patches(id, other, dx, dy),
                };
                self.apply(&Action::UpdateElementsWithoutHistory(patches), &mut effects);
            }
        }
        effects
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Effect> {
        let factor = if delta.dy > 0.0 { 1.0 / WHEEL_ZOOM_STEP } else { WHEEL_ZOOM_STEP };
        self.camera.zoom_at(screen_pt, factor);
        vec![Effect::RenderNeeded]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, text_input_focused: bool) -> Vec<Effect> {
        let mut effects = Vec::new();
        let Some(shortcut) = Shortcut::from_key(key, modifiers, text_input_focused) else {
            return effects;
        };
        debug!(?shortcut, "shortcut");
        match shortcut {
            Shortcut::Undo | Shortcut::Redo => {
                // A gesture in flight would keep editing the replaced state.
                self.input = InputState::Idle;
                self.ui.marquee = None;
                let action = if shortcut == Shortcut::Undo { Action::Undo } else { Action::Redo };
                self.apply(&action, &mut effects);
            }
            Shortcut::Delete => {
                if !self.ui.selected.is_empty() {
                    let doomed = std::mem::take(&mut self.ui.selected);
                    push_effect(&mut effects, Effect::SelectionChanged(Vec::new()));
                    self.apply(&Action::RemoveElements(doomed), &mut effects);
                }
            }
            Shortcut::Duplicate => {
                if !self.ui.selected.is_empty() {
                    self.apply(&Action::DuplicateElements(self.ui.selected.clone()), &mut effects);
                }
            }
            Shortcut::Escape => {
                self.set_selection(Vec::new(), &mut effects);
                self.ui.pending_wall = None;
                self.ui.marquee = None;
                self.input = InputState::Idle;
                if self.build_mode() != BuildMode::Select {
                    self.apply(&Action::ChangeBuildMode(BuildMode::Select), &mut effects);
                }
                push_render(&mut effects);
            }
        }
        effects
    }

    // --- Load / save ---

    /// Start a load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        LoadTicket(self.load_generation)
    }

    /// Finish a load started with `ticket`.
    ///
    /// A stale ticket or an absent snapshot leaves the editor alone. A
    /// snapshot replaces the state, clears history and selection, returns
    /// to select mode and restores the camera from the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Deserialization`] for a malformed snapshot;
    /// nothing is applied.
    pub fn finish_load(&mut self, ticket: LoadTicket, snapshot: Option<SnapshotSource>) -> Result<Vec<Effect>, EditorError> {
        if ticket.0 != self.load_generation {
            debug!(ticket = ticket.0, current = self.load_generation, "ignoring stale load");
            return Ok(Vec::new());
        }
        let Some(snapshot) = snapshot else {
            debug!("nothing to load");
            return Ok(Vec::new());
        };
        let state = snapshot.decode()?;
        let camera = Camera::from_view(state.canvas_position, state.scale);
        let mut effects = self.dispatch(&Action::SetState(SnapshotSource::State(state)))?;
        for effect in self.dispatch(&Action::ChangeBuildMode(BuildMode::Select))? {
            push_effect(&mut effects, effect);
        }
        self.camera = camera;
        self.ui = UiState::default();
        self.input = InputState::Idle;
        push_effect(&mut effects, Effect::SelectionChanged(Vec::new()));
        push_render(&mut effects);
        Ok(effects)
    }

    /// Current state with the live camera written into `canvasPosition` and `scale`.
    #[must_use]
    pub fn snapshot_for_save(&self) -> AppState {
        AppState { canvas_position: self.camera.position(), scale: self.camera.zoom, ..self.state().clone() }
    }

    /// [`EngineCore::snapshot_for_save`] as JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Serialization`] if the state cannot be encoded.
    pub fn save_json(&self) -> Result<String, EditorError> {
        self.snapshot_for_save().to_json()
    }

    /// Plan an image export of the whole plan.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ExportUnavailable`] when there is nothing to export.
    pub fn export_plan(&self) -> Result<ExportPlan, EditorError> {
        Ok(export::plan(self.state())?)
    }
}

fn push_effect(effects: &mut Vec<Effect>, effect: Effect) {
    match effect {
        Effect::RenderNeeded => push_render(effects),
        other => effects.push(other),
    }
}

fn push_render(effects: &mut Vec<Effect>) {
    if !effects.contains(&Effect::RenderNeeded) {
        effects.push(Effect::RenderNeeded);
    }
}

/// The full editor engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn surface_error(err: &JsValue) -> ExportUnavailable {
    ExportUnavailable::Surface(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self { canvas, core: EngineCore::new() }
    }

    #[must_use]
    pub fn with_config(canvas: HtmlCanvasElement, config: EditorConfig) -> Self {
        Self { canvas, core: EngineCore::with_config(config) }
    }

    /// Update viewport dimensions and resize the backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) {
        self.core.set_viewport(width_css, height_css, dpr);
        self.canvas.set_width((width_css * self.core.dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * self.core.dpr).round().max(0.0) as u32);
    }

    // --- Delegated input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Effect> {
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Effect> {
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Effect> {
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Effect> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers, text_input_focused: bool) -> Vec<Effect> {
        self.core.on_key_down(key, modifiers, text_input_focused)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a draw call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = context_2d(&self.canvas)?;
        render::draw(
            &ctx,
            self.core.state(),
            &self.core.camera,
            &self.core.ui,
            self.core.viewport_width,
            self.core.viewport_height,
            self.core.dpr,
        )
    }

    /// Rasterize the whole plan onto an offscreen canvas and return it as a
    /// JPEG data URL.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ExportUnavailable`] when the plan is empty,
    /// no document is available, or the browser refuses a drawing call.
    pub fn export_jpeg(&self) -> Result<String, EditorError> {
        let plan = self.core.export_plan()?;
        let document = web_sys::window().and_then(|w| w.document()).ok_or(ExportUnavailable::MissingSurface)?;
        let surface = document
            .create_element("canvas")
            .map_err(|e| surface_error(&e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| ExportUnavailable::MissingSurface)?;
        let (width, height) = plan.pixel_size();
        surface.set_width(width);
        surface.set_height(height);
        let ctx = context_2d(&surface).map_err(|e| surface_error(&e))?;
        render::draw_export(&ctx, self.core.state(), &plan).map_err(|e| surface_error(&e))?;
        let url = surface.to_data_url_with_type("image/jpeg").map_err(|e| surface_error(&e))?;
        debug!(width, height, "exported plan");
        Ok(url)
    }
}
