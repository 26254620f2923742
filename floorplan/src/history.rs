//! Linear undo/redo history and the `Editor` dispatch handle.
//!
//! `past` holds states to return to on undo (most recent last), `future`
//! holds states undone from (most recent undo last). Any new checkpoint
//! drops the whole `future`.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::sync::Arc;

use tracing::debug;

use crate::action::Action;
use crate::config::EditorConfig;
use crate::doc::AppState;
use crate::element::ElementId;
use crate::error::EditorError;
use crate::reducer;

#[derive(Debug, Clone, Default)]
pub struct History {
    past: Vec<AppState>,
    future: Vec<AppState>,
    /// Maximum `past` length; 0 is unbounded.
    limit: usize,
}

impl History {
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self { past: Vec::new(), future: Vec::new(), limit }
    }

    /// Record `state` as an undo boundary and drop the redo stack.
    pub fn checkpoint(&mut self, state: AppState) {
        self.past.push(state);
        self.future.clear();
        if self.limit > 0 && self.past.len() > self.limit {
            let excess = self.past.len() - self.limit;
            self.past.drain(..excess);
        }
    }

    /// Step back from `current`. `None` when there is nothing to undo.
    pub fn undo(&mut self, current: AppState) -> Option<AppState> {
        let previous = self.past.pop()?;
        self.future.push(current);
        Some(previous)
    }

    /// Step forward from `current`. `None` when there is nothing to redo.
    pub fn redo(&mut self, current: AppState) -> Option<AppState> {
        let next = self.future.pop()?;
        self.past.push(current);
        Some(next)
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatched {
    /// Whether the current state differs from the one before the dispatch.
    pub changed: bool,
    /// Selection dictated by the action, e.g. the clones after a duplicate.
    pub selection: Option<Vec<ElementId>>,
}

/// Cheap change test: elements compare by pointer, everything else by value.
fn same_state(a: &AppState, b: &AppState) -> bool {
    a.elements.len() == b.elements.len()
        && a.elements.iter().zip(&b.elements).all(|(x, y)| Arc::ptr_eq(x, y))
        && a.build_mode == b.build_mode
        && a.groups == b.groups
        && a.canvas_position == b.canvas_position
        && a.scale.total_cmp(&b.scale).is_eq()
}

/// Owns the live state and its history. All state changes go through
/// [`Editor::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct Editor {
    state: AppState,
    history: History,
    config: EditorConfig,
}

impl Editor {
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self { state: AppState::default(), history: History::with_limit(config.history_limit), config }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Apply one action, maintaining history.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Deserialization`] when a `SetState` snapshot
    /// cannot be decoded; the editor is left untouched.
    pub fn dispatch(&mut self, action: &Action) -> Result<Dispatched, EditorError> {
        let before = self.state.clone();
        let selection = match action {
            Action::Undo => {
                match self.history.undo(before.clone()) {
                    Some(previous) => self.state = previous,
                    None => debug!("nothing to undo"),
                }
                None
            }
            Action::Redo => {
                match self.history.redo(before.clone()) {
                    Some(next) => self.state = next,
                    None => debug!("nothing to redo"),
                }
                None
            }
            Action::SetState(_) => {
                let transition = reducer::apply_with(&self.state, action, &self.config)?;
                self.history.clear();
                self.state = transition.state;
                transition.selection
            }
            _ => {
                let transition = reducer::apply_with(&self.state, action, &self.config)?;
                if action.checkpoints() {
                    self.history.checkpoint(before.clone());
                }
                self.state = transition.state;
                transition.selection
            }
        };
        debug!(
            action = action.name(),
            undo = self.history.undo_depth(),
            redo = self.history.redo_depth(),
            "dispatched"
        );
        Ok(Dispatched { changed: !same_state(&before, &self.state), selection })
    }
}
