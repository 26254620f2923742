//! Actions accepted by the reducer.

use uuid::Uuid;

use crate::doc::{BuildMode, ElementPatch, Group, SnapshotSource};
use crate::element::{Element, ElementId, FieldValue};

#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the whole state with a loaded snapshot. Clears history.
    SetState(SnapshotSource),
    AddElement(Element),
    /// Remove every listed element and strip references to them.
    RemoveElements(Vec<ElementId>),
    UpdateElement(ElementPatch),
    /// Property-inspector edit of one named field.
    UpdateElementField { id: ElementId, key: String, value: FieldValue },
    UpdateElements(Vec<ElementPatch>),
    /// Same as `UpdateElements` but never creates an undo checkpoint.
    UpdateElementsWithoutHistory(Vec<ElementPatch>),
    /// Clone each listed element at an offset, remapping references among the clones.
    DuplicateElements(Vec<ElementId>),
    ChangeBuildMode(BuildMode),
    CreateGroup(Group),
    UpdateGroup(Group),
    RemoveGroup(Uuid),
    /// Mark the current state as an undo boundary.
    CommitHistoryCheckpoint,
    Undo,
    Redo,
}

impl Action {
    /// Whether applying this action pushes the prior state onto the undo stack.
    #[must_use]
    pub fn checkpoints(&self) -> bool {
        matches!(
            self,
            Self::AddElement(_)
                | Self::RemoveElements(_)
                | Self::UpdateElement(_)
                | Self::UpdateElementField { .. }
                | Self::UpdateElements(_)
                | Self::DuplicateElements(_)
                | Self::CommitHistoryCheckpoint
        )
    }

    /// Short name for log events.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetState(_) => "set_state",
            Self::AddElement(_) => "add_element",
            Self::RemoveElements(_) => "remove_elements",
            Self::UpdateElement(_) => "update_element",
            Self::UpdateElementField { .. } => "update_element_field",
            Self::UpdateElements(_) => "update_elements",
            Self::UpdateElementsWithoutHistory(_) => "update_elements_without_history",
            Self::DuplicateElements(_) => "duplicate_elements",
            Self::ChangeBuildMode(_) => "change_build_mode",
            Self::CreateGroup(_) => "create_group",
            Self::UpdateGroup(_) => "update_group",
            Self::RemoveGroup(_) => "remove_group",
            Self::CommitHistoryCheckpoint => "commit_history_checkpoint",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}
