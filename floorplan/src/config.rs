//! Runtime-tunable editor behavior.
//!
//! Every field has a default matching [`crate::consts`], so an empty JSON
//! object deserializes to the stock configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ATTACH_BUFFER, DUPLICATE_OFFSET, MIN_TRANSFORMED_SIZE};

/// How a dropped chair picks a table when several qualify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TieBreak {
    /// First qualifying table in element order.
    #[default]
    FirstMatch,
    /// Qualifying table whose center is closest to the drop point.
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Slack added to the touch distance for circular tables.
    pub attach_buffer: f64,
    pub tie_break: TieBreak,
    /// Offset applied on both axes to duplicated elements.
    pub duplicate_offset: f64,
    /// Floor for radii and sizes baked in at transform end.
    pub min_transformed_size: f64,
    /// Maximum number of undo snapshots kept; 0 keeps all.
    pub history_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            attach_buffer: ATTACH_BUFFER,
            tie_break: TieBreak::FirstMatch,
            duplicate_offset: DUPLICATE_OFFSET,
            min_transformed_size: MIN_TRANSFORMED_SIZE,
            history_limit: 0,
        }
    }
}
