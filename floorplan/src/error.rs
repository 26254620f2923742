//! Error types surfaced by the editor core.

/// Why an export could not produce an image.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportUnavailable {
    #[error("nothing to export: the floor plan has no visible content")]
    NoContent,
    #[error("no drawing surface is available for export")]
    MissingSurface,
    #[error("drawing surface error: {0}")]
    Surface(String),
}

/// Failures reported by [`crate::history::Editor::dispatch`] and the export path.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A snapshot handed to the editor could not be decoded. No state was applied.
    #[error("failed to decode floor-plan snapshot: {0}")]
    Deserialization(#[from] serde_json::Error),
    /// The editor state could not be encoded as JSON.
    #[error("failed to encode floor-plan snapshot: {0}")]
    Serialization(serde_json::Error),
    #[error("export unavailable: {0}")]
    ExportUnavailable(#[from] ExportUnavailable),
}
