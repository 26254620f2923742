//! Shared numeric constants for the floor-plan crate.

// ── Attachment ──────────────────────────────────────────────────

/// Extra slack, in world units, when testing a chair against a circular table.
pub const ATTACH_BUFFER: f64 = 20.0;

/// A rectangular table whose rotation is within this many radians of zero
/// is treated as axis-aligned for edge snapping.
pub const AXIS_ALIGNED_TOLERANCE_RAD: f64 = 0.01;

// ── Editing ─────────────────────────────────────────────────────

/// Offset applied to both axes of every duplicated element.
pub const DUPLICATE_OFFSET: f64 = 50.0;

/// Floor for radii and sizes baked in at the end of a resize transform.
pub const MIN_TRANSFORMED_SIZE: f64 = 10.0;

/// Padding around a wall segment that still counts as part of the wall.
pub const WALL_SELECTION_PADDING: f64 = 8.0;

/// Two chairs are neighbours when their centers are closer than this many
/// times the sum of their radii.
pub const NEIGHBOUR_FACTOR: f64 = 7.0;

// ── Camera ──────────────────────────────────────────────────────

/// Multiplicative zoom step per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 1.05;

/// Smallest allowed camera zoom.
pub const MIN_ZOOM: f64 = 0.05;

/// Largest allowed camera zoom.
pub const MAX_ZOOM: f64 = 20.0;

// ── Export ──────────────────────────────────────────────────────

/// Margin added on every side of the exported content bounds.
pub const EXPORT_PADDING: f64 = 50.0;

/// Device pixel ratio of the exported raster.
pub const EXPORT_PIXEL_RATIO: f64 = 2.0;

/// Background painted beneath exported content.
pub const EXPORT_BACKGROUND: &str = "#ffffff";
