//! Planning a raster export of the whole floor plan.
//!
//! The plan is computed in world space, so the exported image does not
//! depend on where the camera happens to be.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use tracing::debug;

use crate::consts::{EXPORT_BACKGROUND, EXPORT_PADDING, EXPORT_PIXEL_RATIO};
use crate::doc::AppState;
use crate::error::ExportUnavailable;
use crate::geometry::Rect;
use crate::scene::{self, Drawable};

/// What to rasterize and at what size.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// World-space region to capture, padding included.
    pub region: Rect,
    /// Output pixels per world unit.
    pub pixel_ratio: f64,
    /// Opaque fill beneath the content.
    pub background: &'static str,
}

impl ExportPlan {
    /// Output image size in pixels, rounded up.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = (self.region.width * self.pixel_ratio).ceil().max(1.0);
        let h = (self.region.height * self.pixel_ratio).ceil().max(1.0);
        (w as u32, h as u32)
    }
}

/// Union of the rendered bounds of every drawable with a positive area.
#[must_use]
pub fn content_bounds(drawables: &[Drawable]) -> Option<Rect> {
    drawables.iter().filter_map(Drawable::bounds).filter(Rect::has_area).reduce(|a, b| a.union(&b))
}

/// Plan an export of everything on the plan.
///
/// # Errors
///
/// Returns [`ExportUnavailable::NoContent`] when nothing visible is placed.
pub fn plan(state: &AppState) -> Result<ExportPlan, ExportUnavailable> {
    let drawables = scene::render_all(state, true);
    let content = content_bounds(&drawables).ok_or(ExportUnavailable::NoContent)?;
    let region = content.padded(EXPORT_PADDING);
    if !region.has_area() {
        return Err(ExportUnavailable::NoContent);
    }
    debug!(x = region.x, y = region.y, width = region.width, height = region.height, "planned export");
    Ok(ExportPlan { region, pixel_ratio: EXPORT_PIXEL_RATIO, background: EXPORT_BACKGROUND })
}
