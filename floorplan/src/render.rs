//! Rendering: draws the floor plan to a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It walks the scene tree built by [`crate::scene`] and paints the
//! editor overlays (selection boxes, marquee, pending quick-wall point). It
//! never mutates application state.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The callers in [`crate::engine::Engine`] handle the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::{Camera, Point};
use crate::doc::AppState;
use crate::export::ExportPlan;
use crate::geometry::Rect;
use crate::input::UiState;
use crate::scene::{self, Drawable, Stroke};

/// Arrowhead length in world units.
const ARROW_SIZE: f64 = 10.0;

/// Arrowhead half-angle in radians (~30°).
const ARROW_ANGLE: f64 = PI / 6.0;

/// Selection dash segment length in screen pixels.
const SELECTION_DASH_PX: f64 = 4.0;

/// Radius of the pending quick-wall marker in screen pixels.
const PENDING_WALL_RADIUS_PX: f64 = 4.0;

const SELECTION_COLOR: &str = "#1E90FF";

/// Draw the live editor view: elements, neighbour arrows and selection UI.
///
/// `viewport_w` and `viewport_h` are in CSS pixels. `dpr` is the device pixel ratio.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    state: &AppState,
    camera: &Camera,
    ui: &UiState,
    viewport_w: f64,
    viewport_h: f64,
    dpr: f64,
) -> Result<(), JsValue> {
    // Layer 1: clear and set up transforms.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, viewport_w, viewport_h);
    ctx.translate(camera.pan_x, camera.pan_y)?;
    ctx.scale(camera.zoom, camera.zoom)?;

    // Layer 2: elements in draw order.
    for drawable in scene::render_all(state, true) {
        draw_drawable(ctx, &drawable)?;
    }

    // Layer 3: neighbour arrows for a single selected chair.
    if let [only] = ui.selected.as_slice() {
        for arrow in scene::neighbour_arrows(state, *only) {
            draw_drawable(ctx, &arrow)?;
        }
    }

    // Layer 4: selection UI.
    for id in &ui.selected {
        if let Some(el) = state.element(*id) {
            draw_dashed_box(ctx, &el.bounds(), camera.zoom, None)?;
        }
    }
    if let Some(m) = ui.marquee {
        draw_dashed_box(ctx, &m.rect(), camera.zoom, Some("rgba(30, 144, 255, 0.12)"))?;
    }
    if let Some(p) = ui.pending_wall {
        draw_pending_wall(ctx, p, camera.zoom)?;
    }

    Ok(())
}

/// Draw the plan for export: white background, labels on, no editor UI,
/// `plan.region` mapped onto the whole target surface.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn draw_export(ctx: &CanvasRenderingContext2d, state: &AppState, plan: &ExportPlan) -> Result<(), JsValue> {
    let ratio = plan.pixel_ratio;
    let region = plan.region;
    ctx.set_transform(ratio, 0.0, 0.0, ratio, -region.x * ratio, -region.y * ratio)?;
    ctx.set_fill_style_str(plan.background);
    ctx.fill_rect(region.x, region.y, region.width, region.height);
    for drawable in scene::render_all(state, true) {
        draw_drawable(ctx, &drawable)?;
    }
    Ok(())
}

// =============================================================
// Scene tree
// =============================================================

fn draw_drawable(ctx: &CanvasRenderingContext2d, drawable: &Drawable) -> Result<(), JsValue> {
    match drawable {
        Drawable::Group { x, y, rotation, children } => {
            ctx.save();
            ctx.translate(*x, *y)?;
            ctx.rotate(rotation.to_radians())?;
            for child in children {
                draw_drawable(ctx, child)?;
            }
            ctx.restore();
        }
        Drawable::Circle { center, radius, fill } => {
            ctx.begin_path();
            ctx.arc(center.x, center.y, *radius, 0.0, 2.0 * PI)?;
            ctx.set_fill_style_str(fill);
            ctx.fill();
        }
        Drawable::Rect { rect, fill, stroke } => {
            ctx.set_fill_style_str(fill);
            ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
            if let Some(stroke) = stroke {
                apply_stroke(ctx, stroke);
                ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
            }
        }
        Drawable::Line { from, to, stroke } => {
            ctx.save();
            apply_stroke(ctx, stroke);
            ctx.set_line_cap("round");
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
            ctx.restore();
        }
        Drawable::Arrow { from, to, stroke } => {
            ctx.save();
            apply_stroke(ctx, stroke);
            ctx.set_fill_style_str(&stroke.color);
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
            let angle = (to.y - from.y).atan2(to.x - from.x);
            draw_arrowhead(ctx, to.x, to.y, angle);
            ctx.restore();
        }
        Drawable::Text { center, text, size, color } => draw_text(ctx, *center, text, *size, color)?,
    }
    Ok(())
}

fn draw_arrowhead(ctx: &CanvasRenderingContext2d, tip_x: f64, tip_y: f64, angle: f64) {
    let x1 = tip_x - ARROW_SIZE * (angle - ARROW_ANGLE).cos();
    let y1 = tip_y - ARROW_SIZE * (angle - ARROW_ANGLE).sin();
    let x2 = tip_x - ARROW_SIZE * (angle + ARROW_ANGLE).cos();
    let y2 = tip_y - ARROW_SIZE * (angle + ARROW_ANGLE).sin();

    ctx.begin_path();
    ctx.move_to(tip_x, tip_y);
    ctx.line_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.close_path();
    ctx.fill();
}

#[allow(clippy::cast_precision_loss)]
fn draw_text(ctx: &CanvasRenderingContext2d, center: Point, text: &str, size: f64, color: &str) -> Result<(), JsValue> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.is_empty() {
        return Ok(());
    }
    let line_height = size * 1.25;
    let start_y = center.y - line_height * (lines.len() - 1) as f64 * 0.5;

    ctx.save();
    ctx.set_fill_style_str(color);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_font(&format!("{size}px sans-serif"));
    for (idx, line) in lines.iter().enumerate() {
        ctx.fill_text(line, center.x, start_y + idx as f64 * line_height)?;
    }
    ctx.restore();
    Ok(())
}

// =============================================================
// Editor overlays
// =============================================================

fn draw_dashed_box(ctx: &CanvasRenderingContext2d, rect: &Rect, zoom: f64, fill: Option<&str>) -> Result<(), JsValue> {
    ctx.save();
    let dash_world = SELECTION_DASH_PX / zoom;
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash_world.into());
    dash_array.push(&dash_world.into());
    ctx.set_line_dash(&dash_array)?;
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    if let Some(fill) = fill {
        ctx.set_fill_style_str(fill);
        ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
    }
    ctx.stroke_rect(rect.x, rect.y, rect.width, rect.height);
    ctx.set_line_dash(&js_sys::Array::new())?;
    ctx.restore();
    Ok(())
}

fn draw_pending_wall(ctx: &CanvasRenderingContext2d, at: Point, zoom: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.begin_path();
    ctx.arc(at.x, at.y, PENDING_WALL_RADIUS_PX / zoom, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("#fff");
    ctx.fill();
    ctx.set_stroke_style_str(SELECTION_COLOR);
    ctx.set_line_width(1.0 / zoom);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
    ctx.set_stroke_style_str(&stroke.color);
    ctx.set_line_width(stroke.width);
}
