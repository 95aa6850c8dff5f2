//! Rendering: paints a [`Scene`] onto a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! It draws what [`crate::scene::build`] produced and never reads editor
//! state. The page raster lives underneath the canvas in the host, so each
//! frame starts from a cleared, transparent surface.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.
//! The top-level caller ([`crate::engine::Engine::render`]) handles the result.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::consts::{DRAFT_VERTEX_RADIUS_PX, HANDLE_RADIUS_PX, LOCKED_DASH_PX};
use crate::geom::Point;
use crate::scene::{DraftShape, Handle, Line, PolygonShape, Scene};

const OUTLINE: &str = "#1F2933";
const ACCENT: &str = "#1E90FF";
const GRID: &str = "rgba(31, 41, 51, 0.12)";
const FILL_ALPHA: f64 = 0.35;
const HOVER_FILL_ALPHA: f64 = 0.5;
const LABEL_FONT: &str = "12px sans-serif";

/// Lock glyph body size in pixels.
const LOCK_W: f64 = 10.0;
const LOCK_H: f64 = 8.0;

/// Draw the full scene.
///
/// `dpr` is the device pixel ratio; scene coordinates are CSS pixels.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails (e.g. invalid context state).
pub fn draw(ctx: &CanvasRenderingContext2d, scene: &Scene, dpr: f64) -> Result<(), JsValue> {
    // Layer 1: clear.
    ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    ctx.clear_rect(0.0, 0.0, scene.width, scene.height);

    // Layer 2: grid.
    if !scene.grid.is_empty() {
        draw_grid(ctx, &scene.grid);
    }

    // Layer 3: room polygons, selected last.
    for shape in &scene.polygons {
        draw_polygon(ctx, shape)?;
    }
    for shape in &scene.polygons {
        draw_label(ctx, shape)?;
    }

    // Layer 4: editing UI.
    draw_handles(ctx, &scene.handles)?;
    if let Some(draft) = &scene.draft {
        draw_draft(ctx, draft)?;
    }
    if let Some(p) = scene.insert_preview {
        draw_insert_preview(ctx, p)?;
    }

    Ok(())
}

// =============================================================
// Polygons
// =============================================================

fn draw_polygon(ctx: &CanvasRenderingContext2d, shape: &PolygonShape) -> Result<(), JsValue> {
    ctx.save();
    trace_closed(ctx, &shape.points);

    ctx.set_global_alpha(if shape.hovered { HOVER_FILL_ALPHA } else { FILL_ALPHA });
    ctx.set_fill_style_str(&shape.fill);
    ctx.fill();
    ctx.set_global_alpha(1.0);

    if shape.locked {
        set_dash(ctx, LOCKED_DASH_PX)?;
    }
    ctx.set_stroke_style_str(if shape.selected { ACCENT } else { OUTLINE });
    ctx.set_line_width(shape.stroke_width);
    ctx.stroke();

    ctx.restore();
    Ok(())
}

fn draw_label(ctx: &CanvasRenderingContext2d, shape: &PolygonShape) -> Result<(), JsValue> {
    let anchor = shape.label_anchor;
    ctx.save();
    ctx.set_font(LABEL_FONT);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(OUTLINE);
    ctx.fill_text(&shape.label, anchor.x, anchor.y)?;

    if shape.locked {
        let half = measured_text_width(ctx, &shape.label) * 0.5;
        draw_lock_glyph(ctx, Point::new(anchor.x + half + LOCK_W, anchor.y))?;
    }
    ctx.restore();
    Ok(())
}

/// A small padlock centered at `at`.
fn draw_lock_glyph(ctx: &CanvasRenderingContext2d, at: Point) -> Result<(), JsValue> {
    let body_top = at.y - LOCK_H * 0.25;
    ctx.set_fill_style_str(OUTLINE);
    ctx.fill_rect(at.x - LOCK_W * 0.5, body_top, LOCK_W, LOCK_H);

    ctx.set_stroke_style_str(OUTLINE);
    ctx.set_line_width(1.5);
    ctx.begin_path();
    ctx.arc(at.x, body_top, LOCK_W * 0.3, PI, 2.0 * PI)?;
    ctx.stroke();
    Ok(())
}

fn measured_text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    match ctx.measure_text(text) {
        Ok(metrics) => metrics.width(),
        Err(_) => 0.0,
    }
}

// =============================================================
// Editing UI
// =============================================================

fn draw_handles(ctx: &CanvasRenderingContext2d, handles: &[Handle]) -> Result<(), JsValue> {
    if handles.is_empty() {
        return Ok(());
    }
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0);
    for handle in handles {
        ctx.begin_path();
        ctx.arc(handle.center.x, handle.center.y, HANDLE_RADIUS_PX, 0.0, 2.0 * PI)?;
        ctx.set_fill_style_str(if handle.active { ACCENT } else { "#fff" });
        ctx.fill();
        ctx.stroke();
    }
    ctx.restore();
    Ok(())
}

fn draw_draft(ctx: &CanvasRenderingContext2d, draft: &DraftShape) -> Result<(), JsValue> {
    ctx.save();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0);

    if let Some((first, rest)) = draft.vertices.split_first() {
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        ctx.stroke();
    }

    if let Some((from, to)) = draft.preview {
        set_dash(ctx, LOCKED_DASH_PX * 0.5)?;
        ctx.begin_path();
        ctx.move_to(from.x, from.y);
        ctx.line_to(to.x, to.y);
        ctx.stroke();
        ctx.set_line_dash(&js_sys::Array::new())?;
    }

    ctx.set_fill_style_str(ACCENT);
    for (i, p) in draft.vertices.iter().enumerate() {
        let r = if i == 0 && draft.closing { DRAFT_VERTEX_RADIUS_PX * 2.0 } else { DRAFT_VERTEX_RADIUS_PX };
        ctx.begin_path();
        ctx.arc(p.x, p.y, r, 0.0, 2.0 * PI)?;
        ctx.fill();
    }

    ctx.restore();
    Ok(())
}

fn draw_insert_preview(ctx: &CanvasRenderingContext2d, p: Point) -> Result<(), JsValue> {
    ctx.save();
    ctx.begin_path();
    ctx.arc(p.x, p.y, HANDLE_RADIUS_PX, 0.0, 2.0 * PI)?;
    ctx.set_fill_style_str("rgba(30, 144, 255, 0.4)");
    ctx.fill();
    ctx.set_stroke_style_str(ACCENT);
    ctx.set_line_width(1.0);
    ctx.stroke();
    ctx.restore();
    Ok(())
}

fn draw_grid(ctx: &CanvasRenderingContext2d, lines: &[Line]) {
    ctx.save();
    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(1.0);
    ctx.begin_path();
    for line in lines {
        ctx.move_to(line.from.x, line.from.y);
        ctx.line_to(line.to.x, line.to.y);
    }
    ctx.stroke();
    ctx.restore();
}

// =============================================================
// Helpers
// =============================================================

fn trace_closed(ctx: &CanvasRenderingContext2d, points: &[Point]) {
    ctx.begin_path();
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
}

fn set_dash(ctx: &CanvasRenderingContext2d, dash: f64) -> Result<(), JsValue> {
    let dash_array = js_sys::Array::new();
    dash_array.push(&dash.into());
    dash_array.push(&dash.into());
    ctx.set_line_dash(&dash_array)
}
