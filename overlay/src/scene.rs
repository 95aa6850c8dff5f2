//! Scene building: editor state to pixel-space drawing primitives.
//!
//! [`build`] is pure. It reads the store, the room collection, the active
//! mode, and UI state and returns a [`Scene`] that the renderer paints
//! without consulting any other state. All coordinates in a scene are
//! surface pixels.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use std::collections::{HashMap, HashSet};

use crate::consts::{DEFAULT_FILL, LABEL_EDGE_MARGIN_PX, SELECTED_STROKE_PX, STROKE_PX};
use crate::geom::{self, Point};
use crate::input::{EditMode, SnapTarget, UiState};
use crate::rooms::{Room, RoomId};
use crate::settings::EditorSettings;
use crate::store::{PolygonStore, StoredPolygon};
use crate::viewport::Viewport;

/// Everything [`build`] reads.
pub struct SceneInput<'a> {
    pub store: &'a PolygonStore,
    pub rooms: &'a [Room],
    pub mode: &'a EditMode,
    pub ui: &'a UiState,
    pub viewport: &'a Viewport,
    pub settings: &'a EditorSettings,
    pub locked_ids: &'a HashSet<RoomId>,
    pub service_colors: &'a HashMap<String, String>,
}

/// A room polygon ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub room_id: RoomId,
    pub points: Vec<Point>,
    pub fill: String,
    pub stroke_width: f64,
    pub selected: bool,
    pub hovered: bool,
    /// Locked polygons get a dashed outline and a lock glyph beside the label.
    pub locked: bool,
    pub label: String,
    pub label_anchor: Point,
}

/// A vertex handle on the selected polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub center: Point,
    /// The selected or dragged vertex.
    pub active: bool,
}

/// The in-progress polygon while drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftShape {
    pub vertices: Vec<Point>,
    /// Segment from the last drafted vertex to the snapped pointer.
    pub preview: Option<(Point, Point)>,
    /// The pointer is snapped onto the first vertex; a click closes the loop.
    pub closing: bool,
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

/// Pixel-space primitives for one frame, bottom layer first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub grid: Vec<Line>,
    pub polygons: Vec<PolygonShape>,
    pub handles: Vec<Handle>,
    pub draft: Option<DraftShape>,
    pub insert_preview: Option<Point>,
}

/// Build the scene for the current state. An unsized viewport yields an empty scene.
#[must_use]
pub fn build(input: &SceneInput<'_>) -> Scene {
    let vp = input.viewport;
    if !vp.is_ready() {
        return Scene::default();
    }
    let ui = input.ui;
    let editing = ui.admin;

    let grid = match input.settings.grid() {
        Some(step) if editing => grid_lines(vp.width, vp.height, step),
        _ => Vec::new(),
    };

    // The selected polygon paints last so its thick outline stays visible.
    let mut polygons: Vec<PolygonShape> = input
        .store
        .iter()
        .filter(|poly| Some(poly.room_id) != ui.selected_id)
        .map(|poly| polygon_shape(input, poly))
        .collect();
    if let Some(selected) = ui.selected_id.and_then(|id| input.store.get(&id)) {
        polygons.push(polygon_shape(input, selected));
    }

    let handles = handles(input);

    let draft = input.mode.draft().map(|points| {
        let vertices: Vec<Point> = points.iter().map(|p| vp.to_px(*p)).collect();
        let preview = match (vertices.last(), ui.preview) {
            (Some(last), Some((to, _))) => Some((*last, vp.to_px(to))),
            _ => None,
        };
        let closing = matches!(ui.preview, Some((_, SnapTarget::First)));
        DraftShape { vertices, preview, closing }
    });

    Scene {
        width: vp.width,
        height: vp.height,
        grid,
        polygons,
        handles,
        draft,
        insert_preview: ui.insert_preview.map(|p| vp.to_px(p)),
    }
}

fn polygon_shape(input: &SceneInput<'_>, poly: &StoredPolygon) -> PolygonShape {
    let vp = input.viewport;
    let room = input.rooms.iter().find(|r| r.id == poly.room_id);
    let selected = input.ui.selected_id == Some(poly.room_id);
    let points: Vec<Point> = poly.points.iter().map(|p| vp.to_px(*p)).collect();
    let anchor = geom::centroid(&points).unwrap_or_default();

    PolygonShape {
        room_id: poly.room_id,
        fill: fill_for(room, input.service_colors),
        stroke_width: if selected { SELECTED_STROKE_PX } else { STROKE_PX },
        selected,
        hovered: input.ui.hovered_id == Some(poly.room_id),
        locked: poly.locked || input.locked_ids.contains(&poly.room_id),
        label: room.map_or("Room", Room::label).to_owned(),
        label_anchor: label_anchor(anchor, vp.width, vp.height),
        points,
    }
}

/// Fill color for a room: its service's palette entry, else the default.
#[must_use]
pub fn fill_for(room: Option<&Room>, service_colors: &HashMap<String, String>) -> String {
    room.and_then(|r| r.service.as_ref())
        .and_then(|service| service_colors.get(service))
        .map_or_else(|| DEFAULT_FILL.to_owned(), Clone::clone)
}

/// Keep a label anchor at least [`LABEL_EDGE_MARGIN_PX`] inside the surface.
#[must_use]
pub fn label_anchor(centroid: Point, width: f64, height: f64) -> Point {
    let m = LABEL_EDGE_MARGIN_PX;
    Point::new(centroid.x.max(m).min(width - m), centroid.y.max(m).min(height - m))
}

/// Handles are drawn for the selected room in admin mode, unless it is locked.
fn handles(input: &SceneInput<'_>) -> Vec<Handle> {
    let ui = input.ui;
    if !ui.admin {
        return Vec::new();
    }
    let Some(poly) = ui.selected_id.and_then(|id| input.store.get(&id)) else {
        return Vec::new();
    };
    if poly.locked || input.locked_ids.contains(&poly.room_id) {
        return Vec::new();
    }
    let active = input.mode.active_vertex().filter(|(id, _)| *id == poly.room_id).map(|(_, i)| i);
    poly.points
        .iter()
        .enumerate()
        .map(|(i, p)| Handle { center: input.viewport.to_px(*p), active: active == Some(i) })
        .collect()
}

/// Vertical then horizontal grid lines every `step` pixels, excluding the borders.
#[must_use]
pub fn grid_lines(width: f64, height: f64, step: f64) -> Vec<Line> {
    if step <= 0.0 || !step.is_finite() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut x = step;
    while x < width {
        lines.push(Line { from: Point::new(x, 0.0), to: Point::new(x, height) });
        x += step;
    }
    let mut y = step;
    while y < height {
        lines.push(Line { from: Point::new(0.0, y), to: Point::new(width, y) });
        y += step;
    }
    lines
}
