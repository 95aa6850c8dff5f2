#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_HIT_RADIUS_PX, HIT_STROKE_PX};
use crate::geom::{self, Point};
use crate::rooms::RoomId;
use crate::store::{PolygonStore, StoredPolygon};
use crate::viewport::Viewport;

/// Which part of a polygon was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// A vertex handle, by index.
    Vertex(usize),
    /// The polygon's fill or its wide invisible outline.
    Body,
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub room_id: RoomId,
    pub part: HitPart,
}

/// Test what is under normalized point `p`.
///
/// Vertex handles of `handles_for` (the selected room, when handles are shown)
/// win first, then that room's body since it draws on top, then the other
/// bodies from topmost down.
#[must_use]
pub fn hit_test(p: Point, store: &PolygonStore, viewport: &Viewport, handles_for: Option<RoomId>) -> Option<Hit> {
    if !viewport.is_ready() {
        return None;
    }
    let selected = handles_for.and_then(|id| store.get(&id));

    if let Some(poly) = selected {
        if let Some(index) = vertex_at(p, &poly.points, viewport) {
            return Some(Hit { room_id: poly.room_id, part: HitPart::Vertex(index) });
        }
        if body_contains(p, poly, viewport) {
            return Some(Hit { room_id: poly.room_id, part: HitPart::Body });
        }
    }

    store
        .iter()
        .rev()
        .filter(|poly| Some(poly.room_id) != handles_for)
        .find(|poly| body_contains(p, poly, viewport))
        .map(|poly| Hit { room_id: poly.room_id, part: HitPart::Body })
}

/// Index of the vertex handle nearest `p`, if within the handle radius.
#[must_use]
pub fn vertex_at(p: Point, points: &[Point], viewport: &Viewport) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, v)| (i, viewport.distance_px(p, *v)))
        .filter(|(_, d)| *d <= HANDLE_HIT_RADIUS_PX)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Whether `p` falls inside the polygon or within half the hit stroke of its outline.
#[must_use]
pub fn body_contains(p: Point, poly: &StoredPolygon, viewport: &Viewport) -> bool {
    if geom::point_in_polygon(p, &poly.points) {
        return true;
    }
    let c = viewport.to_px(p);
    geom::closed_edges(&poly.points)
        .any(|(_, a, b)| geom::distance_to_segment(c, viewport.to_px(a), viewport.to_px(b)) <= HIT_STROKE_PX * 0.5)
}
