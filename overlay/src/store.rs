//! Per-page polygon store.
//!
//! The store holds the authoritative editing copy of every room's polygon on
//! the visible page. It is rebuilt from the host's room collection on every
//! change to rooms, page, or viewport size ([`PolygonStore::reconcile`]) and
//! mutated in place by the engine while the user edits.
//!
//! Legacy pixel-unit polygons are converted during reconciliation. The
//! conversion for a given `(room, page)` happens at most once per session:
//! the normalized result is cached under that key and reused on later passes,
//! and the host is told about it exactly once through a [`Migration`].

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::{HashMap, HashSet};

use log::info;

use crate::consts::MIN_POLYGON_POINTS;
use crate::geom::{self, Point};
use crate::rooms::{self, Room, RoomId};
use crate::viewport::Viewport;

/// Key for the one-shot migration guard.
pub type MigrationKey = (RoomId, u32);

/// One room's polygon on the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPolygon {
    pub room_id: RoomId,
    /// Normalized vertices; always at least three after reconciliation.
    pub points: Vec<Point>,
    pub locked: bool,
}

/// A pixel-unit polygon that was normalized and should be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub room_id: RoomId,
    pub page: u32,
    pub polygon: Vec<Point>,
}

/// In-memory store of the current page's polygons.
#[derive(Debug, Default)]
pub struct PolygonStore {
    polygons: HashMap<RoomId, StoredPolygon>,
    /// Room ids in host order; later entries draw on top.
    order: Vec<RoomId>,
    /// Session-scoped migration results.
    migrated: HashMap<MigrationKey, Vec<Point>>,
}

impl PolygonStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the store for `page` from the host's rooms.
    ///
    /// `locked_ids` extends the per-entry lock flags. `keep` names a room
    /// whose local geometry must survive (an active drag); only its lock flag
    /// is refreshed. Returns the migrations performed on this pass.
    pub fn reconcile(
        &mut self,
        rooms: &[Room],
        page: u32,
        viewport: &Viewport,
        locked_ids: &HashSet<RoomId>,
        keep: Option<RoomId>,
    ) -> Vec<Migration> {
        let mut migrations = Vec::new();
        let mut next: HashMap<RoomId, StoredPolygon> = HashMap::with_capacity(rooms.len());
        let mut order = Vec::with_capacity(rooms.len());

        for room in rooms {
            let entry = rooms::polygon_for_page(room, page);
            let locked = entry.locked || locked_ids.contains(&room.id);

            if keep == Some(room.id) {
                if let Some(mut local) = self.polygons.remove(&room.id) {
                    local.locked = locked;
                    order.push(room.id);
                    next.insert(room.id, local);
                    continue;
                }
            }

            let Some(raw) = entry.polygon else {
                continue;
            };
            let Some(points) = self.normalized(room.id, page, raw, viewport, &mut migrations) else {
                continue;
            };
            if points.len() < MIN_POLYGON_POINTS {
                continue;
            }
            order.push(room.id);
            next.insert(room.id, StoredPolygon { room_id: room.id, points, locked });
        }

        self.polygons = next;
        self.order = order;
        migrations
    }

    /// Resolve a raw polygon to normalized points, migrating pixel units.
    /// `None` when the polygon is in pixels but the page has no size yet.
    fn normalized(
        &mut self,
        room_id: RoomId,
        page: u32,
        raw: Vec<Point>,
        viewport: &Viewport,
        migrations: &mut Vec<Migration>,
    ) -> Option<Vec<Point>> {
        if !geom::looks_like_pixels(&raw) {
            return Some(raw);
        }
        let key = (room_id, page);
        if let Some(done) = self.migrated.get(&key) {
            return Some(done.clone());
        }
        if !viewport.is_ready() {
            return None;
        }
        let points = geom::normalize_polygon(&raw, viewport.width, viewport.height);
        info!(
            "migrated pixel polygon for room {room_id} on page {page} ({} points, {}x{})",
            points.len(),
            viewport.width,
            viewport.height
        );
        self.migrated.insert(key, points.clone());
        migrations.push(Migration { room_id, page, polygon: points.clone() });
        Some(points)
    }

    /// Whether `(room_id, page)` has already been migrated this session.
    #[must_use]
    pub fn is_migrated(&self, room_id: RoomId, page: u32) -> bool {
        self.migrated.contains_key(&(room_id, page))
    }

    /// Return a room's polygon on the current page.
    #[must_use]
    pub fn get(&self, room_id: &RoomId) -> Option<&StoredPolygon> {
        self.polygons.get(room_id)
    }

    /// Vertices of a room's polygon, if it has one.
    #[must_use]
    pub fn points(&self, room_id: &RoomId) -> Option<&[Point]> {
        self.polygons.get(room_id).map(|p| p.points.as_slice())
    }

    /// Whether a room is locked on the current page.
    ///
    /// Rooms without a polygon consult only `locked_ids`.
    #[must_use]
    pub fn is_locked(&self, room_id: &RoomId, locked_ids: &HashSet<RoomId>) -> bool {
        locked_ids.contains(room_id) || self.polygons.get(room_id).is_some_and(|p| p.locked)
    }

    /// Replace a room's vertices in place. Returns false if the room has no polygon.
    pub fn set_points(&mut self, room_id: &RoomId, points: Vec<Point>) -> bool {
        let Some(poly) = self.polygons.get_mut(room_id) else {
            return false;
        };
        poly.points = points;
        true
    }

    /// Move one vertex. Returns false if the room or index does not exist.
    pub fn set_vertex(&mut self, room_id: &RoomId, index: usize, point: Point) -> bool {
        let Some(slot) = self.polygons.get_mut(room_id).and_then(|p| p.points.get_mut(index)) else {
            return false;
        };
        *slot = point;
        true
    }

    /// Insert or replace a committed polygon. New rooms draw on top.
    pub fn upsert(&mut self, room_id: RoomId, points: Vec<Point>, locked: bool) {
        if !self.order.contains(&room_id) {
            self.order.push(room_id);
        }
        self.polygons.insert(room_id, StoredPolygon { room_id, points, locked });
    }

    /// Remove a room's polygon, returning it if it was present.
    pub fn remove(&mut self, room_id: &RoomId) -> Option<StoredPolygon> {
        self.order.retain(|id| id != room_id);
        self.polygons.remove(room_id)
    }

    /// Polygons in draw order (bottom first).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StoredPolygon> + '_ {
        self.order.iter().filter_map(|id| self.polygons.get(id))
    }

    /// Number of polygons on the current page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    /// Returns `true` if the current page has no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}
