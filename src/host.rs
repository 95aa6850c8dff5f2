//! Host side of the overlay: the room collection the engine edits.
//!
//! The engine reports finalized geometry as [`Action`]s and never persists
//! anything. [`RoomBook`] plays the host: it writes commits and migrations
//! back into the room records in their storage shape and tracks the
//! notifications a UI would react to.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use overlay::engine::Action;
use overlay::geom;
use overlay::input::Request;
use overlay::rooms::{self, Room, RoomId};
use overlay::store::Migration;
use tracing::{debug, warn};

/// The host's authoritative room collection plus UI echo state.
#[derive(Debug, Default)]
pub struct RoomBook {
    rooms: Vec<Room>,
    pub selected: Option<RoomId>,
    pub hovered: Option<RoomId>,
    pub draw_dirty: bool,
    pub pointer_captured: bool,
    pub cursor: Option<String>,
    /// Request waiting for the engine to acknowledge it.
    pub pending_request: Option<Request>,
}

impl RoomBook {
    #[must_use]
    pub fn new(rooms: Vec<Room>) -> Self {
        Self { rooms, ..Self::default() }
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub fn into_rooms(self) -> Vec<Room> {
        self.rooms
    }

    #[must_use]
    pub fn room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == *room_id)
    }

    /// Apply one engine action. Returns `true` when the room records changed
    /// and the engine should be handed the new collection.
    pub fn apply(&mut self, action: &Action) -> bool {
        match action {
            Action::PolygonCommitted { room_id, page, polygon } | Action::PolygonMigrated { room_id, page, polygon } => {
                self.store_polygon(*room_id, *page, polygon)
            }
            Action::SelectRoom(id) => {
                self.selected = *id;
                false
            }
            Action::RoomHover(id) => {
                self.hovered = *id;
                false
            }
            Action::RequestHandled => {
                self.pending_request = None;
                false
            }
            Action::DrawDirtyChanged(dirty) => {
                self.draw_dirty = *dirty;
                false
            }
            Action::CapturePointer => {
                self.pointer_captured = true;
                false
            }
            Action::ReleasePointer => {
                self.pointer_captured = false;
                false
            }
            Action::SetCursor(cursor) => {
                self.cursor = Some(cursor.clone());
                false
            }
            Action::PolygonDoubleClicked(_) | Action::RenderNeeded => false,
        }
    }

    /// Toggle a room's lock on `page`. Returns `false` for unknown rooms.
    pub fn set_lock(&mut self, room_id: RoomId, page: u32, locked: bool) -> bool {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) else {
            warn!(%room_id, "lock for unknown room ignored");
            return false;
        };
        *room = rooms::with_page_lock(room, page, locked);
        debug!(%room_id, page, locked, "lock updated");
        true
    }

    fn store_polygon(&mut self, room_id: RoomId, page: u32, polygon: &[geom::Point]) -> bool {
        let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) else {
            warn!(%room_id, page, "polygon for unknown room dropped");
            return false;
        };
        *room = rooms::with_page_polygon(room, page, polygon);
        debug!(%room_id, page, points = polygon.len(), "polygon stored");
        true
    }
}

/// Offline migration: normalize every pixel-unit polygon against a
/// `width` x `height` page, optionally restricted to one page.
///
/// Returns the rewritten rooms and one [`Migration`] per converted entry.
#[must_use]
pub fn normalize_rooms(rooms: &[Room], width: f64, height: f64, page: Option<u32>) -> (Vec<Room>, Vec<Migration>) {
    let mut migrations = Vec::new();
    let out = rooms
        .iter()
        .map(|room| {
            let mut fixed = room.clone();
            for entry in rooms::page_entries(room) {
                if page.is_some_and(|p| p != entry.page) || !geom::looks_like_pixels(&entry.polygon) {
                    continue;
                }
                let polygon = geom::normalize_polygon(&entry.polygon, width, height);
                fixed = rooms::with_page_polygon(&fixed, entry.page, &polygon);
                migrations.push(Migration { room_id: room.id, page: entry.page, polygon });
            }
            fixed
        })
        .collect();
    (out, migrations)
}
