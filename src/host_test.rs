#![allow(clippy::float_cmp)]

use overlay::geom::Point;
use serde_json::json;
use uuid::Uuid;

use super::*;

// =============================================================
// Helpers
// =============================================================

fn modern(id: RoomId, page: u32, polygon: serde_json::Value, locked: bool) -> Room {
    serde_json::from_value(json!({
        "id": id,
        "name": "Office",
        "polygons": [{ "page": page, "polygon": polygon, "locked": locked }],
    }))
    .unwrap()
}

fn tri() -> Vec<Point> {
    vec![Point::new(0.1, 0.1), Point::new(0.4, 0.1), Point::new(0.4, 0.4)]
}

// =============================================================
// RoomBook::apply
// =============================================================

#[test]
fn commit_writes_polygon_and_reports_change() {
    let id = Uuid::new_v4();
    let mut book = RoomBook::new(vec![Room::new(id, "A")]);
    let changed = book.apply(&Action::PolygonCommitted { room_id: id, page: 2, polygon: tri() });
    assert!(changed);
    let entry = rooms::polygon_for_page(book.room(&id).unwrap(), 2);
    assert_eq!(entry.polygon, Some(tri()));
}

#[test]
fn empty_commit_deletes_and_keeps_other_pages() {
    let id = Uuid::new_v4();
    let mut book = RoomBook::new(vec![Room::new(id, "A")]);
    book.apply(&Action::PolygonCommitted { room_id: id, page: 0, polygon: tri() });
    book.apply(&Action::PolygonCommitted { room_id: id, page: 1, polygon: tri() });
    book.apply(&Action::PolygonCommitted { room_id: id, page: 0, polygon: Vec::new() });
    let room = book.room(&id).unwrap();
    assert!(rooms::polygon_for_page(room, 0).polygon.is_none());
    assert!(rooms::polygon_for_page(room, 1).polygon.is_some());
}

#[test]
fn commit_preserves_lock_flag() {
    let id = Uuid::new_v4();
    let mut book = RoomBook::new(vec![modern(id, 0, json!([[0.1, 0.1], [0.2, 0.1], [0.2, 0.2]]), true)]);
    book.apply(&Action::PolygonCommitted { room_id: id, page: 0, polygon: tri() });
    let entry = rooms::polygon_for_page(book.room(&id).unwrap(), 0);
    assert!(entry.locked);
    assert_eq!(entry.polygon, Some(tri()));
}

#[test]
fn migration_is_persisted() {
    let id = Uuid::new_v4();
    let mut book = RoomBook::new(vec![Room::new(id, "A")]);
    assert!(book.apply(&Action::PolygonMigrated { room_id: id, page: 0, polygon: tri() }));
    assert!(rooms::polygon_for_page(book.room(&id).unwrap(), 0).polygon.is_some());
}

#[test]
fn commit_for_unknown_room_is_dropped() {
    let mut book = RoomBook::new(Vec::new());
    let changed = book.apply(&Action::PolygonCommitted { room_id: Uuid::new_v4(), page: 0, polygon: tri() });
    assert!(!changed);
    assert!(book.rooms().is_empty());
}

#[test]
fn notifications_update_echo_state() {
    let id = Uuid::new_v4();
    let mut book = RoomBook::new(Vec::new());
    book.pending_request = Some(Request::DeletePolygon { room_id: id });

    assert!(!book.apply(&Action::SelectRoom(Some(id))));
    assert!(!book.apply(&Action::RoomHover(Some(id))));
    assert!(!book.apply(&Action::DrawDirtyChanged(true)));
    assert!(!book.apply(&Action::CapturePointer));
    assert!(!book.apply(&Action::SetCursor("move".into())));
    assert!(!book.apply(&Action::RequestHandled));

    assert_eq!(book.selected, Some(id));
    assert_eq!(book.hovered, Some(id));
    assert!(book.draw_dirty);
    assert!(book.pointer_captured);
    assert_eq!(book.cursor.as_deref(), Some("move"));
    assert!(book.pending_request.is_none());

    book.apply(&Action::ReleasePointer);
    assert!(!book.pointer_captured);
}

#[test]
fn set_lock_upgrades_room_without_entry() {
    let id = Uuid::new_v4();
    let mut book = RoomBook::new(vec![Room::new(id, "A")]);
    assert!(book.set_lock(id, 3, true));
    assert!(rooms::polygon_for_page(book.room(&id).unwrap(), 3).locked);
    assert!(!book.set_lock(Uuid::new_v4(), 3, true));
}

#[test]
fn into_rooms_returns_collection() {
    let id = Uuid::new_v4();
    let book = RoomBook::new(vec![Room::new(id, "A")]);
    let rooms = book.into_rooms();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, id);
}

// =============================================================
// normalize_rooms
// =============================================================

#[test]
fn normalize_converts_pixel_entries() {
    let id = Uuid::new_v4();
    let rooms = vec![modern(id, 0, json!([[100, 50], [400, 50], [400, 200]]), true)];
    let (fixed, migrations) = normalize_rooms(&rooms, 800.0, 400.0, None);
    assert_eq!(migrations.len(), 1);
    assert_eq!(migrations[0].room_id, id);
    let entry = rooms::polygon_for_page(&fixed[0], 0);
    assert_eq!(entry.polygon.unwrap()[0], Point::new(0.125, 0.125));
    assert!(entry.locked);
}

#[test]
fn normalize_leaves_normalized_rooms_alone() {
    let id = Uuid::new_v4();
    let rooms = vec![modern(id, 0, json!([[0.1, 0.1], [0.2, 0.1], [0.2, 0.2]]), false)];
    let (fixed, migrations) = normalize_rooms(&rooms, 800.0, 400.0, None);
    assert!(migrations.is_empty());
    assert_eq!(fixed, rooms);
}

#[test]
fn normalize_page_filter() {
    let id = Uuid::new_v4();
    let room: Room = serde_json::from_value(json!({
        "id": id,
        "polygons": [
            { "page": 0, "polygon": [[100, 50], [400, 50], [400, 200]] },
            { "page": 1, "polygon": [[100, 50], [400, 50], [400, 200]] },
        ],
    }))
    .unwrap();
    let (fixed, migrations) = normalize_rooms(&[room], 800.0, 400.0, Some(1));
    assert_eq!(migrations.len(), 1);
    assert_eq!(migrations[0].page, 1);
    assert!(geom::looks_like_pixels(&rooms::page_entries(&fixed[0])[0].polygon));
    assert!(!geom::looks_like_pixels(&rooms::page_entries(&fixed[0])[1].polygon));
}

#[test]
fn normalize_rewrites_legacy_in_place() {
    let id = Uuid::new_v4();
    let room: Room = serde_json::from_value(json!({
        "id": id,
        "page": 2,
        "polygon": [[100, 50], [400, 50], [400, 200]],
    }))
    .unwrap();
    let (fixed, _) = normalize_rooms(&[room], 800.0, 400.0, None);
    assert!(fixed[0].polygons.is_none());
    assert!(rooms::polygon_for_page(&fixed[0], 2).polygon.is_some());
}
