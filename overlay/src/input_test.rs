use serde_json::json;
use uuid::Uuid;

use super::*;

// =============================================================
// Modifiers
// =============================================================

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift);
    assert!(!m.ctrl);
    assert!(!m.alt);
    assert!(!m.meta);
}

#[test]
fn command_is_ctrl_or_meta() {
    assert!(Modifiers { ctrl: true, ..Default::default() }.command());
    assert!(Modifiers { meta: true, ..Default::default() }.command());
    assert!(!Modifiers { shift: true, alt: true, ..Default::default() }.command());
}

#[test]
fn modifiers_deserialize_partial() {
    let m: Modifiers = serde_json::from_value(json!({ "alt": true })).unwrap();
    assert!(m.alt);
    assert!(!m.shift);
}

// =============================================================
// Button / Key
// =============================================================

#[test]
fn button_default_is_primary() {
    assert_eq!(Button::default(), Button::Primary);
}

#[test]
fn key_predicates() {
    assert!(Key::new("Escape").is_escape());
    assert!(Key::new("Enter").is_enter());
    assert!(Key::new("Delete").is_delete());
    assert!(Key::new("Backspace").is_delete());
    assert!(Key::new("Backspace").is_backspace());
    assert!(!Key::new("Delete").is_backspace());
    assert!(!Key::new("a").is_delete());
}

// =============================================================
// EditMode
// =============================================================

#[test]
fn edit_mode_default_is_view() {
    assert_eq!(EditMode::default(), EditMode::View);
    assert!(EditMode::View.room_id().is_none());
}

#[test]
fn edit_mode_room_id() {
    let id = Uuid::new_v4();
    assert_eq!(EditMode::Draw { room_id: id, draft: vec![] }.room_id(), Some(id));
    assert_eq!(EditMode::VertexSelected { room_id: id, index: 2 }.room_id(), Some(id));
}

#[test]
fn edit_mode_dragging() {
    let id = Uuid::new_v4();
    assert!(EditMode::DragVertex { room_id: id, index: 0 }.is_dragging());
    assert!(EditMode::DragPolygon { room_id: id, start: Point::new(0.0, 0.0), origin: vec![] }.is_dragging());
    assert!(!EditMode::VertexSelected { room_id: id, index: 0 }.is_dragging());
    assert!(!EditMode::View.is_dragging());
}

#[test]
fn edit_mode_draft_only_in_draw() {
    let id = Uuid::new_v4();
    let mode = EditMode::Draw { room_id: id, draft: vec![Point::new(0.1, 0.1)] };
    assert_eq!(mode.draft().map(<[Point]>::len), Some(1));
    assert!(EditMode::View.draft().is_none());
}

#[test]
fn edit_mode_active_vertex() {
    let id = Uuid::new_v4();
    assert_eq!(EditMode::DragVertex { room_id: id, index: 3 }.active_vertex(), Some((id, 3)));
    assert!(EditMode::Draw { room_id: id, draft: vec![] }.active_vertex().is_none());
}

#[test]
fn edit_mode_names() {
    assert_eq!(EditMode::View.name(), "view");
    assert_eq!(EditMode::VertexSelected { room_id: Uuid::nil(), index: 0 }.name(), "vertex_selected");
}

// =============================================================
// Request / DrawTarget
// =============================================================

#[test]
fn request_wire_shape() {
    let id = Uuid::new_v4();
    let req = Request::DeletePolygon { room_id: id };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value, json!({ "kind": "deletePolygon", "roomId": id }));
    let back: Request = serde_json::from_value(value).unwrap();
    assert_eq!(back, req);
}

#[test]
fn draw_target_default_is_reset() {
    let t = DrawTarget::default();
    assert!(t.room_id.is_none());
    assert_eq!(t.session, 0);
}
