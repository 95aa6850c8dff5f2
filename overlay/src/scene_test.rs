#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

// =============================================================
// Helpers
// =============================================================

struct Fixture {
    store: PolygonStore,
    rooms: Vec<Room>,
    mode: EditMode,
    ui: UiState,
    viewport: Viewport,
    settings: EditorSettings,
    locked_ids: HashSet<RoomId>,
    service_colors: HashMap<String, String>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            store: PolygonStore::new(),
            rooms: Vec::new(),
            mode: EditMode::View,
            ui: UiState { admin: true, ..UiState::default() },
            viewport: Viewport::new(1000.0, 500.0),
            settings: EditorSettings::default(),
            locked_ids: HashSet::new(),
            service_colors: HashMap::new(),
        }
    }

    fn add_room(&mut self, name: &str, service: Option<&str>, locked: bool) -> RoomId {
        let id = Uuid::new_v4();
        let room: Room = serde_json::from_value(json!({
            "id": id,
            "name": name,
            "service": service,
            "polygons": [{ "page": 0, "polygon": [[0.1, 0.1], [0.5, 0.1], [0.5, 0.5], [0.1, 0.5]], "locked": locked }],
        }))
        .unwrap();
        self.rooms.push(room);
        self.store.reconcile(&self.rooms, 0, &self.viewport, &self.locked_ids, None);
        id
    }

    fn scene(&self) -> Scene {
        build(&SceneInput {
            store: &self.store,
            rooms: &self.rooms,
            mode: &self.mode,
            ui: &self.ui,
            viewport: &self.viewport,
            settings: &self.settings,
            locked_ids: &self.locked_ids,
            service_colors: &self.service_colors,
        })
    }
}

// =============================================================
// Polygons
// =============================================================

#[test]
fn unsized_viewport_builds_empty_scene() {
    let mut f = Fixture::new();
    f.add_room("A", None, false);
    f.viewport = Viewport::default();
    assert_eq!(f.scene(), Scene::default());
}

#[test]
fn polygons_are_scaled_to_pixels() {
    let mut f = Fixture::new();
    f.add_room("A", None, false);
    let scene = f.scene();
    assert_eq!(scene.polygons.len(), 1);
    assert_eq!(scene.polygons[0].points[2], Point::new(500.0, 250.0));
    assert_eq!(scene.polygons[0].label_anchor, Point::new(300.0, 150.0));
    assert_eq!(scene.polygons[0].label, "A");
}

#[test]
fn selected_polygon_is_thick_and_on_top() {
    let mut f = Fixture::new();
    let a = f.add_room("A", None, false);
    let b = f.add_room("B", None, false);
    f.ui.selected_id = Some(a);
    let scene = f.scene();
    assert_eq!(scene.polygons[0].room_id, b);
    assert_eq!(scene.polygons[0].stroke_width, STROKE_PX);
    assert_eq!(scene.polygons[1].room_id, a);
    assert_eq!(scene.polygons[1].stroke_width, SELECTED_STROKE_PX);
    assert!(scene.polygons[1].selected);
}

#[test]
fn locked_polygon_is_marked() {
    let mut f = Fixture::new();
    let a = f.add_room("A", None, true);
    let b = f.add_room("B", None, false);
    f.locked_ids.insert(b);
    let scene = f.scene();
    assert!(scene.polygons.iter().all(|p| p.locked));
    assert!(scene.polygons.iter().any(|p| p.room_id == a));
}

#[test]
fn fill_uses_service_palette() {
    let mut f = Fixture::new();
    f.add_room("A", Some("radiology"), false);
    f.add_room("B", Some("unknown"), false);
    f.service_colors.insert("radiology".into(), "#ff0000".into());
    let scene = f.scene();
    assert_eq!(scene.polygons[0].fill, "#ff0000");
    assert_eq!(scene.polygons[1].fill, DEFAULT_FILL);
}

#[test]
fn hovered_flag_follows_ui() {
    let mut f = Fixture::new();
    let a = f.add_room("A", None, false);
    f.ui.hovered_id = Some(a);
    assert!(f.scene().polygons[0].hovered);
}

#[test]
fn label_anchor_clamped_near_edges() {
    let p = label_anchor(Point::new(2.0, 499.0), 1000.0, 500.0);
    assert_eq!(p, Point::new(LABEL_EDGE_MARGIN_PX, 500.0 - LABEL_EDGE_MARGIN_PX));
    let inside = label_anchor(Point::new(400.0, 200.0), 1000.0, 500.0);
    assert_eq!(inside, Point::new(400.0, 200.0));
}

// =============================================================
// Handles
// =============================================================

#[test]
fn handles_only_for_selected_admin_room() {
    let mut f = Fixture::new();
    let a = f.add_room("A", None, false);
    assert!(f.scene().handles.is_empty());
    f.ui.selected_id = Some(a);
    assert_eq!(f.scene().handles.len(), 4);
    f.ui.admin = false;
    assert!(f.scene().handles.is_empty());
}

#[test]
fn locked_room_has_no_handles() {
    let mut f = Fixture::new();
    let a = f.add_room("A", None, true);
    f.ui.selected_id = Some(a);
    assert!(f.scene().handles.is_empty());
}

#[test]
fn active_vertex_handle_is_marked() {
    let mut f = Fixture::new();
    let a = f.add_room("A", None, false);
    f.ui.selected_id = Some(a);
    f.mode = EditMode::VertexSelected { room_id: a, index: 2 };
    let handles = f.scene().handles;
    assert!(handles[2].active);
    assert_eq!(handles.iter().filter(|h| h.active).count(), 1);
}

// =============================================================
// Draft / previews / grid
// =============================================================

#[test]
fn draft_with_preview_line() {
    let mut f = Fixture::new();
    let id = Uuid::new_v4();
    f.mode = EditMode::Draw { room_id: id, draft: vec![Point::new(0.1, 0.1), Point::new(0.2, 0.1)] };
    f.ui.preview = Some((Point::new(0.2, 0.4), SnapTarget::Free));
    let draft = f.scene().draft.unwrap();
    assert_eq!(draft.vertices.len(), 2);
    assert_eq!(draft.preview, Some((Point::new(200.0, 50.0), Point::new(200.0, 200.0))));
    assert!(!draft.closing);
}

#[test]
fn draft_closing_when_snapped_to_first() {
    let mut f = Fixture::new();
    f.mode = EditMode::Draw { room_id: Uuid::new_v4(), draft: vec![Point::new(0.1, 0.1); 3] };
    f.ui.preview = Some((Point::new(0.1, 0.1), SnapTarget::First));
    assert!(f.scene().draft.unwrap().closing);
}

#[test]
fn empty_draft_has_no_preview_line() {
    let mut f = Fixture::new();
    f.mode = EditMode::Draw { room_id: Uuid::new_v4(), draft: vec![] };
    f.ui.preview = Some((Point::new(0.1, 0.1), SnapTarget::Free));
    assert!(f.scene().draft.unwrap().preview.is_none());
}

#[test]
fn grid_only_when_enabled_in_admin() {
    let mut f = Fixture::new();
    assert!(f.scene().grid.is_empty());
    f.settings.grid_enabled = true;
    f.settings.grid_size_px = 100.0;
    assert_eq!(f.scene().grid.len(), 9 + 4);
    f.ui.admin = false;
    assert!(f.scene().grid.is_empty());
}

#[test]
fn grid_lines_rejects_bad_step() {
    assert!(grid_lines(100.0, 100.0, 0.0).is_empty());
    assert!(grid_lines(100.0, 100.0, f64::NAN).is_empty());
}

#[test]
fn insert_preview_in_pixels() {
    let mut f = Fixture::new();
    f.ui.insert_preview = Some(Point::new(0.5, 0.5));
    assert_eq!(f.scene().insert_preview, Some(Point::new(500.0, 250.0)));
}
