use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::MIN_POLYGON_POINTS;
use crate::geom::Point;
use crate::hit::{self, HitPart};
use crate::input::{Button, DrawTarget, EditMode, Key, Modifiers, Request, SnapTarget, UiState};
use crate::render;
use crate::rooms::{self, Room, RoomId};
use crate::scene::{self, Scene, SceneInput};
use crate::settings::{EditorSettings, SettingsError};
use crate::snap::{self, SnapContext};
use crate::store::PolygonStore;
use crate::viewport::Viewport;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    /// Finalized polygon for a room on a page. Empty means delete.
    PolygonCommitted { room_id: RoomId, page: u32, polygon: Vec<Point> },
    /// A pixel-unit polygon was normalized; the host should persist it.
    PolygonMigrated { room_id: RoomId, page: u32, polygon: Vec<Point> },
    SelectRoom(Option<RoomId>),
    RoomHover(Option<RoomId>),
    PolygonDoubleClicked(RoomId),
    /// The pending request was consumed.
    RequestHandled,
    /// Whether an uncommitted draft with at least one point exists.
    DrawDirtyChanged(bool),
    /// A drag started; route pointer move/up from the whole window here.
    CapturePointer,
    /// The drag ended; stop routing window pointer events.
    ReleasePointer,
    SetCursor(String),
    RenderNeeded,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    /// Local copy of the host's rooms, updated optimistically on commit.
    pub rooms: Vec<Room>,
    pub store: PolygonStore,
    pub ui: UiState,
    pub mode: EditMode,
    pub viewport: Viewport,
    pub page: u32,
    pub settings: EditorSettings,
    pub locked_ids: HashSet<RoomId>,
    pub service_colors: HashMap<String, String>,
    pub dpr: f64,
    draw_target: DrawTarget,
    /// Vertices of the dragged polygon at pointer-down.
    drag_origin: Vec<Point>,
    draw_dirty: bool,
    suppress_next_click: bool,
    cursor: String,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            rooms: Vec::new(),
            store: PolygonStore::new(),
            ui: UiState::default(),
            mode: EditMode::View,
            viewport: Viewport::default(),
            page: 0,
            settings: EditorSettings::default(),
            locked_ids: HashSet::new(),
            service_colors: HashMap::new(),
            dpr: 1.0,
            draw_target: DrawTarget::default(),
            drag_origin: Vec::new(),
            draw_dirty: false,
            suppress_next_click: false,
            cursor: "default".to_owned(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data inputs ---

    /// Replace the room collection and re-reconcile.
    pub fn set_rooms(&mut self, rooms: Vec<Room>) -> Vec<Action> {
        self.rooms = rooms;
        let mut actions = self.reconcile();
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Switch page. Any edit in progress is discarded.
    pub fn set_page(&mut self, page: u32) -> Vec<Action> {
        if page == self.page {
            return Vec::new();
        }
        self.page = page;
        let mut actions = self.reset_to_view();
        actions.extend(self.reconcile());
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Rasterized page size in pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport.width = width;
        self.viewport.height = height;
        let mut actions = self.reconcile();
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Client-space offset of the drawing surface.
    pub fn set_surface_origin(&mut self, left: f64, top: f64) {
        self.viewport.left = left;
        self.viewport.top = top;
    }

    /// Rooms locked on the current page, in addition to per-entry flags.
    pub fn set_locked_rooms(&mut self, locked_ids: HashSet<RoomId>) -> Vec<Action> {
        self.locked_ids = locked_ids;
        let mut actions = self.reconcile();
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    pub fn set_service_colors(&mut self, colors: HashMap<String, String>) -> Vec<Action> {
        self.service_colors = colors;
        vec![Action::RenderNeeded]
    }

    /// Enable or disable editing. Disabling discards any edit in progress.
    pub fn set_admin(&mut self, admin: bool) -> Vec<Action> {
        if admin == self.ui.admin {
            return Vec::new();
        }
        self.ui.admin = admin;
        let mut actions = if admin { Vec::new() } else { self.reset_to_view() };
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Replace the editor settings.
    ///
    /// # Errors
    ///
    /// Returns the validation error and keeps the previous settings when the
    /// new ones are invalid.
    pub fn set_settings(&mut self, settings: EditorSettings) -> Result<Vec<Action>, SettingsError> {
        if let Err(err) = settings.validate() {
            warn!("rejected editor settings: {err}");
            return Err(err);
        }
        self.settings = settings;
        Ok(vec![Action::RenderNeeded])
    }

    /// The host's "start drawing" signal.
    ///
    /// Only a change of room or session has an effect. `room_id: None`
    /// resets to view. Drawing is refused outside admin mode and for rooms
    /// locked on the current page.
    pub fn set_draw_target(&mut self, target: DrawTarget) -> Vec<Action> {
        if target == self.draw_target {
            return Vec::new();
        }
        self.draw_target = target;
        let mut actions = self.reset_to_view();

        if let Some(room_id) = target.room_id {
            if !self.ui.admin {
                debug!("draw for room {room_id} refused: not in admin mode");
            } else if self.is_locked(&room_id) {
                debug!("draw for room {room_id} refused: locked on page {}", self.page);
            } else {
                self.select(Some(room_id), &mut actions);
                self.set_mode(EditMode::Draw { room_id, draft: Vec::new() });
                self.update_cursor("crosshair", &mut actions);
            }
        }
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Handle an out-of-band host request. Every request is acknowledged.
    pub fn set_request(&mut self, request: Option<Request>) -> Vec<Action> {
        let Some(request) = request else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        match request {
            Request::DeletePolygon { room_id } => {
                if self.is_locked(&room_id) {
                    debug!("delete for room {room_id} refused: locked on page {}", self.page);
                } else if self.store.get(&room_id).is_some() {
                    if self.mode.room_id() == Some(room_id) {
                        actions.extend(self.reset_to_view());
                    }
                    actions.push(self.commit(room_id, Vec::new()));
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        actions.push(Action::RequestHandled);
        self.finish(actions)
    }

    // --- Input events ---

    /// Pointer pressed on the surface. Starts vertex and polygon drags.
    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        // Every click starts here, so a stale suppression from an earlier
        // drag never outlives the next press.
        self.suppress_next_click = false;
        if button != Button::Primary || !self.ui.admin || !self.viewport.is_ready() {
            return Vec::new();
        }
        if !matches!(self.mode, EditMode::View | EditMode::VertexSelected { .. }) {
            return Vec::new();
        }
        let p = self.viewport.client_to_normalized(client);
        let Some(hit) = hit::hit_test(p, &self.store, &self.viewport, self.handle_room()) else {
            return Vec::new();
        };
        let room_id = hit.room_id;
        let mut actions = Vec::new();

        match hit.part {
            HitPart::Vertex(index) => {
                if self.is_locked(&room_id) {
                    debug!("vertex drag for room {room_id} refused: locked");
                    return Vec::new();
                }
                self.drag_origin = self.store.points(&room_id).map(<[Point]>::to_vec).unwrap_or_default();
                self.set_mode(EditMode::DragVertex { room_id, index });
                self.update_cursor("grabbing", &mut actions);
            }
            HitPart::Body if modifiers.command() => {
                if self.is_locked(&room_id) {
                    debug!("polygon drag for room {room_id} refused: locked");
                    return Vec::new();
                }
                let origin = self.store.points(&room_id).map(<[Point]>::to_vec).unwrap_or_default();
                self.drag_origin.clone_from(&origin);
                self.set_mode(EditMode::DragPolygon { room_id, start: p, origin });
                self.update_cursor("move", &mut actions);
            }
            HitPart::Body => return Vec::new(),
        }

        self.select(Some(room_id), &mut actions);
        self.ui.insert_preview = None;
        actions.push(Action::CapturePointer);
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Pointer moved, over the surface or anywhere during a drag.
    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        if !self.viewport.is_ready() {
            return Vec::new();
        }
        let p = self.viewport.client_to_normalized(client);
        let ctx = self.snap_context();
        let mut actions = Vec::new();

        match &self.mode {
            EditMode::DragVertex { room_id, index } => {
                let (room_id, index) = (*room_id, *index);
                if self.store.set_vertex(&room_id, index, snap::snap_vertex(p, &ctx)) {
                    actions.push(Action::RenderNeeded);
                }
            }
            EditMode::DragPolygon { room_id, start, origin } => {
                let room_id = *room_id;
                let moved = snap::translate_polygon(origin, *start, p, &ctx);
                if self.store.set_points(&room_id, moved) {
                    actions.push(Action::RenderNeeded);
                }
            }
            EditMode::Draw { draft, .. } => {
                self.ui.preview = Some(snap::snap_draft_point(p, draft, modifiers.shift, &ctx));
                actions.push(Action::RenderNeeded);
            }
            EditMode::View | EditMode::VertexSelected { .. } => {
                self.hover(p, modifiers, &mut actions);
            }
        }
        self.finish(actions)
    }

    /// Pointer released. Ends a drag and commits the result.
    ///
    /// The geometry left by the last pointer-move is what commits; the
    /// release position itself is not applied.
    pub fn on_pointer_up(&mut self, client: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button != Button::Primary || !self.mode.is_dragging() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let origin = std::mem::take(&mut self.drag_origin);

        match self.mode.clone() {
            EditMode::DragVertex { room_id, index } => {
                let points = self.store.points(&room_id).map(<[Point]>::to_vec).unwrap_or_default();
                if points.len() < MIN_POLYGON_POINTS {
                    actions.push(self.commit(room_id, Vec::new()));
                    self.set_mode(EditMode::View);
                } else {
                    if points != origin {
                        actions.push(self.commit(room_id, points));
                    }
                    self.set_mode(EditMode::VertexSelected { room_id, index });
                }
            }
            EditMode::DragPolygon { room_id, .. } => {
                let points = self.store.points(&room_id).map(<[Point]>::to_vec).unwrap_or_default();
                if points != origin {
                    actions.push(self.commit(room_id, points));
                }
                self.set_mode(EditMode::View);
            }
            EditMode::View | EditMode::Draw { .. } | EditMode::VertexSelected { .. } => {}
        }

        // The browser only follows a release on the surface with a click.
        self.suppress_next_click = self.viewport.contains_client(client);
        actions.push(Action::ReleasePointer);
        self.update_cursor("default", &mut actions);
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Click on the surface: draft vertices, vertex insertion, selection.
    pub fn on_click(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        if std::mem::take(&mut self.suppress_next_click) || !self.viewport.is_ready() {
            return Vec::new();
        }
        let p = self.viewport.client_to_normalized(client);
        let mut actions = Vec::new();

        match self.mode.clone() {
            EditMode::Draw { room_id, mut draft } => {
                let (point, target) = snap::snap_draft_point(p, &draft, modifiers.shift, &self.snap_context());
                if target == SnapTarget::First && draft.len() >= MIN_POLYGON_POINTS {
                    actions.push(self.commit(room_id, draft));
                    self.set_mode(EditMode::View);
                    self.ui.preview = None;
                    self.update_cursor("default", &mut actions);
                } else {
                    draft.push(point);
                    self.mode = EditMode::Draw { room_id, draft };
                }
                actions.push(Action::RenderNeeded);
            }
            EditMode::View | EditMode::VertexSelected { .. } => {
                if modifiers.alt && self.try_insert(p, &mut actions) {
                    return self.finish(actions);
                }
                let hit = hit::hit_test(p, &self.store, &self.viewport, self.handle_room());
                let target = hit.map(|h| h.room_id);
                if self.mode != EditMode::View {
                    self.set_mode(EditMode::View);
                }
                self.select(target, &mut actions);
                actions.push(Action::RenderNeeded);
            }
            EditMode::DragVertex { .. } | EditMode::DragPolygon { .. } => {}
        }
        self.finish(actions)
    }

    /// Double-click on a polygon notifies the host.
    pub fn on_double_click(&mut self, client: Point) -> Vec<Action> {
        if matches!(self.mode, EditMode::Draw { .. }) || !self.viewport.is_ready() {
            return Vec::new();
        }
        let p = self.viewport.client_to_normalized(client);
        hit::hit_test(p, &self.store, &self.viewport, self.handle_room())
            .map(|h| vec![Action::PolygonDoubleClicked(h.room_id)])
            .unwrap_or_default()
    }

    /// Pointer left the surface. Drags keep going on window-level events.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if self.mode.is_dragging() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        if self.ui.hovered_id.take().is_some() {
            actions.push(Action::RoomHover(None));
        }
        let had_preview = self.ui.preview.take().is_some();
        let had_insert = self.ui.insert_preview.take().is_some();
        if had_preview || had_insert {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn on_key_down(&mut self, key: &Key, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = Vec::new();
        match self.mode.clone() {
            EditMode::Draw { room_id, mut draft } => {
                if key.is_escape() {
                    debug!("draft for room {room_id} discarded ({} points)", draft.len());
                    actions.extend(self.reset_to_view());
                } else if key.is_enter() {
                    if draft.len() >= MIN_POLYGON_POINTS {
                        actions.push(self.commit(room_id, draft));
                        actions.extend(self.reset_to_view());
                    }
                } else if key.is_backspace() {
                    if draft.pop().is_some() {
                        self.mode = EditMode::Draw { room_id, draft };
                    }
                } else {
                    return Vec::new();
                }
            }
            EditMode::VertexSelected { room_id, index } => {
                if key.is_escape() {
                    self.set_mode(EditMode::View);
                } else if key.is_delete() {
                    self.delete_vertex(room_id, index, &mut actions);
                } else {
                    return Vec::new();
                }
            }
            EditMode::View | EditMode::DragVertex { .. } | EditMode::DragPolygon { .. } => return Vec::new(),
        }
        actions.push(Action::RenderNeeded);
        self.finish(actions)
    }

    /// Component teardown. A draft with enough points is committed rather
    /// than lost, and an active drag releases its pointer capture.
    pub fn teardown(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let EditMode::Draw { room_id, draft } = self.mode.clone() {
            if draft.len() >= MIN_POLYGON_POINTS {
                actions.push(self.commit(room_id, draft));
            }
        }
        actions.extend(self.reset_to_view());
        self.finish(actions)
    }

    // --- Queries ---

    /// The currently selected room, if any.
    #[must_use]
    pub fn selection(&self) -> Option<RoomId> {
        self.ui.selected_id
    }

    /// A room's polygon on the current page.
    #[must_use]
    pub fn polygon(&self, room_id: &RoomId) -> Option<&[Point]> {
        self.store.points(room_id)
    }

    /// Whether a room is locked on the current page. Rooms without a
    /// polygon yet can still carry a locked page entry.
    #[must_use]
    pub fn is_locked(&self, room_id: &RoomId) -> bool {
        self.store.is_locked(room_id, &self.locked_ids)
            || self
                .rooms
                .iter()
                .find(|r| r.id == *room_id)
                .is_some_and(|r| rooms::polygon_for_page(r, self.page).locked)
    }

    /// Visual primitives for the current state.
    #[must_use]
    pub fn scene(&self) -> Scene {
        scene::build(&SceneInput {
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

    // --- Internals ---

    fn snap_context(&self) -> SnapContext {
        SnapContext::new(&self.viewport, &self.settings)
    }

    /// The room whose vertex handles are live: selected, admin, unlocked.
    fn handle_room(&self) -> Option<RoomId> {
        self.ui.selected_id.filter(|id| self.ui.admin && !self.is_locked(id))
    }

    fn reconcile(&mut self) -> Vec<Action> {
        let keep = if self.mode.is_dragging() { self.mode.room_id() } else { None };
        let migrations = self.store.reconcile(&self.rooms, self.page, &self.viewport, &self.locked_ids, keep);
        let mut actions: Vec<Action> = migrations
            .into_iter()
            .map(|m| Action::PolygonMigrated { room_id: m.room_id, page: m.page, polygon: m.polygon })
            .collect();

        // A refetch may remove the polygon under a vertex selection, or lock
        // the room being drawn.
        let stale = match &self.mode {
            EditMode::VertexSelected { room_id, index } | EditMode::DragVertex { room_id, index } => {
                self.store.points(room_id).is_none_or(|points| *index >= points.len())
            }
            EditMode::DragPolygon { room_id, .. } => self.store.get(room_id).is_none(),
            EditMode::Draw { room_id, .. } => {
                let locked = self.is_locked(room_id);
                if locked {
                    debug!("draft for room {room_id} discarded: locked on page {}", self.page);
                }
                locked
            }
            EditMode::View => false,
        };
        if stale {
            actions.extend(self.reset_to_view());
        }
        actions
    }

    /// Drop whatever edit is in progress and return to view.
    fn reset_to_view(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.mode.is_dragging() {
            actions.push(Action::ReleasePointer);
            self.suppress_next_click = false;
        }
        self.drag_origin.clear();
        self.ui.preview = None;
        self.ui.insert_preview = None;
        if self.mode != EditMode::View {
            self.set_mode(EditMode::View);
            self.update_cursor("default", &mut actions);
        }
        actions
    }

    fn set_mode(&mut self, mode: EditMode) {
        if mode.name() != self.mode.name() {
            debug!("mode {} -> {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
    }

    fn select(&mut self, room_id: Option<RoomId>, actions: &mut Vec<Action>) {
        if self.ui.selected_id != room_id {
            self.ui.selected_id = room_id;
            actions.push(Action::SelectRoom(room_id));
        }
    }

    fn update_cursor(&mut self, cursor: &str, actions: &mut Vec<Action>) {
        if self.cursor != cursor {
            cursor.clone_into(&mut self.cursor);
            actions.push(Action::SetCursor(cursor.to_owned()));
        }
    }

    /// Hover feedback outside drags: hovered room, cursor, and the
    /// Alt insertion preview on the selected polygon.
    fn hover(&mut self, p: Point, modifiers: Modifiers, actions: &mut Vec<Action>) {
        let hit = hit::hit_test(p, &self.store, &self.viewport, self.handle_room());
        let hovered = hit.map(|h| h.room_id);
        if hovered != self.ui.hovered_id {
            self.ui.hovered_id = hovered;
            actions.push(Action::RoomHover(hovered));
            actions.push(Action::RenderNeeded);
        }

        let cursor = match hit.map(|h| h.part) {
            Some(HitPart::Vertex(_)) => "grab",
            Some(HitPart::Body) if self.ui.admin && modifiers.command() => "move",
            Some(HitPart::Body) => "pointer",
            None => "default",
        };
        self.update_cursor(cursor, actions);

        let preview = if modifiers.alt { self.insertion_at(p).map(|(_, ins)| ins.point) } else { None };
        if preview != self.ui.insert_preview {
            self.ui.insert_preview = preview;
            actions.push(Action::RenderNeeded);
        }
    }

    /// Where an Alt-click at `p` would insert a vertex on the selected polygon.
    fn insertion_at(&self, p: Point) -> Option<(RoomId, snap::Insertion)> {
        let room_id = self.handle_room()?;
        let points = self.store.points(&room_id)?;
        snap::nearest_edge_insertion(points, p, &self.snap_context()).map(|ins| (room_id, ins))
    }

    /// Alt-click insertion. Returns true when a vertex was inserted.
    fn try_insert(&mut self, p: Point, actions: &mut Vec<Action>) -> bool {
        if !self.ui.admin {
            return false;
        }
        if let Some(selected) = self.ui.selected_id {
            if self.is_locked(&selected) {
                debug!("vertex insert for room {selected} refused: locked");
                return false;
            }
        }
        let Some((room_id, insertion)) = self.insertion_at(p) else {
            return false;
        };
        let Some(points) = self.store.points(&room_id) else {
            return false;
        };
        let inserted = snap::insert_vertex(points, &insertion);
        actions.push(self.commit(room_id, inserted));
        self.ui.insert_preview = None;
        self.set_mode(EditMode::VertexSelected { room_id, index: insertion.index });
        actions.push(Action::RenderNeeded);
        true
    }

    fn delete_vertex(&mut self, room_id: RoomId, index: usize, actions: &mut Vec<Action>) {
        if self.is_locked(&room_id) {
            debug!("vertex delete for room {room_id} refused: locked");
            return;
        }
        let Some(points) = self.store.points(&room_id) else {
            self.set_mode(EditMode::View);
            return;
        };
        if index >= points.len() {
            self.set_mode(EditMode::View);
            return;
        }
        let mut remaining = points.to_vec();
        remaining.remove(index);
        if remaining.len() < MIN_POLYGON_POINTS {
            actions.push(self.commit(room_id, Vec::new()));
            self.set_mode(EditMode::View);
        } else {
            let next = index.min(remaining.len() - 1);
            actions.push(self.commit(room_id, remaining));
            self.set_mode(EditMode::VertexSelected { room_id, index: next });
        }
    }

    /// Apply a commit locally and build the action for the host.
    ///
    /// The store and the local room copy are updated optimistically; the
    /// host owns persistence and any later correction.
    fn commit(&mut self, room_id: RoomId, polygon: Vec<Point>) -> Action {
        if polygon.is_empty() {
            self.store.remove(&room_id);
        } else {
            let locked = self.is_locked(&room_id);
            self.store.upsert(room_id, polygon.clone(), locked);
        }
        if let Some(room) = self.rooms.iter_mut().find(|r| r.id == room_id) {
            *room = rooms::with_page_polygon(room, self.page, &polygon);
        }
        debug!("commit room {room_id} page {} ({} points)", self.page, polygon.len());
        Action::PolygonCommitted { room_id, page: self.page, polygon }
    }

    /// Append a dirty-flag change if the draft state flipped.
    fn finish(&mut self, mut actions: Vec<Action>) -> Vec<Action> {
        let dirty = self.mode.draft().is_some_and(|d| !d.is_empty());
        if dirty != self.draw_dirty {
            self.draw_dirty = dirty;
            actions.push(Action::DrawDirtyChanged(dirty));
        }
        actions
    }
}

/// The full overlay engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let mut core = EngineCore::new();
        core.dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        Self { canvas, core }
    }

    // --- Delegated data inputs ---

    pub fn set_rooms(&mut self, rooms: Vec<Room>) -> Vec<Action> {
        self.core.set_rooms(rooms)
    }

    pub fn set_page(&mut self, page: u32) -> Vec<Action> {
        self.core.set_page(page)
    }

    pub fn set_locked_rooms(&mut self, locked_ids: HashSet<RoomId>) -> Vec<Action> {
        self.core.set_locked_rooms(locked_ids)
    }

    pub fn set_service_colors(&mut self, colors: HashMap<String, String>) -> Vec<Action> {
        self.core.set_service_colors(colors)
    }

    pub fn set_admin(&mut self, admin: bool) -> Vec<Action> {
        self.core.set_admin(admin)
    }

    /// # Errors
    ///
    /// See [`EngineCore::set_settings`].
    pub fn set_settings(&mut self, settings: EditorSettings) -> Result<Vec<Action>, SettingsError> {
        self.core.set_settings(settings)
    }

    pub fn set_draw_target(&mut self, target: DrawTarget) -> Vec<Action> {
        self.core.set_draw_target(target)
    }

    pub fn set_request(&mut self, request: Option<Request>) -> Vec<Action> {
        self.core.set_request(request)
    }

    // --- Viewport ---

    /// Update the page size (CSS pixels), the surface origin, and the
    /// device pixel ratio. The canvas backing store is resized to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, left: f64, top: f64, width: f64, height: f64, dpr: f64) -> Vec<Action> {
        self.core.dpr = dpr;
        self.core.set_surface_origin(left, top);
        self.canvas.set_width((width * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height * dpr).round().max(0.0) as u32);
        self.core.set_viewport(width, height)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_down(client, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(client, modifiers)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(client, button, modifiers)
    }

    pub fn on_click(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_click(client, modifiers)
    }

    pub fn on_double_click(&mut self, client: Point) -> Vec<Action> {
        self.core.on_double_click(client)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn teardown(&mut self) -> Vec<Action> {
        self.core.teardown()
    }

    // --- Render ---

    /// Draw the current state to the canvas. Failures are logged.
    pub fn render(&self) {
        if let Err(err) = self.try_render() {
            warn!("render failed: {err:?}");
        }
    }

    fn try_render(&self) -> Result<(), JsValue> {
        let Some(ctx) = self.canvas.get_context("2d")? else {
            return Err(JsValue::from_str("2d context unavailable"));
        };
        let ctx: CanvasRenderingContext2d = ctx.dyn_into()?;
        render::draw(&ctx, &self.core.scene(), self.core.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<RoomId> {
        self.core.selection()
    }

    #[must_use]
    pub fn polygon(&self, room_id: &RoomId) -> Option<&[Point]> {
        self.core.polygon(room_id)
    }
}
