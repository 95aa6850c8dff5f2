//! Input model: modifier keys, buttons, keys, edit modes, and UI state.
//!
//! `Modifiers`, `Button`, and `Key` capture what the user did at the time of
//! an event. `EditMode` is the active editing gesture, carrying everything
//! needed to compute the next step and to commit on release. `UiState` is the
//! non-modal state the renderer reads (selection, hover, pointer previews).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::rooms::RoomId;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key, holding the key name as reported by the browser
/// (e.g. `"Delete"`, `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }

    #[must_use]
    pub fn is_enter(&self) -> bool {
        self.0 == "Enter"
    }

    /// Delete or Backspace.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        matches!(self.0.as_str(), "Delete" | "Backspace")
    }

    #[must_use]
    pub fn is_backspace(&self) -> bool {
        self.0 == "Backspace"
    }
}

/// The active editing mode. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditMode {
    /// No edit in progress.
    #[default]
    View,
    /// Accumulating vertices of a new polygon for `room_id`.
    Draw {
        room_id: RoomId,
        /// Uncommitted vertices, normalized.
        draft: Vec<Point>,
    },
    /// Vertex `index` of `room_id`'s polygon follows the pointer.
    DragVertex { room_id: RoomId, index: usize },
    /// Vertex `index` is selected and eligible for deletion.
    VertexSelected { room_id: RoomId, index: usize },
    /// The whole polygon translates by the pointer delta from `start`.
    DragPolygon {
        room_id: RoomId,
        /// Normalized pointer position at pointer-down.
        start: Point,
        /// Polygon vertices at pointer-down.
        origin: Vec<Point>,
    },
}

impl EditMode {
    /// The room this mode operates on, if any.
    #[must_use]
    pub fn room_id(&self) -> Option<RoomId> {
        match self {
            Self::View => None,
            Self::Draw { room_id, .. }
            | Self::DragVertex { room_id, .. }
            | Self::VertexSelected { room_id, .. }
            | Self::DragPolygon { room_id, .. } => Some(*room_id),
        }
    }

    /// Whether a pointer drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DragVertex { .. } | Self::DragPolygon { .. })
    }

    /// The drafted vertices while drawing.
    #[must_use]
    pub fn draft(&self) -> Option<&[Point]> {
        match self {
            Self::Draw { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// The selected or dragged vertex, if any.
    #[must_use]
    pub fn active_vertex(&self) -> Option<(RoomId, usize)> {
        match self {
            Self::DragVertex { room_id, index } | Self::VertexSelected { room_id, index } => Some((*room_id, *index)),
            _ => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Draw { .. } => "draw",
            Self::DragVertex { .. } => "drag_vertex",
            Self::VertexSelected { .. } => "vertex_selected",
            Self::DragPolygon { .. } => "drag_polygon",
        }
    }
}

/// What a click in draw mode resolved to, kept for the live preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapTarget {
    /// No snap; the pointer (after orthogonal and grid adjustment) is used.
    Free,
    /// Snapped to the first drafted vertex; a click here closes the loop.
    First,
    /// Snapped to the midpoint of draft edge `index` → `index + 1`.
    Midpoint(usize),
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Edit transitions are only allowed in admin mode.
    pub admin: bool,
    /// The selected room, if any.
    pub selected_id: Option<RoomId>,
    /// The room under the pointer, if any.
    pub hovered_id: Option<RoomId>,
    /// Draw-mode preview: where the next click would place a vertex.
    pub preview: Option<(Point, SnapTarget)>,
    /// Alt-hover preview: where a modifier-click would insert a vertex.
    pub insert_preview: Option<Point>,
}

/// An out-of-band command from the host. At most one is pending at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Request {
    /// Remove `room_id`'s polygon on the current page.
    #[serde(rename_all = "camelCase")]
    DeletePolygon { room_id: RoomId },
}

/// The host's "start drawing" signal.
///
/// `session` increments on every request so that asking for the same room
/// twice in a row still restarts the draw. `room_id: None` resets the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawTarget {
    pub room_id: Option<RoomId>,
    pub session: u64,
}
