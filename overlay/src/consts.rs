//! Shared numeric constants for the overlay crate.
//!
//! Distances are in rendered pixels unless the name says otherwise.

// ── Snapping ────────────────────────────────────────────────────

/// Radius around the first drafted vertex that closes the loop.
pub const SNAP_TO_FIRST_PX: f64 = 18.0;

/// Radius around a draft edge midpoint that pulls the next vertex onto it.
pub const MIDPOINT_SNAP_PX: f64 = 24.0;

/// Default grid pitch.
pub const DEFAULT_GRID_SIZE_PX: f64 = 20.0;

// ── Insertion ───────────────────────────────────────────────────

/// Farthest a modifier-click may land from an edge and still insert a vertex.
pub const INSERT_MAX_DIST_PX: f64 = 16.0;

/// Lower bound of the open parametric window treated as an edge interior.
pub const INSERT_T_MIN: f64 = 0.06;

/// Upper bound of the open parametric window treated as an edge interior.
pub const INSERT_T_MAX: f64 = 0.94;

// ── Hit-testing ─────────────────────────────────────────────────

/// Width of the invisible stroke that captures pointer events on a polygon.
pub const HIT_STROKE_PX: f64 = 22.0;

/// Pointer slop around a vertex handle.
pub const HANDLE_HIT_RADIUS_PX: f64 = 8.0;

// ── Rendering ───────────────────────────────────────────────────

/// Visible outline width of an unselected polygon.
pub const STROKE_PX: f64 = 1.0;

/// Visible outline width of the selected polygon.
pub const SELECTED_STROKE_PX: f64 = 3.0;

/// Dash segment for locked polygons.
pub const LOCKED_DASH_PX: f64 = 6.0;

/// Drawn radius of a vertex handle.
pub const HANDLE_RADIUS_PX: f64 = 5.0;

/// Drawn radius of a drafted vertex marker.
pub const DRAFT_VERTEX_RADIUS_PX: f64 = 3.0;

/// Labels keep at least this much room from the viewport edges.
pub const LABEL_EDGE_MARGIN_PX: f64 = 24.0;

/// Fill used when a room's service has no palette entry.
pub const DEFAULT_FILL: &str = "#8FA3B8";

// ── Coordinates ─────────────────────────────────────────────────

/// Any coordinate above this marks a polygon as stored in pixel units.
pub const PIXEL_COORD_MAX: f64 = 1.001;

/// Any coordinate below this marks a polygon as stored in pixel units.
pub const PIXEL_COORD_MIN: f64 = -0.001;

/// Minimum number of vertices for a renderable polygon.
pub const MIN_POLYGON_POINTS: usize = 3;
