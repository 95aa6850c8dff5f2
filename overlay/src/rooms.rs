//! Room model and the polygon shape adapter.
//!
//! Rooms arrive from the host with polygon data in one of two shapes:
//!
//! - modern: `polygons: [{ page, polygon, locked? }, ...]`, unique by page;
//! - legacy: `page` + `polygon` directly on the room, implicitly page-scoped.
//!
//! Both are parsed leniently into the canonical [`PageEntry`] so the rest of
//! the engine only deals with one shape. Anything that cannot be read as a
//! point list is treated as "no polygon" rather than an error.
//!
//! The write-back helpers ([`with_page_polygon`], [`with_page_lock`]) are the
//! host's side of the contract: they fold a committed polygon back into the
//! room in the right storage shape while preserving lock flags and any
//! unknown keys.

#[cfg(test)]
#[path = "rooms_test.rs"]
mod rooms_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::consts::MIN_POLYGON_POINTS;
use crate::geom::Point;

/// Unique identifier for a room.
pub type RoomId = Uuid;

/// A room as stored by the host and on the wire.
///
/// Display fields are opaque to the engine apart from the label and the
/// service used for fill color. Polygon fields are kept as raw JSON so
/// malformed or legacy data survives a round trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier for this room.
    pub id: RoomId,
    /// Display name drawn at the polygon's label anchor.
    #[serde(default)]
    pub name: String,
    /// Service the room belongs to; keys the fill palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Current occupant, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant: Option<String>,
    /// Floor surface in square meters, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<f64>,
    /// Modern per-page polygon entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygons: Option<Value>,
    /// Legacy single-polygon page index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<Value>,
    /// Legacy single polygon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Value>,
    /// Any other host fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    /// A room with a name and no geometry.
    #[must_use]
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            service: None,
            occupant: None,
            surface: None,
            polygons: None,
            page: None,
            polygon: None,
            extra: Map::new(),
        }
    }

    /// Text drawn on the plan for this room.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.name.is_empty() { "Room" } else { &self.name }
    }
}

/// Which storage shape a [`PageEntry`] was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonSource {
    /// An item of the room's `polygons` array.
    Pages,
    /// The room's legacy `page` / `polygon` pair.
    Legacy,
}

/// Canonical per-page polygon entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEntry {
    pub page: u32,
    /// Raw vertex list; may hold fewer than three points or pixel units.
    pub polygon: Vec<Point>,
    pub locked: bool,
    pub source: PolygonSource,
}

/// The polygon a room has on one page, with its lock flag.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PagePolygon {
    /// `None` when absent or when fewer than three points are stored.
    pub polygon: Option<Vec<Point>>,
    pub locked: bool,
}

/// Read every page entry a room carries. Modern entries come first; the
/// legacy pair is appended only when no modern entry covers its page.
#[must_use]
pub fn page_entries(room: &Room) -> Vec<PageEntry> {
    let mut out: Vec<PageEntry> = Vec::new();

    if let Some(Value::Array(items)) = room.polygons.as_ref().and_then(decode) {
        for item in &items {
            let Some(page) = item.get("page").and_then(parse_page) else {
                continue;
            };
            if out.iter().any(|e| e.page == page) {
                continue;
            }
            let polygon = item
                .get("polygon")
                .and_then(decode)
                .and_then(|v| parse_points(&v))
                .unwrap_or_default();
            let locked = item.get("locked").and_then(Value::as_bool).unwrap_or(false);
            out.push(PageEntry { page, polygon, locked, source: PolygonSource::Pages });
        }
    }

    if let Some(page) = legacy_page(room) {
        if !out.iter().any(|e| e.page == page) {
            let polygon = room
                .polygon
                .as_ref()
                .and_then(decode)
                .and_then(|v| parse_points(&v))
                .unwrap_or_default();
            out.push(PageEntry { page, polygon, locked: false, source: PolygonSource::Legacy });
        }
    }

    out
}

/// The polygon for `page`, modern shape preferred and legacy as fallback.
#[must_use]
pub fn polygon_for_page(room: &Room, page: u32) -> PagePolygon {
    let Some(entry) = page_entries(room).into_iter().find(|e| e.page == page) else {
        return PagePolygon::default();
    };
    let polygon = (entry.polygon.len() >= MIN_POLYGON_POINTS).then_some(entry.polygon);
    PagePolygon { polygon, locked: entry.locked }
}

/// Return a copy of `room` with `polygon` stored for `page`.
///
/// An empty polygon deletes the entry. Legacy rooms are rewritten in place
/// when the page matches; otherwise the legacy pair is folded into the
/// modern `polygons` array alongside the new entry.
#[must_use]
pub fn with_page_polygon(room: &Room, page: u32, polygon: &[Point]) -> Room {
    let mut out = room.clone();

    if !has_modern(room) && legacy_page(room) == Some(page) {
        if polygon.is_empty() {
            out.page = None;
            out.polygon = None;
        } else {
            out.polygon = Some(points_json(polygon));
        }
        return out;
    }

    let mut items = fold_to_modern(&mut out);
    let pos = items.iter().position(|item| item.get("page").and_then(parse_page) == Some(page));
    match (pos, polygon.is_empty()) {
        (Some(i), true) => {
            items.remove(i);
        }
        (None, true) => {}
        (Some(i), false) => {
            if let Some(obj) = items[i].as_object_mut() {
                obj.insert("polygon".into(), points_json(polygon));
            }
        }
        (None, false) => items.push(json!({ "page": page, "polygon": points_json(polygon) })),
    }
    out.polygons = Some(Value::Array(items));
    out
}

/// Return a copy of `room` with the lock flag for `page` set to `locked`.
///
/// Locking a page with no entry creates an empty, locked entry.
#[must_use]
pub fn with_page_lock(room: &Room, page: u32, locked: bool) -> Room {
    let mut out = room.clone();
    let mut items = fold_to_modern(&mut out);
    let pos = items.iter().position(|item| item.get("page").and_then(parse_page) == Some(page));
    match pos {
        Some(i) => {
            if let Some(obj) = items[i].as_object_mut() {
                obj.insert("locked".into(), Value::Bool(locked));
            }
        }
        None if locked => items.push(json!({ "page": page, "polygon": [], "locked": true })),
        None => {}
    }
    out.polygons = Some(Value::Array(items));
    out
}

/// Serialize a point list the way the host stores it.
#[must_use]
pub fn points_json(polygon: &[Point]) -> Value {
    Value::Array(polygon.iter().map(|p| json!({ "x": p.x, "y": p.y })).collect())
}

/// Parse a JSON point list of `{x, y}` objects or `[x, y]` pairs.
/// Any malformed element rejects the whole list.
#[must_use]
pub fn parse_points(value: &Value) -> Option<Vec<Point>> {
    value.as_array()?.iter().map(parse_point).collect()
}

fn parse_point(value: &Value) -> Option<Point> {
    match value {
        Value::Object(map) => Some(Point::new(map.get("x")?.as_f64()?, map.get("y")?.as_f64()?)),
        Value::Array(pair) if pair.len() == 2 => Some(Point::new(pair[0].as_f64()?, pair[1].as_f64()?)),
        _ => None,
    }
}

fn parse_page(value: &Value) -> Option<u32> {
    let n = value.as_u64()?;
    match u32::try_from(n) {
        Ok(page) => Some(page),
        Err(_) => None,
    }
}

/// Unwrap JSON that some backends store as an encoded string.
fn decode(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::String(_)) | Err(_) => None,
            Ok(inner) => Some(inner),
        },
        other => Some(other.clone()),
    }
}

fn legacy_page(room: &Room) -> Option<u32> {
    room.page.as_ref().and_then(decode).as_ref().and_then(parse_page)
}

fn has_modern(room: &Room) -> bool {
    matches!(room.polygons.as_ref().and_then(decode), Some(Value::Array(_)))
}

/// Take the modern items off `room`, moving any legacy pair into them.
fn fold_to_modern(room: &mut Room) -> Vec<Value> {
    let mut items = match room.polygons.as_ref().and_then(decode) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    if let Some(page) = legacy_page(room) {
        let covered = items.iter().any(|item| item.get("page").and_then(parse_page) == Some(page));
        if !covered {
            let polygon = room.polygon.as_ref().and_then(decode).unwrap_or_else(|| json!([]));
            items.push(json!({ "page": page, "polygon": polygon }));
        }
    }
    room.page = None;
    room.polygon = None;
    items
}
