//! Polygon overlay engine for floor-plan annotation.
//!
//! A PDF page is rasterized by the host and shown as a background; this crate
//! owns the editable room polygons layered on top of it. It translates raw
//! pointer and keyboard input into draw / reshape / drag / insert / delete
//! operations on polygons normalized to the page, and hands finalized
//! geometry back to the host as [`engine::Action`]s. The host owns
//! persistence; the engine only holds editing state for the visible page.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] state machine |
//! | [`rooms`] | Room wire model and the modern/legacy polygon adapter |
//! | [`store`] | Per-page polygon store and reconciliation with migration guard |
//! | [`input`] | Input event types, edit modes, and UI state |
//! | [`snap`] | Draw-time snapping and nearest-edge vertex insertion |
//! | [`hit`] | Hit-testing against vertex handles and polygon bodies |
//! | [`scene`] | State to visual primitives |
//! | [`render`] | Canvas2D drawing of a [`scene::Scene`] |
//! | [`geom`] | Point and segment math |
//! | [`viewport`] | Drawing-surface size and coordinate conversions |
//! | [`settings`] | Host-owned editor settings |
//! | [`consts`] | Shared pixel thresholds |

pub mod consts;
pub mod engine;
pub mod geom;
pub mod hit;
pub mod input;
pub mod render;
pub mod rooms;
pub mod scene;
pub mod settings;
pub mod snap;
pub mod store;
pub mod viewport;
