//! Scripted editing sessions.
//!
//! A [`Script`] describes the host inputs (page size, rooms, locks,
//! settings) and a sequence of pointer, keyboard, and host [`Event`]s.
//! [`run`] feeds them to an [`EngineCore`] the way a browser host would,
//! applying every action to a [`RoomBook`] and handing the updated rooms
//! back to the engine after each persisted change.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::collections::{HashMap, HashSet};

use overlay::engine::{Action, EngineCore};
use overlay::geom::Point;
use overlay::input::{Button, DrawTarget, Key, Modifiers, Request};
use overlay::rooms::{Room, RoomId};
use overlay::settings::{EditorSettings, SettingsError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::host::RoomBook;

/// Drawing-surface placement in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptViewport {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
}

/// A replayable editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Script {
    pub viewport: ScriptViewport,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_admin")]
    pub admin: bool,
    #[serde(default)]
    pub settings: EditorSettings,
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Rooms locked on the current page, on top of per-entry flags.
    #[serde(default)]
    pub locked: HashSet<RoomId>,
    #[serde(default)]
    pub service_colors: HashMap<String, String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

fn default_admin() -> bool {
    true
}

/// One input fed to the engine. Pointer positions are client pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Click {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        x: f64,
        y: f64,
    },
    PointerLeave,
    Key {
        key: String,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Host "start drawing" signal. Omit `room_id` to reset.
    Draw {
        #[serde(default)]
        room_id: Option<RoomId>,
        session: u64,
    },
    Page {
        page: u32,
    },
    Admin {
        admin: bool,
    },
    Request {
        request: Request,
    },
    /// Host toggles a room's lock flag on the current page.
    Lock {
        room_id: RoomId,
        locked: bool,
    },
    Teardown,
}

/// One emitted action, tagged with the index of the event that caused it.
/// Setup actions carry no index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub event: Option<usize>,
    pub action: Action,
}

/// Everything a replay produced.
pub struct Outcome {
    pub steps: Vec<Step>,
    pub book: RoomBook,
    pub engine: EngineCore,
}

/// Replay `script`.
///
/// # Errors
///
/// Returns [`SettingsError`] when the script's settings are invalid.
pub fn run(script: Script) -> Result<Outcome, SettingsError> {
    let mut engine = EngineCore::new();
    let mut book = RoomBook::new(script.rooms.clone());
    let mut steps = Vec::new();

    let mut setup = engine.set_settings(script.settings)?;
    engine.set_surface_origin(script.viewport.left, script.viewport.top);
    setup.extend(engine.set_admin(script.admin));
    setup.extend(engine.set_page(script.page));
    setup.extend(engine.set_locked_rooms(script.locked.clone()));
    setup.extend(engine.set_service_colors(script.service_colors.clone()));
    setup.extend(engine.set_rooms(script.rooms));
    setup.extend(engine.set_viewport(script.viewport.width, script.viewport.height));
    dispatch(&mut engine, &mut book, &mut steps, None, setup);

    for (index, event) in script.events.into_iter().enumerate() {
        debug!(index, ?event, "event");
        if let Event::Request { request } = &event {
            book.pending_request = Some(request.clone());
        }
        let actions = feed(&mut engine, &mut book, event);
        dispatch(&mut engine, &mut book, &mut steps, Some(index), actions);
    }

    info!(steps = steps.len(), rooms = book.rooms().len(), "replay finished");
    Ok(Outcome { steps, book, engine })
}

/// Deliver one event to the engine.
fn feed(engine: &mut EngineCore, book: &mut RoomBook, event: Event) -> Vec<Action> {
    match event {
        Event::PointerDown { x, y, button, modifiers } => engine.on_pointer_down(Point::new(x, y), button, modifiers),
        Event::PointerMove { x, y, modifiers } => engine.on_pointer_move(Point::new(x, y), modifiers),
        Event::PointerUp { x, y, button, modifiers } => engine.on_pointer_up(Point::new(x, y), button, modifiers),
        Event::Click { x, y, modifiers } => engine.on_click(Point::new(x, y), modifiers),
        Event::DoubleClick { x, y } => engine.on_double_click(Point::new(x, y)),
        Event::PointerLeave => engine.on_pointer_leave(),
        Event::Key { key, modifiers } => engine.on_key_down(&Key::new(key), modifiers),
        Event::Draw { room_id, session } => engine.set_draw_target(DrawTarget { room_id, session }),
        Event::Page { page } => engine.set_page(page),
        Event::Admin { admin } => engine.set_admin(admin),
        Event::Request { request } => engine.set_request(Some(request)),
        Event::Lock { room_id, locked } => {
            if book.set_lock(room_id, engine.page, locked) {
                engine.set_rooms(book.rooms().to_vec())
            } else {
                Vec::new()
            }
        }
        Event::Teardown => engine.teardown(),
    }
}

/// Record actions and apply them to the book. Persisted changes are echoed
/// back to the engine as a fresh room collection, and whatever that echo
/// emits is dispatched in turn.
fn dispatch(engine: &mut EngineCore, book: &mut RoomBook, steps: &mut Vec<Step>, event: Option<usize>, actions: Vec<Action>) {
    let mut pending = actions;
    while !pending.is_empty() {
        let mut changed = false;
        for action in pending {
            changed |= book.apply(&action);
            steps.push(Step { event, action });
        }
        pending = if changed { engine.set_rooms(book.rooms().to_vec()) } else { Vec::new() };
        // Render requests from the echo add nothing.
        pending.retain(|a| *a != Action::RenderNeeded);
    }
}
