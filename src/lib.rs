//! Headless host for the `overlay` engine.
//!
//! | Module | Role |
//! |--------|------|
//! | [`host`] | Room collection write-back and offline pixel migration |
//! | [`script`] | Scripted session replay against `EngineCore` |

pub mod host;
pub mod script;
