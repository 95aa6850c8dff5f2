//! Editor settings supplied by the host.
//!
//! The host owns a single `EditorSettings` value (persisted however it likes)
//! and passes it in through [`crate::engine::EngineCore::set_settings`]
//! whenever it changes. The engine never reads or writes ambient storage.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_GRID_SIZE_PX;

/// Error returned when settings cannot be parsed or fail validation.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings payload is not valid JSON for [`EditorSettings`].
    #[error("failed to parse editor settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// Grid pitch must be a positive, finite pixel count.
    #[error("invalid grid size: {0}")]
    InvalidGridSize(f64),
}

/// Toggles that shape snapping while drawing and editing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Close the loop when a click lands near the first drafted vertex.
    pub snap_to_first: bool,
    /// Round new and dragged vertices to the grid.
    pub grid_enabled: bool,
    /// Grid pitch in rendered pixels.
    pub grid_size_px: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self { snap_to_first: true, grid_enabled: false, grid_size_px: DEFAULT_GRID_SIZE_PX }
    }
}

impl EditorSettings {
    /// Parse and validate settings from a JSON document. Missing keys take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::InvalidGridSize`] for a non-positive or non-finite grid.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check invariants the editor relies on.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidGridSize`] when the grid pitch is not a
    /// positive, finite number.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.grid_size_px.is_finite() || self.grid_size_px <= 0.0 {
            return Err(SettingsError::InvalidGridSize(self.grid_size_px));
        }
        Ok(())
    }

    /// Grid pitch to apply, or `None` when the grid is off.
    #[must_use]
    pub fn grid(&self) -> Option<f64> {
        self.grid_enabled.then_some(self.grid_size_px)
    }
}
