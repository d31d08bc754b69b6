//! Per-whiteboard canvas configuration.
//!
//! The document store keeps an open-ended `canvas_state` object next to each
//! whiteboard's elements. [`CanvasConfig`] is the typed view of it: every key
//! is optional and falls back to the defaults below, and unknown keys are
//! ignored so the store can carry state this crate does not read.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#121218";
pub const DEFAULT_GRID_SIZE: f64 = 40.0;
pub const DEFAULT_GRID_COLOR: &str = "rgba(255,255,255,0.04)";
pub const DEFAULT_SELECTION_COLOR: &str = "#6366f1";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_SAVE_DEBOUNCE_MS: f64 = 2000.0;
pub const DEFAULT_CURSOR_THROTTLE_MS: f64 = 50.0;
pub const DEFAULT_ELEMENT_COLOR: &str = "#ffffff";
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Smallest grid spacing drawn; finer grids are coarsened to this.
pub const MIN_GRID_SIZE: f64 = 8.0;
pub const MIN_FONT_SIZE: f64 = 8.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasConfig {
    /// Surface fill behind the grid.
    pub background_color: String,
    /// World-space spacing between grid lines. Zero disables the grid.
    pub grid_size: f64,
    /// Grid line color.
    pub grid_color: String,
    /// Selection outline color.
    pub selection_color: String,
    /// Maximum undo snapshots kept; the oldest are dropped first.
    pub history_limit: usize,
    /// Quiet period before a local change is saved to the document store.
    pub save_debounce_ms: f64,
    /// Minimum interval between outgoing cursor broadcasts (~20 Hz by default).
    pub cursor_throttle_ms: f64,
    /// Brush color at session open.
    pub default_color: String,
    /// Brush width at session open.
    pub default_stroke_width: f64,
    /// Font size for new text boxes.
    pub default_font_size: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background_color: DEFAULT_BACKGROUND_COLOR.to_owned(),
            grid_size: DEFAULT_GRID_SIZE,
            grid_color: DEFAULT_GRID_COLOR.to_owned(),
            selection_color: DEFAULT_SELECTION_COLOR.to_owned(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            save_debounce_ms: DEFAULT_SAVE_DEBOUNCE_MS,
            cursor_throttle_ms: DEFAULT_CURSOR_THROTTLE_MS,
            default_color: DEFAULT_ELEMENT_COLOR.to_owned(),
            default_stroke_width: DEFAULT_STROKE_WIDTH,
            default_font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl CanvasConfig {
    /// Parse a `canvas_state` value. `null` and non-object values yield the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the value is an object whose known keys carry the
    /// wrong types (e.g. a string `gridSize`).
    pub fn from_canvas_state(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        if value.is_object() {
            Self::deserialize(value).map(Self::sanitized)
        } else {
            Ok(Self::default())
        }
    }

    /// Bring stored values back into the ranges the engine relies on.
    ///
    /// Non-finite numbers fall back to their defaults. A grid finer than
    /// [`MIN_GRID_SIZE`] is coarsened and a non-positive one is disabled.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.grid_size = if !self.grid_size.is_finite() {
            DEFAULT_GRID_SIZE
        } else if self.grid_size <= 0.0 {
            0.0
        } else {
            self.grid_size.max(MIN_GRID_SIZE)
        };
        self.default_font_size = if self.default_font_size.is_finite() && self.default_font_size > 0.0 {
            self.default_font_size.max(MIN_FONT_SIZE)
        } else {
            DEFAULT_FONT_SIZE
        };
        self.default_stroke_width = if self.default_stroke_width.is_finite() {
            self.default_stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
        } else {
            DEFAULT_STROKE_WIDTH
        };
        self.save_debounce_ms = non_negative_or(self.save_debounce_ms, DEFAULT_SAVE_DEBOUNCE_MS);
        self.cursor_throttle_ms = non_negative_or(self.cursor_throttle_ms, DEFAULT_CURSOR_THROTTLE_MS);
        self.history_limit = self.history_limit.max(1);
        self
    }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 { value } else { fallback }
}
