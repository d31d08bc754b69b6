//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the interaction controller in
//! [`crate::engine`]. `Tool` and `Modifiers` capture the user's intent at the
//! time of a pointer event. `InputState` is the active gesture tracked between
//! pointer-down and pointer-up, carrying all context needed to compute
//! incremental updates and the final scene mutation on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::doc::{Element, ElementId};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pick and move elements.
    Select,
    /// Freehand stroke (default).
    #[default]
    Pen,
    /// Straight line segment.
    Line,
    /// Rectangle.
    Rect,
    /// Ellipse.
    Ellipse,
    /// Click to place a text box.
    Text,
    /// Click to delete the topmost element under the cursor.
    Eraser,
}

impl Tool {
    /// Every tool in toolbar order.
    pub const ALL: [Self; 7] = [
        Self::Select,
        Self::Pen,
        Self::Line,
        Self::Rect,
        Self::Ellipse,
        Self::Text,
        Self::Eraser,
    ];

    /// Whether this tool creates an element by dragging.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Pen | Self::Line | Self::Rect | Self::Ellipse)
    }

    /// Map a single-key shortcut (`v`/`1` through `e`/`7`) to a tool.
    #[must_use]
    pub fn from_shortcut(key: &str) -> Option<Self> {
        match key {
            "v" | "1" => Some(Self::Select),
            "p" | "2" => Some(Self::Pen),
            "l" | "3" => Some(Self::Line),
            "r" | "4" => Some(Self::Rect),
            "o" | "5" => Some(Self::Ellipse),
            "t" | "6" => Some(Self::Text),
            "e" | "7" => Some(Self::Eraser),
            _ => None,
        }
    }

    /// CSS cursor shown over the canvas while this tool is active.
    #[must_use]
    pub fn cursor_style(self) -> &'static str {
        match self {
            Self::Select => "default",
            Self::Text => "text",
            Self::Pen | Self::Line | Self::Rect | Self::Ellipse | Self::Eraser => "crosshair",
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
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
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the browser (e.g. `"Delete"`, `"z"`, `" "`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    /// Whether this is the space bar, reported either as `" "` or `"Space"`.
    #[must_use]
    pub fn is_space(&self) -> bool {
        self.0 == " " || self.0 == "Space"
    }

    /// Whether this key deletes the selection.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.0 == "Delete" || self.0 == "Backspace"
    }

    /// Case-insensitive single-character comparison.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        let mut chars = self.0.chars();
        matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// An open inline text-entry overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextEntry {
    /// World-space anchor of the text box being typed.
    pub world: Point,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// The id of the currently selected element, if any.
    pub selected_id: Option<ElementId>,
    /// Brush color for new elements.
    pub color: String,
    /// Brush width for new elements.
    pub stroke_width: f64,
    /// Space bar is held; a primary press pans instead of using the tool.
    pub space_held: bool,
    /// The text overlay, while it is open. Keyboard shortcuts are suspended.
    pub text_entry: Option<TextEntry>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::default(),
            selected_id: None,
            color: crate::config::DEFAULT_ELEMENT_COLOR.to_owned(),
            stroke_width: crate::config::DEFAULT_STROKE_WIDTH,
            space_held: false,
            text_entry: None,
        }
    }
}

/// Internal state for the input state machine.
///
/// Each active variant carries the gesture context needed to compute updates
/// and emit the final scene mutation on pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// The user is panning the canvas.
    Panning {
        /// Screen-space pointer position when the pan started.
        start_screen: Point,
        /// Camera pan offset when the pan started.
        start_pan: Point,
    },
    /// The user is drawing a new element that is not yet in the scene.
    Drawing {
        /// The in-progress element, grown on every pointer-move.
        element: Element,
    },
    /// The user is moving the selected element.
    DraggingSelection {
        /// Id of the element being dragged.
        id: ElementId,
        /// World cursor position minus the element anchor at grab time.
        offset: Point,
        /// Whether the pre-drag scene has been pushed to history yet.
        snapshotted: bool,
    },
}
