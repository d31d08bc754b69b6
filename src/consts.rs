//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom multiplier for one wheel notch scrolled up.
pub const WHEEL_ZOOM_IN: f64 = 1.1;

/// Zoom multiplier for one wheel notch scrolled down.
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Zoom multiplier for the toolbar zoom buttons.
pub const BUTTON_ZOOM_STEP: f64 = 1.2;

// ── Hit-testing ─────────────────────────────────────────────────

/// Extra slop added to the stroke width when hit-testing pen strokes and lines.
pub const STROKE_HIT_SLOP: f64 = 4.0;

/// Boundary threshold for ellipse hits, in world units.
pub const ELLIPSE_HIT_THRESHOLD: f64 = 6.0;

/// Width assumed for a text box that carries no width.
pub const TEXT_FALLBACK_WIDTH: f64 = 200.0;

/// Height assumed for a text box that carries no height.
pub const TEXT_FALLBACK_HEIGHT: f64 = 30.0;

// ── Gestures ────────────────────────────────────────────────────

/// A shape whose `|w|` and `|h|` are both below this is discarded on release.
pub const MIN_SHAPE_EXTENT: f64 = 2.0;

/// A pen stroke needs at least this many points to be committed.
pub const MIN_PEN_POINTS: usize = 2;

// ── Text ────────────────────────────────────────────────────────

/// Height of a freshly committed text box.
pub const TEXT_BOX_HEIGHT: f64 = 24.0;

/// Approximate advance per character used to size a new text box.
pub const TEXT_CHAR_WIDTH: f64 = 10.0;

// ── Brush ───────────────────────────────────────────────────────

/// Thinnest selectable stroke.
pub const MIN_STROKE_WIDTH: f64 = 1.0;

/// Thickest selectable stroke.
pub const MAX_STROKE_WIDTH: f64 = 20.0;

/// Default brush palette offered by the toolbar.
pub const DEFAULT_COLORS: [&str; 12] = [
    "#ffffff", "#e2e8f0", "#94a3b8", "#64748b", "#ef4444", "#f97316", "#eab308", "#22c55e", "#3b82f6", "#8b5cf6",
    "#ec4899", "#06b6d4",
];

// ── Rendering ───────────────────────────────────────────────────

/// Padding between an element and its selection outline, in world units.
pub const SELECTION_PAD: f64 = 4.0;

/// Selection outline width in screen pixels.
pub const SELECTION_LINE_PX: f64 = 2.0;

/// Selection dash length in screen pixels.
pub const SELECTION_DASH_PX: f64 = 6.0;

/// Selection dash gap in screen pixels.
pub const SELECTION_GAP_PX: f64 = 4.0;

/// Alpha used when painting a shape's fill.
pub const FILL_ALPHA: f64 = 0.1;

/// Remote cursor name-tag font size in screen pixels.
pub const CURSOR_LABEL_FONT_PX: f64 = 11.0;

/// Remote cursor name-tag height in screen pixels.
pub const CURSOR_LABEL_HEIGHT_PX: f64 = 16.0;
