//! Document model: drawable elements and the scene that orders them.
//!
//! This module defines what is on the canvas (`Element`, `Shape`) and the
//! runtime container that owns the live list (`Scene`). Elements are stored
//! in world coordinates and never reference each other; the scene is a flat,
//! order-significant list where later entries draw on top.
//!
//! Scenes change only by whole-list replacement. The helpers that "edit" a
//! scene (`with_appended`, `without`, `with_moved`) return a new list which the
//! engine then installs with [`Scene::replace`]; this is what gets broadcast
//! and snapshotted, so there is exactly one mutation path to reason about.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::config::{DEFAULT_ELEMENT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH};
use crate::consts::{MIN_PEN_POINTS, MIN_SHAPE_EXTENT, TEXT_FALLBACK_HEIGHT, TEXT_FALLBACK_WIDTH};
use crate::geometry::Extent;

/// Unique identifier for an element. Unique within a scene for its lifetime.
pub type ElementId = String;

/// Generate a fresh, process-unique element id.
#[must_use]
pub fn new_element_id() -> ElementId {
    format!("el_{}", Uuid::new_v4().simple())
}

fn default_color() -> String {
    DEFAULT_ELEMENT_COLOR.to_owned()
}

fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

/// Per-tool geometry. Serialized inline with a `"tool"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "lowercase")]
pub enum Shape {
    /// Freehand stroke through the given world points.
    Pen { points: Vec<Point> },
    /// Straight segment from `(x, y)` to `(x + w, y + h)`.
    Line { x: f64, y: f64, w: f64, h: f64 },
    /// Axis-aligned rectangle with signed extents.
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        fill: bool,
    },
    /// Ellipse inscribed in the signed box.
    Ellipse {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        fill: bool,
    },
    /// Single-line text box anchored at its top-left corner.
    Text {
        x: f64,
        y: f64,
        #[serde(default)]
        w: f64,
        #[serde(default)]
        h: f64,
        #[serde(default)]
        text: String,
        #[serde(rename = "fontSize", default = "default_font_size")]
        font_size: f64,
    },
}

/// Brush settings applied to newly created elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    pub color: String,
    pub stroke_width: f64,
}

/// A drawable element as stored in the scene and on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Stroke and fill color as a CSS color string.
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(rename = "strokeWidth", default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Opacity in `0..=1`.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(flatten)]
    pub shape: Shape,
}

impl Element {
    /// Build an element with a fresh id and full opacity.
    #[must_use]
    pub fn new(brush: &Brush, shape: Shape) -> Self {
        Self {
            id: new_element_id(),
            color: brush.color.clone(),
            stroke_width: brush.stroke_width,
            opacity: 1.0,
            shape,
        }
    }

    /// The wire tag of this element's tool.
    #[must_use]
    pub fn tool_name(&self) -> &'static str {
        match self.shape {
            Shape::Pen { .. } => "pen",
            Shape::Line { .. } => "line",
            Shape::Rect { .. } => "rect",
            Shape::Ellipse { .. } => "ellipse",
            Shape::Text { .. } => "text",
        }
    }

    /// The point a move gesture drags: the first stroke point for pens,
    /// `(x, y)` for everything else.
    #[must_use]
    pub fn anchor(&self) -> Point {
        match &self.shape {
            Shape::Pen { points } => points.first().copied().unwrap_or(Point::new(0.0, 0.0)),
            Shape::Line { x, y, .. }
            | Shape::Rect { x, y, .. }
            | Shape::Ellipse { x, y, .. }
            | Shape::Text { x, y, .. } => Point::new(*x, *y),
        }
    }

    /// Copy of this element translated so its anchor lands on `anchor`.
    ///
    /// Pens shift every point by the same delta; other shapes only move
    /// `(x, y)` so their extents are preserved.
    #[must_use]
    pub fn moved_to(&self, anchor: Point) -> Self {
        let current = self.anchor();
        let dx = anchor.x - current.x;
        let dy = anchor.y - current.y;
        let mut moved = self.clone();
        match &mut moved.shape {
            Shape::Pen { points } => {
                for p in points.iter_mut() {
                    p.x += dx;
                    p.y += dy;
                }
            }
            Shape::Line { x, y, .. }
            | Shape::Rect { x, y, .. }
            | Shape::Ellipse { x, y, .. }
            | Shape::Text { x, y, .. } => {
                *x = anchor.x;
                *y = anchor.y;
            }
        }
        moved
    }

    /// Normalized axis-aligned bounds. Text boxes without a size use the
    /// fallback box that hit-testing uses.
    #[must_use]
    pub fn bounds(&self) -> Extent {
        match &self.shape {
            Shape::Pen { points } => {
                let Some(first) = points.first() else {
                    return Extent::new(0.0, 0.0, 0.0, 0.0);
                };
                let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
                for p in points {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                Extent::new(min_x, min_y, max_x - min_x, max_y - min_y)
            }
            Shape::Line { x, y, w, h } | Shape::Rect { x, y, w, h, .. } | Shape::Ellipse { x, y, w, h, .. } => {
                Extent::new(*x, *y, *w, *h).normalized()
            }
            Shape::Text { x, y, w, h, .. } => text_box(*x, *y, *w, *h),
        }
    }

    /// Whether a just-finished gesture produced something too small to keep.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match &self.shape {
            Shape::Pen { points } => points.len() < MIN_PEN_POINTS,
            Shape::Line { w, h, .. } | Shape::Rect { w, h, .. } | Shape::Ellipse { w, h, .. } => {
                w.abs() < MIN_SHAPE_EXTENT && h.abs() < MIN_SHAPE_EXTENT
            }
            Shape::Text { text, .. } => text.trim().is_empty(),
        }
    }
}

/// The box a text element occupies, substituting fallbacks for a zero size.
#[must_use]
pub fn text_box(x: f64, y: f64, w: f64, h: f64) -> Extent {
    let w = if w == 0.0 { TEXT_FALLBACK_WIDTH } else { w };
    let h = if h == 0.0 { TEXT_FALLBACK_HEIGHT } else { h };
    Extent::new(x, y, w, h).normalized()
}

/// The ordered list of committed elements for one whiteboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    elements: Vec<Element>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: Vec::new() }
    }

    /// Create a scene from an existing list.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Elements in draw order (bottom first).
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Deep copy of the current list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Install a new list wholesale, returning the previous one.
    pub fn replace(&mut self, elements: Vec<Element>) -> Vec<Element> {
        std::mem::replace(&mut self.elements, elements)
    }

    /// Return a reference to an element by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Whether an element with this id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Current list with `element` appended on top.
    #[must_use]
    pub fn with_appended(&self, element: Element) -> Vec<Element> {
        let mut next = self.snapshot();
        next.push(element);
        next
    }

    /// Current list without the element `id`.
    #[must_use]
    pub fn without(&self, id: &str) -> Vec<Element> {
        self.elements.iter().filter(|e| e.id != id).cloned().collect()
    }

    /// Current list with element `id` translated so its anchor is `anchor`.
    #[must_use]
    pub fn with_moved(&self, id: &str, anchor: Point) -> Vec<Element> {
        self.elements
            .iter()
            .map(|e| if e.id == id { e.moved_to(anchor) } else { e.clone() })
            .collect()
    }

    /// Number of elements in the scene.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the scene has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
