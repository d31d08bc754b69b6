//! Rendering: redraws the full scene onto a 2D surface.
//!
//! The pipeline is written against the [`Surface`] trait, a thin subset of the
//! `Canvas2D` API. In the browser the surface is the canvas's
//! [`web_sys::CanvasRenderingContext2d`]; tests use a recording surface. The
//! renderer receives a read-only [`RenderView`] and produces pixels. It never
//! mutates application state and never touches the network.
//!
//! Layers, each bracketed by save/restore:
//! background, grid, committed elements, in-progress element, selection
//! outline, remote cursors. Everything after the background is drawn in world
//! space, with line widths and label sizes divided by zoom so chrome stays a
//! constant size on screen.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::consts::{
    CURSOR_LABEL_FONT_PX, CURSOR_LABEL_HEIGHT_PX, FILL_ALPHA, SELECTION_DASH_PX, SELECTION_GAP_PX, SELECTION_LINE_PX,
    SELECTION_PAD,
};
use crate::doc::{Element, Scene, Shape};
use crate::sync::RemoteCursor;

/// Font stack for text elements and cursor labels.
const FONT_FAMILY: &str = "Inter, system-ui, sans-serif";

/// Fill behind cursor name tags.
const CURSOR_LABEL_BG: &str = "rgba(99,102,241,0.9)";

/// Drawing operations the renderer needs from a 2D surface.
pub trait Surface {
    type Error;

    fn save(&mut self);
    fn restore(&mut self);
    /// Reset to a pure device-pixel-ratio scale.
    fn reset_transform(&mut self, dpr: f64) -> Result<(), Self::Error>;
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// Round caps and joins for freehand strokes.
    fn set_round_lines(&mut self);
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Self::Error>;
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_font(&mut self, font: &str);

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    /// Full ellipse centered at `(cx, cy)`.
    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> Result<(), Self::Error>;
    fn stroke(&mut self);
    fn fill(&mut self);

    /// Draw `text` with its alphabetic baseline at `y`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), Self::Error>;
    /// Advance width of `text` in the current font.
    fn measure_text(&mut self, text: &str) -> f64;
}

/// Everything the renderer reads for one frame.
pub struct RenderView<'a> {
    pub scene: &'a Scene,
    pub camera: &'a Camera,
    pub config: &'a CanvasConfig,
    /// Element being drawn but not yet committed.
    pub in_progress: Option<&'a Element>,
    /// Currently selected element.
    pub selected: Option<&'a Element>,
    pub cursors: &'a BTreeMap<String, RemoteCursor>,
    /// Viewport size in CSS pixels.
    pub viewport_w: f64,
    pub viewport_h: f64,
    pub dpr: f64,
}

/// Draw the full frame.
///
/// # Errors
///
/// Returns the surface's error if any fallible drawing call fails.
pub fn draw<S: Surface>(s: &mut S, view: &RenderView<'_>) -> Result<(), S::Error> {
    let camera = view.camera;

    // Layer 1: clear and fill background in screen space.
    s.reset_transform(view.dpr)?;
    s.clear_rect(0.0, 0.0, view.viewport_w, view.viewport_h);
    s.set_fill_style(&view.config.background_color);
    s.fill_rect(0.0, 0.0, view.viewport_w, view.viewport_h);

    // Layer 2: world transform.
    s.save();
    let result = draw_world(s, view, camera);
    s.restore();
    result
}

fn draw_world<S: Surface>(s: &mut S, view: &RenderView<'_>, camera: &Camera) -> Result<(), S::Error> {
    s.translate(camera.pan_x, camera.pan_y)?;
    s.scale(camera.zoom, camera.zoom)?;

    draw_grid(s, view, camera);

    for element in view.scene.elements() {
        draw_element(s, element)?;
    }

    if let Some(element) = view.in_progress {
        draw_element(s, element)?;
    }

    if let Some(element) = view.selected {
        draw_selection(s, element, &view.config.selection_color, camera.zoom)?;
    }

    for cursor in view.cursors.values() {
        draw_cursor(s, cursor, camera.zoom)?;
    }

    Ok(())
}

// =============================================================
// Grid
// =============================================================

/// Grid lines at a fixed world spacing, covering the visible area plus one
/// cell of margin on each side.
fn draw_grid<S: Surface>(s: &mut S, view: &RenderView<'_>, camera: &Camera) {
    let size = view.config.grid_size;
    if !size.is_finite() || size <= 0.0 || camera.zoom <= 0.0 {
        return;
    }
    let start_x = (-camera.pan_x / camera.zoom / size).floor() * size;
    let start_y = (-camera.pan_y / camera.zoom / size).floor() * size;
    let end_x = start_x + view.viewport_w / camera.zoom + size * 2.0;
    let end_y = start_y + view.viewport_h / camera.zoom + size * 2.0;

    s.save();
    s.set_stroke_style(&view.config.grid_color);
    s.set_line_width(1.0 / camera.zoom);
    s.begin_path();
    let mut x = start_x;
    while x <= end_x {
        s.move_to(x, start_y);
        s.line_to(x, end_y);
        x += size;
    }
    let mut y = start_y;
    while y <= end_y {
        s.move_to(start_x, y);
        s.line_to(end_x, y);
        y += size;
    }
    s.stroke();
    s.restore();
}

// =============================================================
// Elements
// =============================================================

/// Draw one element with its own color, width and opacity.
///
/// # Errors
///
/// Returns the surface's error if a fallible drawing call fails.
pub fn draw_element<S: Surface>(s: &mut S, element: &Element) -> Result<(), S::Error> {
    s.save();
    s.set_stroke_style(&element.color);
    s.set_fill_style(&element.color);
    s.set_line_width(element.stroke_width);
    s.set_round_lines();
    s.set_global_alpha(element.opacity);
    let result = draw_shape(s, &element.shape);
    s.restore();
    result
}

fn draw_shape<S: Surface>(s: &mut S, shape: &Shape) -> Result<(), S::Error> {
    match shape {
        Shape::Pen { points } => {
            let Some((first, rest)) = points.split_first() else {
                return Ok(());
            };
            if rest.is_empty() {
                return Ok(());
            }
            s.begin_path();
            s.move_to(first.x, first.y);
            for p in rest {
                s.line_to(p.x, p.y);
            }
            s.stroke();
        }
        Shape::Line { x, y, w, h } => {
            s.begin_path();
            s.move_to(*x, *y);
            s.line_to(x + w, y + h);
            s.stroke();
        }
        Shape::Rect { x, y, w, h, fill } => {
            s.stroke_rect(*x, *y, *w, *h);
            if *fill {
                s.set_global_alpha(FILL_ALPHA);
                s.fill_rect(*x, *y, *w, *h);
            }
        }
        Shape::Ellipse { x, y, w, h, fill } => {
            s.begin_path();
            s.ellipse(x + w / 2.0, y + h / 2.0, w.abs() / 2.0, h.abs() / 2.0)?;
            s.stroke();
            if *fill {
                s.set_global_alpha(FILL_ALPHA);
                s.fill();
            }
        }
        Shape::Text { x, y, text, font_size, .. } => {
            s.set_font(&format!("{font_size}px {FONT_FAMILY}"));
            s.fill_text(text, *x, y + font_size)?;
        }
    }
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

fn draw_selection<S: Surface>(s: &mut S, element: &Element, color: &str, zoom: f64) -> Result<(), S::Error> {
    let b = element.bounds().padded(SELECTION_PAD);
    s.save();
    s.set_stroke_style(color);
    s.set_line_width(SELECTION_LINE_PX / zoom);
    let result = s
        .set_line_dash(&[SELECTION_DASH_PX / zoom, SELECTION_GAP_PX / zoom])
        .map(|()| s.stroke_rect(b.x, b.y, b.w, b.h));
    s.restore();
    result
}

// =============================================================
// Remote cursors
// =============================================================

fn draw_cursor<S: Surface>(s: &mut S, cursor: &RemoteCursor, zoom: f64) -> Result<(), S::Error> {
    s.save();
    let result = draw_cursor_inner(s, cursor, zoom);
    s.restore();
    result
}

fn draw_cursor_inner<S: Surface>(s: &mut S, cursor: &RemoteCursor, zoom: f64) -> Result<(), S::Error> {
    let (x, y) = (cursor.x, cursor.y);

    // Arrow glyph.
    s.set_fill_style(&cursor.color);
    s.begin_path();
    s.move_to(x, y);
    s.line_to(x, y + 18.0);
    s.line_to(x + 12.0, y + 12.0);
    s.close_path();
    s.fill();

    // Name tag.
    let name = if cursor.name.is_empty() { "?" } else { cursor.name.as_str() };
    s.set_font(&format!("{}px {FONT_FAMILY}", CURSOR_LABEL_FONT_PX / zoom));
    s.set_fill_style(CURSOR_LABEL_BG);
    let label_w = s.measure_text(name) + 8.0;
    s.fill_rect(x + 14.0, y + 10.0, label_w, CURSOR_LABEL_HEIGHT_PX / zoom);
    s.set_fill_style("#fff");
    s.fill_text(name, x + 18.0, y + 10.0 + 12.0 / zoom)
}

// =============================================================
// Browser surface
// =============================================================

impl Surface for CanvasRenderingContext2d {
    type Error = JsValue;

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn reset_transform(&mut self, dpr: f64) -> Result<(), JsValue> {
        self.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::translate(self, x, y)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::scale(self, x, y)
    }

    fn set_fill_style(&mut self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_round_lines(&mut self) {
        self.set_line_cap("round");
        self.set_line_join("round");
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), JsValue> {
        let dash_array = js_sys::Array::new();
        for seg in segments {
            dash_array.push(&JsValue::from_f64(*seg));
        }
        CanvasRenderingContext2d::set_line_dash(self, &dash_array)
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        CanvasRenderingContext2d::set_global_alpha(self, alpha);
    }

    fn set_font(&mut self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::clear_rect(self, x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::stroke_rect(self, x, y, w, h);
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::ellipse(self, cx, cy, rx, ry, 0.0, 0.0, TAU)
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill(&mut self) {
        CanvasRenderingContext2d::fill(self);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), JsValue> {
        CanvasRenderingContext2d::fill_text(self, text, x, y)
    }

    fn measure_text(&mut self, text: &str) -> f64 {
        match CanvasRenderingContext2d::measure_text(self, text) {
            Ok(metrics) => metrics.width(),
            Err(_) => 0.0,
        }
    }
}
