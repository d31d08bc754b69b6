//! Whiteboard session engine: interaction controller, history and sync glue.
//!
//! DESIGN
//! ======
//! `EngineCore` holds every piece of per-session state (scene, camera,
//! history, gesture state, collaboration bridge) and has no browser
//! dependencies, so the full controller is testable natively. `Engine` wraps
//! it together with the canvas element and its 2D context.
//!
//! Handlers return a list of [`Action`]s for the host to carry out: redraws,
//! cursor changes, channel broadcasts, autosave writes and text-overlay
//! requests. The engine itself never performs I/O.
//!
//! All scene changes, whether from a gesture, undo/redo, or a remote update,
//! go through one commit path that installs the new list, drops a dangling
//! selection and hands the result to the collaboration bridge.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::camera::{Camera, Point};
use crate::config::CanvasConfig;
use crate::consts::{
    BUTTON_ZOOM_STEP, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, TEXT_BOX_HEIGHT, TEXT_CHAR_WIDTH, WHEEL_ZOOM_IN,
    WHEEL_ZOOM_OUT,
};
use crate::doc::{Brush, Element, Scene, Shape};
use crate::error::{CanvasError, ErrorCode};
use crate::hit::hit_test;
use crate::history::History;
use crate::input::{Button, InputState, Key, Modifiers, TextEntry, Tool, UiState, WheelDelta};
use crate::render::{self, RenderView};
use crate::store::WhiteboardDoc;
use crate::sync::{ChannelMessage, CollabBridge, LocalUser, Participant, RemoteCursor, SaveRequest};

static NO_CURSORS: BTreeMap<String, RemoteCursor> = BTreeMap::new();

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// State visible on the canvas changed; call `render`.
    RenderNeeded,
    /// Set the CSS cursor of the canvas element.
    SetCursor(String),
    /// Emit this message on the realtime channel.
    Broadcast(ChannelMessage),
    /// Write this element list to the document store.
    SaveContent(SaveRequest),
    /// Show the inline text editor at `screen` with the given font size.
    EditTextRequested { screen: Point, font_size_px: f64 },
    /// Hide the inline text editor.
    TextEntryClosed,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
pub struct EngineCore {
    pub scene: Scene,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    pub history: History,
    pub config: CanvasConfig,
    pub session: Option<CollabBridge>,
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub dpr: f64,
    now_ms: f64,
}

impl Default for EngineCore {
    fn default() -> Self {
        let config = CanvasConfig::default();
        Self {
            scene: Scene::new(),
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            history: History::new(config.history_limit),
            config,
            session: None,
            viewport_width: 0.0,
            viewport_height: 0.0,
            dpr: 1.0,
            now_ms: 0.0,
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Session lifecycle ---

    /// Start a session on `doc` as `user`, replacing any open session.
    pub fn open_session(&mut self, doc: WhiteboardDoc, user: LocalUser) -> Vec<Action> {
        let mut actions = self.close_session();
        actions.retain(|a| !matches!(a, Action::RenderNeeded));

        let config = doc.config();
        info!(whiteboard_id = %doc.id, elements = doc.elements.len(), user = %user.name, "opening whiteboard session");

        let bridge = CollabBridge::new(doc.id, user, &config);
        actions.push(Action::Broadcast(bridge.join_message()));

        self.scene = Scene::from_elements(doc.elements);
        self.camera = Camera::default();
        self.history = History::new(config.history_limit);
        self.ui = UiState {
            tool: self.ui.tool,
            color: config.default_color.clone(),
            stroke_width: clamp_stroke_width(config.default_stroke_width),
            ..UiState::default()
        };
        self.input = InputState::Idle;
        self.config = config;
        self.session = Some(bridge);

        actions.push(Action::SetCursor(self.cursor_style().to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Leave the current session, flushing any pending autosave.
    pub fn close_session(&mut self) -> Vec<Action> {
        let Some(mut bridge) = self.session.take() else {
            return Vec::new();
        };
        info!(whiteboard_id = %bridge.whiteboard_id(), "closing whiteboard session");

        let mut actions = vec![Action::Broadcast(bridge.leave_message())];
        if let Some(save) = bridge.flush_save() {
            actions.push(Action::SaveContent(save));
        }
        if self.ui.text_entry.take().is_some() {
            actions.push(Action::TextEntryClosed);
        }

        self.scene = Scene::new();
        self.history.clear();
        self.ui.selected_id = None;
        self.input = InputState::Idle;

        actions.push(Action::RenderNeeded);
        actions
    }

    /// Id of the open whiteboard, if any.
    #[must_use]
    pub fn whiteboard_id(&self) -> Option<&str> {
        self.session.as_ref().map(CollabBridge::whiteboard_id)
    }

    // --- Clock ---

    /// Set the current time in milliseconds, used by the debounce and throttle.
    pub fn set_clock(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
    }

    /// Advance the clock and emit any autosave that has come due.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Action> {
        self.now_ms = now_ms;
        self.session
            .as_mut()
            .and_then(|bridge| bridge.poll_save(now_ms))
            .map(Action::SaveContent)
            .into_iter()
            .collect()
    }

    /// Report that the host failed to perform a `SaveContent` action.
    pub fn save_failed(&mut self, request: SaveRequest, error: &CanvasError) {
        match self.session.as_mut() {
            Some(bridge) => bridge.save_failed(request, error, self.now_ms),
            None => warn!(
                whiteboard_id = %request.whiteboard_id,
                code = error.error_code(),
                %error,
                "autosave failed after session closed"
            ),
        }
    }

    // --- Viewport ---

    /// Update viewport dimensions (CSS pixels) and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.viewport_width = width_css;
        self.viewport_height = height_css;
        self.dpr = if dpr > 0.0 { dpr } else { 1.0 };
        vec![Action::RenderNeeded]
    }

    // --- Tool / brush ---

    /// Set the active tool. Switching tools clears the selection.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.ui.tool = tool;
        self.ui.selected_id = None;
        vec![Action::SetCursor(self.cursor_style().to_owned()), Action::RenderNeeded]
    }

    /// Set the color used for new elements.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.ui.color = color.into();
    }

    /// Set the stroke width used for new elements, clamped to the allowed range.
    pub fn set_stroke_width(&mut self, width: f64) {
        self.ui.stroke_width = clamp_stroke_width(width);
    }

    /// Current brush.
    #[must_use]
    pub fn brush(&self) -> Brush {
        Brush { color: self.ui.color.clone(), stroke_width: self.ui.stroke_width }
    }

    /// CSS cursor for the canvas in the current state.
    #[must_use]
    pub fn cursor_style(&self) -> &'static str {
        if self.ui.space_held { "grab" } else { self.ui.tool.cursor_style() }
    }

    // --- Pointer input ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        if button == Button::Middle || (button == Button::Primary && self.ui.space_held) {
            self.input = InputState::Panning { start_screen: screen_pt, start_pan: self.camera.pan() };
            return Vec::new();
        }
        if button != Button::Primary {
            return Vec::new();
        }

        let world = self.camera.screen_to_world(screen_pt);
        match self.ui.tool {
            Tool::Select => self.select_at(world),
            Tool::Text => self.open_text_entry(world),
            Tool::Eraser => self.erase_at(world),
            Tool::Pen | Tool::Line | Tool::Rect | Tool::Ellipse => self.start_drawing(world),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, _modifiers: Modifiers) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        let mut actions = match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { start_screen, start_pan } => {
                let pan = Point::new(
                    start_pan.x + (screen_pt.x - start_screen.x),
                    start_pan.y + (screen_pt.y - start_screen.y),
                );
                self.camera.pan_to(pan);
                let mut actions = vec![Action::RenderNeeded];
                actions.extend(self.text_overlay_moved());
                actions
            }
            InputState::Drawing { element } => {
                extend_shape(&mut element.shape, world);
                vec![Action::RenderNeeded]
            }
            InputState::DraggingSelection { .. } => self.drag_to(world),
        };

        if let Some(msg) = self.session.as_mut().and_then(|b| b.cursor_moved(world, self.now_ms)) {
            actions.push(Action::Broadcast(msg));
        }
        actions
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture()
    }

    /// The pointer left the canvas; ends the gesture like a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    /// Wheel zoom anchored at the pointer. Independent of the gesture state.
    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, _modifiers: Modifiers) -> Vec<Action> {
        let factor = if delta.dy > 0.0 {
            WHEEL_ZOOM_OUT
        } else if delta.dy < 0.0 {
            WHEEL_ZOOM_IN
        } else {
            return Vec::new();
        };
        self.zoom_by(screen_pt, factor)
    }

    // --- Keyboard input ---

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        if self.ui.text_entry.is_some() {
            return Vec::new();
        }

        if key.is_space() {
            if self.ui.space_held {
                return Vec::new();
            }
            self.ui.space_held = true;
            return vec![Action::SetCursor(self.cursor_style().to_owned())];
        }

        if modifiers.command() {
            if key.is_char('z') {
                return if modifiers.shift { self.redo() } else { self.undo() };
            }
            if key.is_char('y') {
                return self.redo();
            }
            return Vec::new();
        }

        if key.is_delete() {
            return self.delete_selection();
        }

        match Tool::from_shortcut(&key.0.to_ascii_lowercase()) {
            Some(tool) => self.set_tool(tool),
            None => Vec::new(),
        }
    }

    pub fn on_key_up(&mut self, key: Key, _modifiers: Modifiers) -> Vec<Action> {
        if key.is_space() && self.ui.space_held {
            self.ui.space_held = false;
            return vec![Action::SetCursor(self.cursor_style().to_owned())];
        }
        Vec::new()
    }

    // --- Text entry ---

    /// Commit the text overlay. Empty or whitespace-only input discards it.
    pub fn commit_text(&mut self, text: &str) -> Vec<Action> {
        let Some(entry) = self.ui.text_entry.take() else {
            return Vec::new();
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return vec![Action::TextEntryClosed];
        }

        #[allow(clippy::cast_precision_loss)]
        let width = text.chars().count() as f64 * TEXT_CHAR_WIDTH;
        let shape = Shape::Text {
            x: entry.world.x,
            y: entry.world.y,
            w: width,
            h: TEXT_BOX_HEIGHT,
            text: trimmed.to_owned(),
            font_size: self.config.default_font_size,
        };
        let element = Element::new(&self.brush(), shape);

        self.history.push(&self.scene);
        let next = self.scene.with_appended(element);
        let mut actions = vec![Action::TextEntryClosed];
        actions.extend(self.commit(next));
        actions
    }

    /// Close the text overlay without creating anything.
    pub fn cancel_text(&mut self) -> Vec<Action> {
        match self.ui.text_entry.take() {
            Some(_) => vec![Action::TextEntryClosed],
            None => Vec::new(),
        }
    }

    // --- History ---

    pub fn undo(&mut self) -> Vec<Action> {
        match self.history.undo(self.scene.elements()) {
            Some(previous) => self.commit(previous),
            None => {
                debug!("undo stack empty");
                Vec::new()
            }
        }
    }

    pub fn redo(&mut self) -> Vec<Action> {
        match self.history.redo(self.scene.elements()) {
            Some(next) => self.commit(next),
            None => {
                debug!("redo stack empty");
                Vec::new()
            }
        }
    }

    // --- Zoom buttons ---

    /// Zoom in one step around the viewport center.
    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.zoom_by(self.viewport_center(), BUTTON_ZOOM_STEP)
    }

    /// Zoom out one step around the viewport center.
    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.zoom_by(self.viewport_center(), 1.0 / BUTTON_ZOOM_STEP)
    }

    // --- Channel input ---

    /// Apply a message received on the realtime channel.
    pub fn receive(&mut self, message: ChannelMessage) -> Vec<Action> {
        let Some(bridge) = self.session.as_mut() else {
            debug!(whiteboard_id = %message.whiteboard_id(), "no open session, dropping channel message");
            return Vec::new();
        };
        match message {
            ChannelMessage::WhiteboardUpdate(update) => {
                match bridge.accept_remote_scene(update, self.scene.elements()) {
                    Some(elements) => self.commit(elements),
                    None => Vec::new(),
                }
            }
            ChannelMessage::WhiteboardCursor(update) => {
                if bridge.apply_cursor(update) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            ChannelMessage::WhiteboardCollaborators(roster) => {
                if bridge.apply_roster(roster) { vec![Action::RenderNeeded] } else { Vec::new() }
            }
            ChannelMessage::WhiteboardJoin(_) | ChannelMessage::WhiteboardLeave(_) => {
                debug!("ignoring client-to-relay message");
                Vec::new()
            }
        }
    }

    /// Decode and apply a raw JSON channel message. Malformed input is logged
    /// and dropped.
    pub fn receive_json(&mut self, text: &str) -> Vec<Action> {
        match ChannelMessage::from_json(text) {
            Ok(message) => self.receive(message),
            Err(err) => {
                warn!(code = err.error_code(), %err, "dropping malformed channel message");
                Vec::new()
            }
        }
    }

    // --- Queries ---

    /// The currently selected element id, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.ui.selected_id.as_deref()
    }

    /// The current camera state.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.scene.get(id)
    }

    /// Committed elements in draw order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        self.scene.elements()
    }

    /// The element being drawn, if a drawing gesture is active.
    #[must_use]
    pub fn in_progress(&self) -> Option<&Element> {
        match &self.input {
            InputState::Drawing { element } => Some(element),
            _ => None,
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn remote_cursors(&self) -> &BTreeMap<String, RemoteCursor> {
        self.session.as_ref().map_or(&NO_CURSORS, CollabBridge::cursors)
    }

    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        self.session.as_ref().map(CollabBridge::participants).unwrap_or_default()
    }

    /// Everything the renderer needs for the next frame.
    #[must_use]
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            scene: &self.scene,
            camera: &self.camera,
            config: &self.config,
            in_progress: self.in_progress(),
            selected: self.ui.selected_id.as_deref().and_then(|id| self.scene.get(id)),
            cursors: self.remote_cursors(),
            viewport_w: self.viewport_width,
            viewport_h: self.viewport_height,
            dpr: self.dpr,
        }
    }

    // --- Internals ---

    /// Install `elements` as the scene and hand the change to the bridge.
    fn commit(&mut self, elements: Vec<Element>) -> Vec<Action> {
        self.scene.replace(elements);

        if let Some(id) = self.ui.selected_id.as_deref() {
            if !self.scene.contains(id) {
                self.ui.selected_id = None;
            }
        }
        if let InputState::DraggingSelection { id, .. } = &self.input {
            if !self.scene.contains(id) {
                self.input = InputState::Idle;
            }
        }

        let mut actions = vec![Action::RenderNeeded];
        if let Some(bridge) = self.session.as_mut() {
            if let Some(msg) = bridge.scene_changed(self.scene.elements(), self.now_ms) {
                actions.push(Action::Broadcast(msg));
            }
        }
        actions
    }

    fn select_at(&mut self, world: Point) -> Vec<Action> {
        let Some(hit) = hit_test(world, &self.scene) else {
            if self.ui.selected_id.take().is_some() {
                return vec![Action::RenderNeeded];
            }
            return Vec::new();
        };
        let anchor = self.scene.elements()[hit.index].anchor();
        self.input = InputState::DraggingSelection {
            id: hit.element_id.clone(),
            offset: Point::new(world.x - anchor.x, world.y - anchor.y),
            snapshotted: false,
        };
        self.ui.selected_id = Some(hit.element_id);
        vec![Action::RenderNeeded]
    }

    fn open_text_entry(&mut self, world: Point) -> Vec<Action> {
        self.ui.text_entry = Some(TextEntry { world });
        self.text_overlay_moved().into_iter().collect()
    }

    fn erase_at(&mut self, world: Point) -> Vec<Action> {
        let Some(hit) = hit_test(world, &self.scene) else {
            return Vec::new();
        };
        self.history.push(&self.scene);
        let next = self.scene.without(&hit.element_id);
        self.commit(next)
    }

    fn start_drawing(&mut self, world: Point) -> Vec<Action> {
        let Some(shape) = start_shape(self.ui.tool, world) else {
            return Vec::new();
        };
        self.history.push(&self.scene);
        self.input = InputState::Drawing { element: Element::new(&self.brush(), shape) };
        vec![Action::RenderNeeded]
    }

    /// Move the dragged element so its anchor sits at `world - offset`.
    ///
    /// The pre-drag scene is snapshotted once, on the first move that
    /// actually changes the element.
    fn drag_to(&mut self, world: Point) -> Vec<Action> {
        let InputState::DraggingSelection { id, offset, snapshotted } = &mut self.input else {
            return Vec::new();
        };
        let target = Point::new(world.x - offset.x, world.y - offset.y);
        let Some(element) = self.scene.get(id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };
        if element.anchor() == target {
            return Vec::new();
        }
        if !*snapshotted {
            self.history.push(&self.scene);
            *snapshotted = true;
        }
        let next = self.scene.with_moved(id, target);
        self.commit(next)
    }

    fn finish_gesture(&mut self) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Drawing { element } => {
                if element.is_degenerate() {
                    debug!(tool = element.tool_name(), "discarding degenerate element");
                    return vec![Action::RenderNeeded];
                }
                let next = self.scene.with_appended(element);
                self.commit(next)
            }
            InputState::Idle | InputState::Panning { .. } | InputState::DraggingSelection { .. } => Vec::new(),
        }
    }

    fn zoom_by(&mut self, anchor: Point, factor: f64) -> Vec<Action> {
        let before = self.camera;
        self.camera.zoom_at(anchor, self.camera.zoom * factor);
        if self.camera == before {
            return Vec::new();
        }
        let mut actions = vec![Action::RenderNeeded];
        actions.extend(self.text_overlay_moved());
        actions
    }

    /// Placement of the open text overlay under the current camera.
    fn text_overlay_moved(&self) -> Option<Action> {
        let entry = self.ui.text_entry?;
        Some(Action::EditTextRequested {
            screen: self.camera.world_to_screen(entry.world),
            font_size_px: self.config.default_font_size * self.camera.zoom,
        })
    }

    fn delete_selection(&mut self) -> Vec<Action> {
        let Some(id) = self.ui.selected_id.take() else {
            return Vec::new();
        };
        if !self.scene.contains(&id) {
            return vec![Action::RenderNeeded];
        }
        self.history.push(&self.scene);
        let next = self.scene.without(&id);
        self.commit(next)
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport_width / 2.0, self.viewport_height / 2.0)
    }
}

fn clamp_stroke_width(width: f64) -> f64 {
    if width.is_nan() { MIN_STROKE_WIDTH } else { width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH) }
}

/// The zero-size shape a drawing tool starts with at `world`.
fn start_shape(tool: Tool, world: Point) -> Option<Shape> {
    let Point { x, y } = world;
    match tool {
        Tool::Pen => Some(Shape::Pen { points: vec![world] }),
        Tool::Line => Some(Shape::Line { x, y, w: 0.0, h: 0.0 }),
        Tool::Rect => Some(Shape::Rect { x, y, w: 0.0, h: 0.0, fill: true }),
        Tool::Ellipse => Some(Shape::Ellipse { x, y, w: 0.0, h: 0.0, fill: true }),
        Tool::Select | Tool::Text | Tool::Eraser => None,
    }
}

/// Grow an in-progress shape to the pointer at `world`.
fn extend_shape(shape: &mut Shape, world: Point) {
    match shape {
        Shape::Pen { points } => points.push(world),
        Shape::Line { x, y, w, h } | Shape::Rect { x, y, w, h, .. } | Shape::Ellipse { x, y, w, h, .. } => {
            *w = world.x - *x;
            *h = world.y - *y;
        }
        Shape::Text { .. } => {}
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    pub core: EngineCore,
}

impl Engine {
    /// Create a new engine bound to the given canvas element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, CanvasError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|err| CanvasError::Render(format!("get_context failed: {err:?}")))?
            .ok_or_else(|| CanvasError::Render("2d context unavailable".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| CanvasError::Render("context is not a CanvasRenderingContext2d".to_owned()))?;
        Ok(Self { canvas, ctx, core: EngineCore::new() })
    }

    fn stamp(&mut self) {
        self.core.set_clock(js_sys::Date::now());
    }

    // --- Delegated session inputs ---

    pub fn open_session(&mut self, doc: WhiteboardDoc, user: LocalUser) -> Vec<Action> {
        self.stamp();
        self.core.open_session(doc, user)
    }

    pub fn close_session(&mut self) -> Vec<Action> {
        self.stamp();
        self.core.close_session()
    }

    pub fn receive_json(&mut self, text: &str) -> Vec<Action> {
        self.stamp();
        self.core.receive_json(text)
    }

    /// Emit any autosave that has come due. Call from a host timer.
    pub fn tick(&mut self) -> Vec<Action> {
        self.core.tick(js_sys::Date::now())
    }

    pub fn save_failed(&mut self, request: SaveRequest, error: &CanvasError) {
        self.stamp();
        self.core.save_failed(request, error);
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.core.set_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.core.set_stroke_width(width);
    }

    pub fn commit_text(&mut self, text: &str) -> Vec<Action> {
        self.stamp();
        self.core.commit_text(text)
    }

    pub fn cancel_text(&mut self) -> Vec<Action> {
        self.core.cancel_text()
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.stamp();
        self.core.undo()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.stamp();
        self.core.redo()
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.core.zoom_in()
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.core.zoom_out()
    }

    // --- Viewport ---

    /// Update viewport dimensions and resize the backing store to match.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let actions = self.core.set_viewport(width_css, height_css, dpr);
        let dpr = self.core.dpr;
        self.canvas.set_width((width_css * dpr).round().max(0.0) as u32);
        self.canvas.set_height((height_css * dpr).round().max(0.0) as u32);
        actions
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.stamp();
        self.core.on_pointer_down(screen_pt, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        self.stamp();
        self.core.on_pointer_move(screen_pt, modifiers)
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.stamp();
        self.core.on_pointer_up(screen_pt, button, modifiers)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.stamp();
        self.core.on_pointer_leave()
    }

    pub fn on_wheel(&mut self, screen_pt: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(screen_pt, delta, modifiers)
    }

    pub fn on_key_down(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.stamp();
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_key_up(&mut self, key: Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_up(key, modifiers)
    }

    // --- Render / export ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if a canvas call throws.
    pub fn render(&mut self) -> Result<(), CanvasError> {
        let view = self.core.render_view();
        render::draw(&mut self.ctx, &view).map_err(|err| CanvasError::Render(format!("{err:?}")))
    }

    /// Serialize the canvas to a `data:image/png` URL.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Render`] if the canvas refuses to export.
    pub fn export_png(&self) -> Result<String, CanvasError> {
        self.canvas
            .to_data_url_with_type("image/png")
            .map_err(|err| CanvasError::Render(format!("export failed: {err:?}")))
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&str> {
        self.core.selection()
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera()
    }

    #[must_use]
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.core.element(id)
    }
}
