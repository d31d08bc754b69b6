//! Collaborative whiteboard canvas engine.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and also
//! builds natively so the whole controller can be tested without a DOM. It owns
//! the drawing session for one whiteboard: translating raw input events into
//! scene changes, maintaining pan/zoom camera state, hit-testing elements,
//! local undo/redo, and redrawing the scene. The host JavaScript layer wires
//! DOM events and the realtime socket to the engine and carries out the
//! resulting [`engine::Action`]s (broadcasts, autosaves, redraws).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Element model and the ordered [`doc::Scene`] |
//! | [`geometry`] | Distance, segment, rectangle and ellipse predicates |
//! | [`hit`] | Hit-testing against scene elements |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, input event types and the gesture state machine |
//! | [`history`] | Snapshot undo/redo |
//! | [`render`] | Redraw pipeline over a 2D [`render::Surface`] |
//! | [`sync`] | Realtime payloads, echo suppression, autosave debounce |
//! | [`store`] | Document-store REST client |
//! | [`config`] | Per-board [`config::CanvasConfig`] |
//! | [`error`] | [`error::CanvasError`] and error codes |
//! | [`consts`] | Shared numeric constants (zoom limits, hit slop, etc.) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod history;
pub mod input;
pub mod render;
pub mod store;
pub mod sync;
