#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

#[test]
fn defaults_match_board_look() {
    let c = CanvasConfig::default();
    assert_eq!(c.background_color, "#121218");
    assert_eq!(c.grid_size, 40.0);
    assert_eq!(c.selection_color, "#6366f1");
    assert_eq!(c.history_limit, 50);
    assert_eq!(c.save_debounce_ms, 2000.0);
    assert_eq!(c.cursor_throttle_ms, 50.0);
    assert_eq!(c.default_font_size, 16.0);
}

#[test]
fn null_state_gives_defaults() {
    let c = CanvasConfig::from_canvas_state(&serde_json::Value::Null).unwrap();
    assert_eq!(c, CanvasConfig::default());
}

#[test]
fn non_object_state_gives_defaults() {
    let c = CanvasConfig::from_canvas_state(&json!("legacy")).unwrap();
    assert_eq!(c, CanvasConfig::default());
}

#[test]
fn empty_object_gives_defaults() {
    let c = CanvasConfig::from_canvas_state(&json!({})).unwrap();
    assert_eq!(c, CanvasConfig::default());
}

#[test]
fn partial_object_overrides_only_given_keys() {
    let c = CanvasConfig::from_canvas_state(&json!({
        "gridSize": 20,
        "backgroundColor": "#000000",
        "historyLimit": 10,
    }))
    .unwrap();
    assert_eq!(c.grid_size, 20.0);
    assert_eq!(c.background_color, "#000000");
    assert_eq!(c.history_limit, 10);
    assert_eq!(c.selection_color, DEFAULT_SELECTION_COLOR);
}

#[test]
fn unknown_keys_are_ignored() {
    let c = CanvasConfig::from_canvas_state(&json!({ "zoomHint": 2, "theme": "dark" })).unwrap();
    assert_eq!(c, CanvasConfig::default());
}

#[test]
fn wrong_type_is_an_error() {
    assert!(CanvasConfig::from_canvas_state(&json!({ "gridSize": "big" })).is_err());
}

// =============================================================
// Sanitising
// =============================================================

#[test]
fn tiny_grid_is_coarsened() {
    let c = CanvasConfig::from_canvas_state(&json!({ "gridSize": 0.001 })).unwrap();
    assert_eq!(c.grid_size, MIN_GRID_SIZE);
}

#[test]
fn negative_grid_disables_it() {
    let c = CanvasConfig::from_canvas_state(&json!({ "gridSize": -40 })).unwrap();
    assert_eq!(c.grid_size, 0.0);
}

#[test]
fn non_finite_values_fall_back_to_defaults() {
    let c = CanvasConfig {
        grid_size: f64::NAN,
        default_font_size: f64::INFINITY,
        default_stroke_width: f64::NAN,
        save_debounce_ms: f64::NAN,
        cursor_throttle_ms: f64::NEG_INFINITY,
        ..CanvasConfig::default()
    }
    .sanitized();
    assert_eq!(c, CanvasConfig::default());
}

#[test]
fn non_positive_font_size_falls_back_to_default() {
    let c = CanvasConfig::from_canvas_state(&json!({ "defaultFontSize": -16 })).unwrap();
    assert_eq!(c.default_font_size, DEFAULT_FONT_SIZE);
    let c = CanvasConfig::from_canvas_state(&json!({ "defaultFontSize": 0 })).unwrap();
    assert_eq!(c.default_font_size, DEFAULT_FONT_SIZE);
}

#[test]
fn small_font_size_is_raised_to_minimum() {
    let c = CanvasConfig::from_canvas_state(&json!({ "defaultFontSize": 2 })).unwrap();
    assert_eq!(c.default_font_size, MIN_FONT_SIZE);
}

#[test]
fn negative_timings_fall_back_to_defaults() {
    let c = CanvasConfig::from_canvas_state(&json!({ "saveDebounceMs": -1, "cursorThrottleMs": -50 })).unwrap();
    assert_eq!(c.save_debounce_ms, DEFAULT_SAVE_DEBOUNCE_MS);
    assert_eq!(c.cursor_throttle_ms, DEFAULT_CURSOR_THROTTLE_MS);
}

#[test]
fn zero_timings_are_kept() {
    let c = CanvasConfig::from_canvas_state(&json!({ "saveDebounceMs": 0, "cursorThrottleMs": 0 })).unwrap();
    assert_eq!(c.save_debounce_ms, 0.0);
    assert_eq!(c.cursor_throttle_ms, 0.0);
}

#[test]
fn stroke_width_and_history_limit_are_bounded() {
    let c = CanvasConfig::from_canvas_state(&json!({ "defaultStrokeWidth": 0.2, "historyLimit": 0 })).unwrap();
    assert_eq!(c.default_stroke_width, MIN_STROKE_WIDTH);
    assert_eq!(c.history_limit, 1);
}

#[test]
fn in_range_values_pass_through() {
    let c = CanvasConfig::from_canvas_state(&json!({ "gridSize": 24, "defaultFontSize": 20, "saveDebounceMs": 500 })).unwrap();
    assert_eq!(c.grid_size, 24.0);
    assert_eq!(c.default_font_size, 20.0);
    assert_eq!(c.save_debounce_ms, 500.0);
}
