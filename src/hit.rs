#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::consts::{ELLIPSE_HIT_THRESHOLD, STROKE_HIT_SLOP};
use crate::doc::{Element, ElementId, Scene, Shape, text_box};
use crate::geometry::{Extent, point_in_ellipse, point_in_rect, point_near_segment};

/// Result of a scene hit test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Position of the hit element in draw order.
    pub index: usize,
    /// Id of the hit element.
    pub element_id: ElementId,
}

/// Whether `world_pt` touches `element`'s rendered extent.
#[must_use]
pub fn hit_element(world_pt: Point, element: &Element) -> bool {
    let slop = element.stroke_width + STROKE_HIT_SLOP;
    match &element.shape {
        Shape::Pen { points } => points
            .windows(2)
            .any(|seg| point_near_segment(world_pt, seg[0], seg[1], slop)),
        Shape::Line { x, y, w, h } => point_near_segment(world_pt, Point::new(*x, *y), Point::new(x + w, y + h), slop),
        Shape::Rect { x, y, w, h, .. } => point_in_rect(world_pt, Extent::new(*x, *y, *w, *h)),
        Shape::Ellipse { x, y, w, h, .. } => {
            point_in_ellipse(world_pt, Extent::new(*x, *y, *w, *h), ELLIPSE_HIT_THRESHOLD)
        }
        Shape::Text { x, y, w, h, .. } => point_in_rect(world_pt, text_box(*x, *y, *w, *h)),
    }
}

/// Test which element (if any) is under `world_pt`.
///
/// Elements are checked back-to-front, so the topmost drawn element wins.
#[must_use]
pub fn hit_test(world_pt: Point, scene: &Scene) -> Option<Hit> {
    scene
        .elements()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, e)| hit_element(world_pt, e))
        .map(|(index, e)| Hit { index, element_id: e.id.clone() })
}
