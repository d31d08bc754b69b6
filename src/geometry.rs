//! Geometry kernel: distance and containment predicates in world space.
//!
//! Every function here is pure. Degenerate input (a zero-length segment, a
//! zero-radius ellipse) is a normal case with a defined answer, never an error.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;

/// An axis-aligned box described by an anchor corner and signed extents.
///
/// A negative `w` or `h` means the anchor is the opposite corner, which is
/// what a drag up or to the left produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Extent {
    #[must_use]
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Same box with the anchor moved to the top-left and non-negative extents.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            x: self.x.min(self.x + self.w),
            y: self.y.min(self.y + self.h),
            w: self.w.abs(),
            h: self.h.abs(),
        }
    }

    /// Grow the box by `pad` on every side. Normalizes first.
    #[must_use]
    pub fn padded(self, pad: f64) -> Self {
        let n = self.normalized();
        Self {
            x: n.x - pad,
            y: n.y - pad,
            w: n.w + pad * 2.0,
            h: n.h + pad * 2.0,
        }
    }

    /// Center of the box.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Whether `p` lies within `threshold` of the segment `a`–`b`.
///
/// The point is projected onto the segment with the parameter clamped to
/// `[0, 1]`, so the ends behave like round caps. A zero-length segment falls
/// back to plain point distance.
#[must_use]
pub fn point_near_segment(p: Point, a: Point, b: Point, threshold: f64) -> bool {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq < f64::EPSILON {
        return distance(p, a) < threshold;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(t.mul_add(dx, a.x), t.mul_add(dy, a.y));
    distance(p, proj) < threshold
}

/// Whether `p` lies inside (or on the edge of) `rect`. Negative extents are allowed.
#[must_use]
pub fn point_in_rect(p: Point, rect: Extent) -> bool {
    let r = rect.normalized();
    p.x >= r.x && p.x <= r.x + r.w && p.y >= r.y && p.y <= r.y + r.h
}

/// Whether `p` lies inside the ellipse inscribed in `ellipse`, expanded by `threshold`.
///
/// Uses the normalized squared distance `((x-cx)/rx)^2 + ((y-cy)/ry)^2` and
/// compares it against `(1 + threshold / max(rx, ry))^2`, so points just
/// outside the outline still register. A flat ellipse never hits.
#[must_use]
pub fn point_in_ellipse(p: Point, ellipse: Extent, threshold: f64) -> bool {
    let e = ellipse.normalized();
    let rx = e.w / 2.0;
    let ry = e.h / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }
    let c = e.center();
    let nx = (p.x - c.x) / rx;
    let ny = (p.y - c.y) / ry;
    let limit = 1.0 + threshold / rx.max(ry);
    nx * nx + ny * ny <= limit * limit
}
