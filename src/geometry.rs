//! Planar geometry helpers.
//!
//! Distances, headings, and the coarse segment-membership test used by the
//! line-of-sight and scoring code. Angles are in degrees with 0 along +x.

use serde::{Deserialize, Serialize};

/// Errors raised by the geometry helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("cannot rescale values whose sum is zero")]
    ZeroSum,
}

/// A position in arena coordinates. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Point { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Heading of `target` as seen from `origin`, in `[0, 360)`.
pub fn angle_deg(target: Point, origin: Point) -> f64 {
    let dy = target.y - origin.y;
    let dx = target.x - origin.x;
    wrap_deg(dy.atan2(dx).to_degrees())
}

/// Folds any angle into `[0, 360)`.
pub fn wrap_deg(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Divides every value by the total and multiplies by `scale`.
///
/// An empty slice rescales to an empty vector. A slice summing to exactly
/// zero has no defined share and yields [`GeometryError::ZeroSum`].
pub fn rescale(values: &[f64], scale: f64) -> Result<Vec<f64>, GeometryError> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let total: f64 = values.iter().sum();
    if total == 0.0 {
        return Err(GeometryError::ZeroSum);
    }
    Ok(values.iter().map(|v| v / total * scale).collect())
}

/// Returns true if `point` lies on the segment `a`-`b`, within integer
/// tolerance.
///
/// Both the segment length and the detour through `point` are truncated to
/// whole units before comparing, so points up to roughly one unit off the
/// line still count. The coarseness is intentional: wall and tank positions
/// are tile centres, not exact collinear points.
pub fn point_between(point: Point, a: Point, b: Point) -> bool {
    let direct = distance(a, b).trunc();
    let detour = (distance(point, a) + distance(point, b)).trunc();
    direct - detour == 0.0
}
