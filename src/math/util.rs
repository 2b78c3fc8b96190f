use super::{Point2d, Vector2d};
use cgmath::prelude::*;

/// Computes the Euclidean distance between two points.
pub fn distance(a: Point2d, b: Point2d) -> f64 {
    a.distance(b)
}

/// A unit vector pointing along the given heading.
///
/// # Parameters
/// * `heading` - The heading in degrees, 0° along +x and increasing counter-clockwise.
pub fn heading_vector(heading: f64) -> Vector2d {
    let rad = heading.to_radians();
    Vector2d::new(rad.cos(), rad.sin())
}

/// Normalises a heading into `[0, 360)` degrees.
pub fn normalize_heading(heading: f64) -> f64 {
    let heading = heading.rem_euclid(360.0);
    // `rem_euclid` rounds tiny negative inputs up to exactly 360
    if heading >= 360.0 {
        0.0
    } else {
        heading
    }
}

/// Wraps an angle into `(-180, 180]` degrees.
pub fn wrap_angle(angle: f64) -> f64 {
    let angle = normalize_heading(angle);
    if angle > 180.0 {
        angle - 360.0
    } else {
        angle
    }
}

/// Computes the signed angle in degrees to turn at `vertex`, from the direction
/// `origin -> vertex` to the direction `vertex -> target`.
/// Counter-clockwise turns are positive.
///
/// Returns `0.0` when either direction has zero length.
pub fn signed_angle(origin: Point2d, vertex: Point2d, target: Point2d) -> f64 {
    let v1 = vertex - origin;
    let v2 = target - vertex;
    if v1.magnitude2() == 0.0 || v2.magnitude2() == 0.0 {
        return 0.0;
    }
    let dot = v1.dot(v2);
    let cross = v1.x * v2.y - v1.y * v2.x;
    cross.atan2(dot).to_degrees()
}
