use crate::math::{heading_vector, Point2d};
use crate::util::Interval;

/// The range the steering angle is confined to, in degrees.
pub const STEERING_LIMITS: Interval<f64> = Interval::new(-90.0, 90.0);

/// Computes the rear-axle origin of a vehicle from its centre.
pub fn origin_from_center(center: Point2d, heading: f64, length: f64) -> Point2d {
    center - 0.5 * length * heading_vector(heading)
}

/// Computes the centre of a vehicle from its rear-axle origin.
pub fn center_from_origin(origin: Point2d, heading: f64, length: f64) -> Point2d {
    origin + 0.5 * length * heading_vector(heading)
}

/// Computes the rate of change of heading under the single-track bicycle model.
///
/// The result is added to the heading (in degrees) unconverted.
///
/// # Parameters
/// * `vel` - The vehicle's velocity (m/s)
/// * `length` - The wheel base (m), must be non-zero
/// * `steering_angle` - The steering angle in degrees
pub fn heading_rate(vel: f64, length: f64, steering_angle: f64) -> f64 {
    (vel / length) * steering_angle.to_radians().tan()
}
