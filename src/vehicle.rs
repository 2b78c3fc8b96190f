use self::dynamics::{center_from_origin, heading_rate, origin_from_center, STEERING_LIMITS};
use crate::body::{AgentAttributes, Body};
use crate::debug::debug_line;
use crate::error::{Error, Result};
use crate::math::{distance, normalize_heading, signed_angle, Point2d, Vector2d};
use crate::snapshot::{PointRecord, Snapshot};
use crate::AgentKind;

pub use self::acceleration::IdmParams;

mod acceleration;
pub mod dynamics;

/// A simulated vehicle following the single-track (bicycle) kinematic model.
///
/// The rear-axle `origin` is the integration state; the centre `position` is
/// always derived from it, the heading and the wheel base.
#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    /// The shared kinematic state. Its `length` is the wheel base.
    body: Body,
    /// The centre of the rear axle in world space.
    origin: Point2d,
    /// The angular velocity of the steering angle in deg/s.
    omega: f64,
    /// The steering angle in degrees, within [STEERING_LIMITS].
    steering_angle: f64,
    /// Distance from the front axle to the front of the vehicle in m.
    front_overhang: f64,
    /// Distance from the rear axle to the rear of the vehicle in m.
    rear_overhang: f64,
}

/// The attributes of a simulated vehicle.
#[derive(Clone, Copy, Debug)]
pub struct VehicleAttributes {
    /// The shared attributes; `length` is the distance between the axles.
    pub agent: AgentAttributes,
    /// Distance from the front axle to the front of the vehicle in m.
    pub front_overhang: f64,
    /// Distance from the rear axle to the rear of the vehicle in m.
    pub rear_overhang: f64,
    /// The initial steering angle in degrees.
    pub steering_angle: f64,
}

impl Vehicle {
    /// Creates a new vehicle at rest, centred on `attributes.agent.position`.
    pub fn new(attributes: &VehicleAttributes) -> Self {
        let body = Body::new(&attributes.agent);
        let origin = origin_from_center(body.position(), body.heading_angle(), body.length());
        let mut vehicle = Self {
            body,
            origin,
            omega: 0.0,
            steering_angle: attributes.steering_angle,
            front_overhang: attributes.front_overhang,
            rear_overhang: attributes.rear_overhang,
        };
        vehicle.sync_center();
        vehicle
    }

    /// Restores a vehicle from a snapshot record.
    ///
    /// The stored origin is authoritative: the centre is re-derived from it,
    /// whatever `position` the record holds.
    pub(crate) fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let field = |value: Option<f64>, field: &'static str| {
            value.ok_or_else(|| Error::MissingField {
                kind: snapshot.kind.clone(),
                field,
            })
        };
        let origin = snapshot.origin.ok_or_else(|| Error::MissingField {
            kind: snapshot.kind.clone(),
            field: "origin",
        })?;
        let mut vehicle = Self {
            body: Body::from_snapshot(snapshot),
            origin: origin.into(),
            omega: field(snapshot.omega, "omega")?,
            steering_angle: field(snapshot.steering_angle, "steering_angle")?,
            front_overhang: field(snapshot.front_overhang, "front_overhang")?,
            rear_overhang: field(snapshot.rear_overhang, "rear_overhang")?,
        };
        vehicle.sync_center();
        Ok(vehicle)
    }

    /// Moves the centre onto `origin + L/2 * dir`.
    fn sync_center(&mut self) {
        self.body.set_position(self.center_from_origin());
    }

    /// The shared kinematic state.
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// The coordinates in world space of the centre of the vehicle.
    pub fn position(&self) -> Point2d {
        self.body.position()
    }

    /// The coordinates in world space of the centre of the rear axle.
    pub fn origin(&self) -> Point2d {
        self.origin
    }

    /// The heading in degrees.
    pub fn heading_angle(&self) -> f64 {
        self.body.heading_angle()
    }

    /// A unit vector in world space aligned with the vehicle's heading.
    pub fn direction(&self) -> Vector2d {
        self.body.direction()
    }

    /// The vehicle's velocity in m/s.
    pub fn velocity(&self) -> f64 {
        self.body.velocity()
    }

    /// The vehicle's acceleration in m/s^2.
    pub fn acceleration(&self) -> f64 {
        self.body.acceleration()
    }

    /// The distance between the axles in m.
    pub fn length(&self) -> f64 {
        self.body.length()
    }

    /// The vehicle's width in m.
    pub fn width(&self) -> f64 {
        self.body.width()
    }

    /// The steering angle in degrees.
    pub fn steering_angle(&self) -> f64 {
        self.steering_angle
    }

    /// The angular velocity of the steering angle in deg/s.
    pub fn omega(&self) -> f64 {
        self.omega
    }

    pub fn front_overhang(&self) -> f64 {
        self.front_overhang
    }

    pub fn rear_overhang(&self) -> f64 {
        self.rear_overhang
    }

    /// The point used as this vehicle's front when following another.
    pub fn front_coords(&self) -> Point2d {
        self.position() + (self.front_overhang + self.length()) * self.direction()
    }

    /// The point used as this vehicle's rear when being followed.
    pub fn rear_coords(&self) -> Point2d {
        self.position() - self.rear_overhang * self.direction()
    }

    /// Computes the rear-axle origin implied by the current centre and heading.
    pub fn origin_from_center(&self) -> Point2d {
        origin_from_center(self.position(), self.heading_angle(), self.length())
    }

    /// Computes the centre implied by the current origin and heading.
    pub fn center_from_origin(&self) -> Point2d {
        center_from_origin(self.origin, self.heading_angle(), self.length())
    }

    /// Sets the vehicle's velocity.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.body.set_velocity(velocity);
    }

    /// Sets the vehicle's goal position.
    pub fn set_goal_position(&mut self, goal: Point2d) {
        self.body.set_goal_position(goal);
    }

    /// Rotates the vehicle about its centre to the given heading.
    pub fn set_heading_angle(&mut self, heading: f64) {
        self.body.set_heading_angle(heading);
        self.origin = self.origin_from_center();
        self.sync_center();
    }

    /// Sets the vehicle's acceleration.
    pub fn accelerate(&mut self, acceleration: f64) {
        self.body.set_acceleration(acceleration);
    }

    /// Sets the angular velocity of the steering angle.
    pub fn steer(&mut self, omega: f64) {
        self.omega = omega;
    }

    /// The signed angle in degrees the vehicle must turn through to face `target`.
    pub fn heading_error(&self, target: Point2d) -> f64 {
        signed_angle(self.origin, self.position(), target)
    }

    /// Commands the steering towards `target`, proportionally to the heading error.
    ///
    /// # Parameters
    /// * `target` - The point to steer towards
    /// * `max_omega` - The steering rate commanded for a 180° heading error, in deg/s
    pub fn steer_towards(&mut self, target: Point2d, max_omega: f64) {
        let ratio = (self.heading_error(target) / 180.0).clamp(-1.0, 1.0);
        self.steer(ratio * max_omega);
    }

    /// Advances the vehicle by one step of the bicycle model.
    /// Returns `true` iff the vehicle has reached its goal.
    ///
    /// The wheel base must be non-zero.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub fn update(&mut self, dt: f64) -> bool {
        // Steering first, then heading, then translation
        self.steering_angle = STEERING_LIMITS.clamp(self.steering_angle + self.omega * dt);

        let vel = self.velocity();
        let turn = heading_rate(vel, self.length(), self.steering_angle) * dt;
        let heading = normalize_heading(self.heading_angle() + turn);
        self.body.set_heading_angle(heading);

        self.origin += vel * dt * self.direction();
        self.sync_center();
        self.body.set_velocity(vel + self.acceleration() * dt);
        self.body.reached_goal()
    }

    /// Advances the vehicle's centre using the fourth-order Runge-Kutta method,
    /// then re-derives the origin from it. Steering and heading are unchanged.
    /// Returns `true` iff the vehicle has reached its goal.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub fn update_rk4(&mut self, dt: f64) -> bool {
        let reached = self.body.update_rk4(dt);
        self.origin = self.origin_from_center();
        self.sync_center();
        reached
    }

    /// Computes the straight-line distance from this vehicle's front to the rear of `other`.
    ///
    /// Only meaningful when the two vehicles are roughly co-linear.
    pub fn gap(&self, other: &Vehicle) -> f64 {
        let front = self.front_coords();
        let rear = other.rear_coords();
        debug_line("gap", front, rear);
        distance(front, rear)
    }

    /// Sets the acceleration using the intelligent driver model to follow `other`,
    /// then advances the vehicle by one step.
    /// Returns `true` iff the vehicle has reached its goal.
    ///
    /// The gap to `other` must be non-zero, and `idm.max_acceleration` and
    /// `idm.comf_deceleration` must be positive.
    ///
    /// # Parameters
    /// * `other` - The vehicle ahead
    /// * `idm` - The car following parameters
    /// * `dt` - The time step in seconds
    pub fn follow(&mut self, other: &Vehicle, idm: &IdmParams, dt: f64) -> bool {
        let gap = self.gap(other);
        let acc = idm.acceleration(gap, self.velocity(), other.velocity());
        self.accelerate(acc);
        self.update(dt)
    }

    /// Creates a snapshot record of the vehicle with the given type discriminator.
    pub(crate) fn snapshot(&self, kind: AgentKind) -> Snapshot {
        Snapshot {
            steering_angle: Some(self.steering_angle),
            front_overhang: Some(self.front_overhang),
            rear_overhang: Some(self.rear_overhang),
            omega: Some(self.omega),
            origin: Some(PointRecord::from(self.origin)),
            ..self.body.snapshot(kind)
        }
    }
}
