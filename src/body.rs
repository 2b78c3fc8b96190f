use crate::integrator::rk4_step;
use crate::math::{distance, heading_vector, Point2d, Vector2d};
use crate::snapshot::{PointRecord, Snapshot};
use crate::AgentKind;

/// The distance from the goal within which an agent has reached it, in m.
pub const GOAL_TOLERANCE: f64 = 0.1; // m

/// The attributes of a simulated agent.
#[derive(Clone, Copy, Debug)]
pub struct AgentAttributes {
    /// The initial position in m.
    pub position: Point2d,
    /// The position the agent is heading for in m.
    pub goal_position: Point2d,
    /// The initial heading in degrees, 0° along +x and increasing counter-clockwise.
    pub heading_angle: f64,
    /// The length of the agent in m.
    pub length: f64,
    /// The width of the agent in m.
    pub width: f64,
}

/// The kinematic state shared by every kind of agent.
///
/// A body moves holonomically: its heading and velocity directly define its translation.
#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    /// The current position in m.
    position: Point2d,
    /// The goal position in m.
    goal_position: Point2d,
    /// The heading in degrees. Not normalised on creation.
    heading_angle: f64,
    /// The signed speed along the heading in m/s.
    velocity: f64,
    /// The acceleration in m/s^2.
    acceleration: f64,
    /// The length in m.
    length: f64,
    /// The width in m.
    width: f64,
}

impl Body {
    /// Creates a new body at rest.
    pub fn new(attributes: &AgentAttributes) -> Self {
        Self {
            position: attributes.position,
            goal_position: attributes.goal_position,
            heading_angle: attributes.heading_angle,
            velocity: 0.0,
            acceleration: 0.0,
            length: attributes.length,
            width: attributes.width,
        }
    }

    /// Restores a body from a snapshot record. The `type` field is not inspected.
    pub(crate) fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            position: snapshot.position.into(),
            goal_position: snapshot.goal_position.into(),
            heading_angle: snapshot.heading_angle,
            velocity: snapshot.velocity,
            acceleration: snapshot.acceleration,
            length: snapshot.length,
            width: snapshot.width,
        }
    }

    /// The current position in m.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// The goal position in m.
    pub fn goal_position(&self) -> Point2d {
        self.goal_position
    }

    /// The heading in degrees.
    pub fn heading_angle(&self) -> f64 {
        self.heading_angle
    }

    /// A unit vector aligned with the heading.
    pub fn direction(&self) -> Vector2d {
        heading_vector(self.heading_angle)
    }

    /// The velocity in m/s.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// The acceleration in m/s^2.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// The length in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The width in m.
    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn set_goal_position(&mut self, goal: Point2d) {
        self.goal_position = goal;
    }

    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    pub fn set_acceleration(&mut self, acceleration: f64) {
        self.acceleration = acceleration;
    }

    pub(crate) fn set_position(&mut self, position: Point2d) {
        self.position = position;
    }

    pub(crate) fn set_heading_angle(&mut self, heading: f64) {
        self.heading_angle = heading;
    }

    /// The straight-line distance to the goal in m.
    pub fn distance_to_goal(&self) -> f64 {
        distance(self.position, self.goal_position)
    }

    /// Whether the body is within [GOAL_TOLERANCE] of its goal.
    pub fn reached_goal(&self) -> bool {
        self.distance_to_goal() <= GOAL_TOLERANCE
    }

    /// Points the body straight at its goal, with a speed proportional to the remaining distance.
    ///
    /// # Parameters
    /// * `time_to_goal` - The number of seconds the body would take to reach the goal at that speed
    pub(crate) fn aim_at_goal(&mut self, time_to_goal: f64) {
        let to_goal = self.goal_position - self.position;
        self.velocity = self.distance_to_goal() / time_to_goal;
        self.heading_angle = to_goal.y.atan2(to_goal.x).to_degrees();
    }

    /// Integrates the body's velocity and position using the explicit Euler method.
    /// Returns `true` iff the body has reached its goal.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub fn update(&mut self, dt: f64) -> bool {
        self.position += self.velocity * dt * self.direction();
        self.velocity += self.acceleration * dt;
        self.reached_goal()
    }

    /// Integrates the body's velocity and position using the fourth-order Runge-Kutta method.
    /// Returns `true` iff the body has reached its goal.
    ///
    /// The same scalar displacement is added to both `x` and `y`; it is not
    /// decomposed along the heading as [Body::update] does.
    ///
    /// # Parameters
    /// * `dt` - The time step in seconds
    pub fn update_rk4(&mut self, dt: f64) -> bool {
        let step = rk4_step(self.velocity, self.acceleration, dt);
        self.position.x += step.displacement;
        self.position.y += step.displacement;
        self.velocity += step.delta_vel;
        self.reached_goal()
    }

    /// Creates a snapshot record of the body with the given type discriminator.
    pub(crate) fn snapshot(&self, kind: AgentKind) -> Snapshot {
        Snapshot {
            kind: kind.to_string(),
            position: PointRecord::from(self.position),
            goal_position: PointRecord::from(self.goal_position),
            heading_angle: self.heading_angle,
            length: self.length,
            width: self.width,
            velocity: self.velocity,
            acceleration: self.acceleration,
            steering_angle: None,
            front_overhang: None,
            rear_overhang: None,
            omega: None,
            origin: None,
        }
    }
}
