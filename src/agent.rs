use crate::body::Body;
use crate::error::{Error, Result};
use crate::integrator::Integrator;
use crate::math::Point2d;
use crate::snapshot::Snapshot;
use crate::vehicle::Vehicle;
use std::fmt;
use std::str::FromStr;

/// The number of seconds a goal-seeking agent plans to take to reach its goal.
pub const SEEK_SPEED_DIVISOR: f64 = 10.0; // s

/// The kind of a simulated agent, as recorded in a snapshot's `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentKind {
    Agent,
    Vehicle,
    Mmv,
    Pedestrian,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Agent => "agent",
            AgentKind::Vehicle => "vehicle",
            AgentKind::Mmv => "mmv",
            AgentKind::Pedestrian => "pedestrian",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "agent" => Ok(AgentKind::Agent),
            "vehicle" => Ok(AgentKind::Vehicle),
            "mmv" => Ok(AgentKind::Mmv),
            "pedestrian" => Ok(AgentKind::Pedestrian),
            other => Err(Error::UnknownAgentType(other.to_string())),
        }
    }
}

/// Something which moves on the plane and can be advanced in time.
pub trait Movable {
    /// The shared kinematic state.
    fn body(&self) -> &Body;

    /// Advances one step with the explicit Euler method (or the bicycle model for vehicles).
    /// Returns `true` iff the goal has been reached.
    fn update(&mut self, dt: f64) -> bool;

    /// Advances one step with the fourth-order Runge-Kutta method.
    /// Returns `true` iff the goal has been reached.
    fn update_rk4(&mut self, dt: f64) -> bool;

    /// Creates a serializable record of the current state.
    fn to_snapshot(&self) -> Snapshot;

    /// Advances one step with the given integrator.
    fn step(&mut self, dt: f64, integrator: Integrator) -> bool {
        match integrator {
            Integrator::Euler => self.update(dt),
            Integrator::Rk4 => self.update_rk4(dt),
        }
    }

    fn position(&self) -> Point2d {
        self.body().position()
    }

    fn heading_angle(&self) -> f64 {
        self.body().heading_angle()
    }

    fn velocity(&self) -> f64 {
        self.body().velocity()
    }
}

impl Movable for Body {
    fn body(&self) -> &Body {
        self
    }

    fn update(&mut self, dt: f64) -> bool {
        Body::update(self, dt)
    }

    fn update_rk4(&mut self, dt: f64) -> bool {
        Body::update_rk4(self, dt)
    }

    fn to_snapshot(&self) -> Snapshot {
        self.snapshot(AgentKind::Agent)
    }
}

impl Movable for Vehicle {
    fn body(&self) -> &Body {
        Vehicle::body(self)
    }

    fn update(&mut self, dt: f64) -> bool {
        Vehicle::update(self, dt)
    }

    fn update_rk4(&mut self, dt: f64) -> bool {
        Vehicle::update_rk4(self, dt)
    }

    fn to_snapshot(&self) -> Snapshot {
        self.snapshot(AgentKind::Vehicle)
    }
}

/// A simulated agent of any kind.
///
/// MMVs move exactly like vehicles and pedestrians exactly like generic agents;
/// the variants differ only in how they are recorded.
#[derive(Clone, Debug, PartialEq)]
pub enum Agent {
    Generic(Body),
    Vehicle(Vehicle),
    Mmv(Vehicle),
    Pedestrian(Body),
}

impl Agent {
    /// Reconstructs an agent from a snapshot record.
    ///
    /// Fails with [Error::UnknownAgentType] if the `type` field is not recognised,
    /// and with [Error::MissingField] if a vehicle record lacks a bicycle-model field.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let agent = match snapshot.kind.parse::<AgentKind>()? {
            AgentKind::Agent => Agent::Generic(Body::from_snapshot(snapshot)),
            AgentKind::Pedestrian => Agent::Pedestrian(Body::from_snapshot(snapshot)),
            AgentKind::Vehicle => Agent::Vehicle(Vehicle::from_snapshot(snapshot)?),
            AgentKind::Mmv => Agent::Mmv(Vehicle::from_snapshot(snapshot)?),
        };
        Ok(agent)
    }

    /// The kind of agent.
    pub fn kind(&self) -> AgentKind {
        match self {
            Agent::Generic(_) => AgentKind::Agent,
            Agent::Vehicle(_) => AgentKind::Vehicle,
            Agent::Mmv(_) => AgentKind::Mmv,
            Agent::Pedestrian(_) => AgentKind::Pedestrian,
        }
    }

    /// The agent as a vehicle, if it follows the bicycle model.
    pub fn as_vehicle(&self) -> Option<&Vehicle> {
        match self {
            Agent::Vehicle(veh) | Agent::Mmv(veh) => Some(veh),
            _ => None,
        }
    }

    /// The agent as a mutable vehicle, if it follows the bicycle model.
    pub fn as_vehicle_mut(&mut self) -> Option<&mut Vehicle> {
        match self {
            Agent::Vehicle(veh) | Agent::Mmv(veh) => Some(veh),
            _ => None,
        }
    }

    fn movable(&self) -> &dyn Movable {
        match self {
            Agent::Generic(body) | Agent::Pedestrian(body) => body,
            Agent::Vehicle(veh) | Agent::Mmv(veh) => veh,
        }
    }

    fn movable_mut(&mut self) -> &mut dyn Movable {
        match self {
            Agent::Generic(body) | Agent::Pedestrian(body) => body,
            Agent::Vehicle(veh) | Agent::Mmv(veh) => veh,
        }
    }

    /// Sets the agent's velocity.
    pub fn set_velocity(&mut self, velocity: f64) {
        match self {
            Agent::Generic(body) | Agent::Pedestrian(body) => body.set_velocity(velocity),
            Agent::Vehicle(veh) | Agent::Mmv(veh) => veh.set_velocity(velocity),
        }
    }

    /// Sets the agent's goal position.
    pub fn set_goal_position(&mut self, goal: Point2d) {
        match self {
            Agent::Generic(body) | Agent::Pedestrian(body) => body.set_goal_position(goal),
            Agent::Vehicle(veh) | Agent::Mmv(veh) => veh.set_goal_position(goal),
        }
    }

    /// Points the agent at its goal with a speed that would reach it in
    /// [SEEK_SPEED_DIVISOR] seconds, then advances one Euler step.
    /// Returns `true` iff the goal has been reached.
    pub fn seek_goal(&mut self, dt: f64) -> bool {
        match self {
            Agent::Generic(body) | Agent::Pedestrian(body) => {
                body.aim_at_goal(SEEK_SPEED_DIVISOR);
                body.update(dt)
            }
            Agent::Vehicle(veh) | Agent::Mmv(veh) => {
                // Rotate about the centre so the origin stays consistent
                let mut aim = veh.body().clone();
                aim.aim_at_goal(SEEK_SPEED_DIVISOR);
                veh.set_velocity(aim.velocity());
                veh.set_heading_angle(aim.heading_angle());
                veh.update(dt)
            }
        }
    }
}

impl Movable for Agent {
    fn body(&self) -> &Body {
        self.movable().body()
    }

    fn update(&mut self, dt: f64) -> bool {
        self.movable_mut().update(dt)
    }

    fn update_rk4(&mut self, dt: f64) -> bool {
        self.movable_mut().update_rk4(dt)
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            kind: self.kind().to_string(),
            ..self.movable().to_snapshot()
        }
    }
}

impl TryFrom<&Snapshot> for Agent {
    type Error = Error;

    fn try_from(snapshot: &Snapshot) -> Result<Self> {
        Agent::from_snapshot(snapshot)
    }
}
