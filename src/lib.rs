//! Kinematic motion core for agents, vehicles, micro-mobility vehicles and
//! pedestrians on a 2D plane.

pub use agent::{Agent, AgentKind, Movable, SEEK_SPEED_DIVISOR};
pub use body::{AgentAttributes, Body, GOAL_TOLERANCE};
pub use cgmath;
pub use error::{Error, Result};
pub use integrator::Integrator;
pub use registry::AgentRegistry;
use slotmap::{new_key_type, SlotMap};
pub use slotmap::{Key, KeyData};
pub use snapshot::{PointRecord, Snapshot};
pub use util::Interval;
pub use vehicle::dynamics::STEERING_LIMITS;
pub use vehicle::{IdmParams, Vehicle, VehicleAttributes};

mod agent;
mod body;
mod debug;
mod error;
mod integrator;
pub mod math;
mod registry;
mod snapshot;
mod util;
mod vehicle;

new_key_type! {
    /// Unique ID of an [Agent].
    pub struct AgentId;
}

type AgentSet = SlotMap<AgentId, Agent>;
