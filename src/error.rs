use crate::AgentId;
use thiserror::Error;

/// Errors surfaced by the agent registry and snapshot reconstruction.
///
/// The motion and control math itself never fails; see the preconditions
/// documented on [crate::Vehicle::update] and [crate::Vehicle::follow].
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown agent type: {0}")]
    UnknownAgentType(String),

    #[error("Snapshot of type {kind} is missing field `{field}`")]
    MissingField { kind: String, field: &'static str },

    #[error("Agent not found: {0:?}")]
    NotFound(AgentId),

    #[error("Agent {0:?} is not a vehicle")]
    NotAVehicle(AgentId),

    #[error("Agent {0:?} cannot follow itself")]
    SameAgent(AgentId),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
