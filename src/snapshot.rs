//! Serializable records of agent state.

use crate::math::Point2d;
use serde::{Deserialize, Serialize};

/// A point as it appears in a snapshot, `{"x": .., "y": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

impl From<Point2d> for PointRecord {
    fn from(p: Point2d) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<PointRecord> for Point2d {
    fn from(p: PointRecord) -> Self {
        Point2d::new(p.x, p.y)
    }
}

/// A serializable view of an agent, sufficient to reconstruct it exactly.
///
/// The `type` discriminator is kept as a plain string so an unrecognised
/// value surfaces as [crate::Error::UnknownAgentType] rather than a parse error.
/// The bicycle-model fields are present only for vehicles and MMVs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: PointRecord,
    pub goal_position: PointRecord,
    pub heading_angle: f64,
    pub length: f64,
    pub width: f64,
    pub velocity: f64,
    pub acceleration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering_angle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_overhang: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rear_overhang: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<PointRecord>,
}
