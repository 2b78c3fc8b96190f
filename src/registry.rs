#[cfg(feature = "debug")]
use crate::debug::{clear_debug_frame, take_debug_frame};
use crate::agent::{Agent, Movable};
use crate::body::{AgentAttributes, Body};
use crate::error::{Error, Result};
use crate::integrator::Integrator;
use crate::snapshot::Snapshot;
use crate::vehicle::{IdmParams, Vehicle, VehicleAttributes};
use crate::{AgentId, AgentSet};
use itertools::Itertools;
use log::{debug, trace, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// The set of agents being simulated, keyed by [AgentId].
///
/// Agents are only ever updated one at a time, on demand. Operations involving
/// two agents borrow the other one read-only for the duration of the call.
#[derive(Default)]
pub struct AgentRegistry {
    /// The agents.
    agents: AgentSet,
    /// Debugging information from the previous stepping operation.
    #[cfg(feature = "debug")]
    debug: serde_json::Value,
}

impl AgentRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds an agent of any kind to the registry.
    pub fn insert(&mut self, agent: Agent) -> AgentId {
        let kind = agent.kind();
        let id = self.agents.insert(agent);
        debug!("Added {} {:?}", kind, id);
        id
    }

    /// Adds a generic agent to the registry.
    pub fn add_agent(&mut self, attributes: &AgentAttributes) -> AgentId {
        self.insert(Agent::Generic(Body::new(attributes)))
    }

    /// Adds a vehicle to the registry.
    pub fn add_vehicle(&mut self, attributes: &VehicleAttributes) -> AgentId {
        self.insert(Agent::Vehicle(Vehicle::new(attributes)))
    }

    /// Adds a micro-mobility vehicle to the registry.
    pub fn add_mmv(&mut self, attributes: &VehicleAttributes) -> AgentId {
        self.insert(Agent::Mmv(Vehicle::new(attributes)))
    }

    /// Adds a pedestrian to the registry.
    pub fn add_pedestrian(&mut self, attributes: &AgentAttributes) -> AgentId {
        self.insert(Agent::Pedestrian(Body::new(attributes)))
    }

    /// Removes an agent from the registry, returning it.
    pub fn remove(&mut self, id: AgentId) -> Result<Agent> {
        let agent = self.agents.remove(id).ok_or(Error::NotFound(id))?;
        debug!("Removed {} {:?}", agent.kind(), id);
        Ok(agent)
    }

    /// Gets a reference to the agent with the given ID.
    pub fn get(&self, id: AgentId) -> Result<&Agent> {
        self.agents.get(id).ok_or(Error::NotFound(id))
    }

    /// Gets a mutable reference to the agent with the given ID.
    pub fn get_mut(&mut self, id: AgentId) -> Result<&mut Agent> {
        self.agents.get_mut(id).ok_or(Error::NotFound(id))
    }

    /// Gets a reference to the vehicle with the given ID.
    pub fn get_vehicle(&self, id: AgentId) -> Result<&Vehicle> {
        self.get(id)?.as_vehicle().ok_or(Error::NotAVehicle(id))
    }

    fn get_vehicle_mut(&mut self, id: AgentId) -> Result<&mut Vehicle> {
        self.get_mut(id)?.as_vehicle_mut().ok_or(Error::NotAVehicle(id))
    }

    /// The number of agents in the registry.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Returns an iterator over all the agents in the registry.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &Agent)> {
        self.agents.iter()
    }

    /// Advances a single agent by `dt` seconds.
    /// Returns `true` iff the agent has reached its goal.
    pub fn update(&mut self, id: AgentId, dt: f64, integrator: Integrator) -> Result<bool> {
        self.begin_debug();
        let agent = self.get_mut(id)?;
        let reached = agent.step(dt, integrator);
        trace!("Updated {:?}: {:?}", id, agent.position());
        self.take_debug();
        Ok(reached)
    }

    /// Advances every agent by `dt` seconds.
    /// Returns the IDs of the agents which have reached their goals.
    pub fn update_all(&mut self, dt: f64, integrator: Integrator) -> Vec<AgentId> {
        self.begin_debug();
        let reached = self
            .agents
            .iter_mut()
            .filter_map(|(id, agent)| agent.step(dt, integrator).then_some(id))
            .collect();
        self.take_debug();
        reached
    }

    /// Sets the acceleration of a vehicle.
    pub fn accelerate(&mut self, id: AgentId, acceleration: f64) -> Result<()> {
        self.get_vehicle_mut(id)?.accelerate(acceleration);
        Ok(())
    }

    /// Sets the angular velocity of a vehicle's steering angle.
    pub fn steer(&mut self, id: AgentId, omega: f64) -> Result<()> {
        self.get_vehicle_mut(id)?.steer(omega);
        Ok(())
    }

    /// Points an agent at its goal and advances it by `dt` seconds.
    /// Returns `true` iff the agent has reached its goal.
    pub fn seek_goal(&mut self, id: AgentId, dt: f64) -> Result<bool> {
        self.begin_debug();
        let reached = self.get_mut(id)?.seek_goal(dt);
        self.take_debug();
        Ok(reached)
    }

    /// Makes the vehicle `id` follow the vehicle `lead` using the intelligent
    /// driver model, advancing it by `dt` seconds. `lead` is not modified.
    /// Returns `true` iff the follower has reached its goal.
    pub fn follow(&mut self, id: AgentId, lead: AgentId, idm: &IdmParams, dt: f64) -> Result<bool> {
        self.begin_debug();
        let reached = self.follow_vehicle(id, lead, idm, dt)?;
        self.take_debug();
        Ok(reached)
    }

    /// Makes each vehicle in `platoon` follow the one before it, front to back.
    /// The first vehicle is the leader and is not moved.
    /// Returns the IDs of the followers which have reached their goals.
    pub fn follow_platoon(&mut self, platoon: &[AgentId], idm: &IdmParams, dt: f64) -> Result<Vec<AgentId>> {
        self.begin_debug();
        let mut reached = vec![];
        for (lead, id) in platoon.iter().copied().tuple_windows() {
            if self.follow_vehicle(id, lead, idm, dt)? {
                reached.push(id);
            }
        }
        self.take_debug();
        Ok(reached)
    }

    /// Applies the car following model to one pair of vehicles.
    fn follow_vehicle(&mut self, id: AgentId, lead: AgentId, idm: &IdmParams, dt: f64) -> Result<bool> {
        if id == lead {
            return Err(Error::SameAgent(id));
        }
        if let Some(missing) = [id, lead].into_iter().find(|key| !self.agents.contains_key(*key)) {
            return Err(Error::NotFound(missing));
        }
        let [follower, leader] = self
            .agents
            .get_disjoint_mut([id, lead])
            .ok_or(Error::SameAgent(id))?;
        let follower = follower.as_vehicle_mut().ok_or(Error::NotAVehicle(id))?;
        let leader = leader.as_vehicle().ok_or(Error::NotAVehicle(lead))?;
        let reached = follower.follow(leader, idm, dt);
        debug!(
            "{:?} following {:?}: acc = {:.3}, vel = {:.3}",
            id,
            lead,
            follower.acceleration(),
            follower.velocity()
        );
        Ok(reached)
    }

    /// Creates snapshot records of all the agents, in registry order.
    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.agents.values().map(|agent| agent.to_snapshot()).collect()
    }

    /// Adds agents reconstructed from snapshot records.
    /// Returns the IDs assigned to them, in order.
    ///
    /// Every record is validated before any agent is added, so a failure
    /// leaves the registry unchanged.
    pub fn load_snapshots(&mut self, snapshots: &[Snapshot]) -> Result<Vec<AgentId>> {
        let agents = snapshots
            .iter()
            .map(|snapshot| {
                Agent::from_snapshot(snapshot).map_err(|err| {
                    warn!("Rejected snapshot of type {:?}: {}", snapshot.kind, err);
                    err
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(agents.into_iter().map(|agent| self.insert(agent)).collect())
    }

    /// Serializes all the agents as a JSON array of snapshot records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.snapshots())?)
    }

    /// Creates a registry from a JSON array of snapshot records.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshots: Vec<Snapshot> = serde_json::from_str(json)?;
        let mut registry = Self::new();
        registry.load_snapshots(&snapshots)?;
        Ok(registry)
    }

    /// Writes all the agents to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer(writer, &self.snapshots())?;
        debug!("Saved {} agents to {}", self.len(), path.as_ref().display());
        Ok(())
    }

    /// Reads agents from a JSON file written by [AgentRegistry::save].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let snapshots: Vec<Snapshot> = serde_json::from_reader(reader)?;
        let mut registry = Self::new();
        registry.load_snapshots(&snapshots)?;
        debug!("Loaded {} agents from {}", registry.len(), path.as_ref().display());
        Ok(registry)
    }

    /// Gets the debugging information for the previous stepping operation as a JSON array.
    #[cfg(feature = "debug")]
    pub fn debug(&mut self) -> serde_json::Value {
        self.debug.clone()
    }

    /// Starts a new debug frame, discarding lines recorded outside the registry.
    fn begin_debug(&self) {
        #[cfg(feature = "debug")]
        clear_debug_frame();
    }

    /// Stores the lines recorded since [Self::begin_debug] as the debug frame.
    fn take_debug(&mut self) {
        #[cfg(feature = "debug")]
        {
            self.debug = take_debug_frame();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point2d;
    use assert_approx_eq::assert_approx_eq;

    fn attributes(x: f64) -> AgentAttributes {
        AgentAttributes {
            position: Point2d::new(x, 0.0),
            goal_position: Point2d::new(x + 10.0, 0.0),
            heading_angle: 0.0,
            length: 4.0,
            width: 2.0,
        }
    }

    fn vehicle(x: f64) -> VehicleAttributes {
        VehicleAttributes {
            agent: attributes(x),
            front_overhang: 1.0,
            rear_overhang: 1.0,
            steering_angle: 0.0,
        }
    }

    #[test]
    fn vehicle_only_commands() {
        let mut reg = AgentRegistry::new();
        let ped = reg.add_pedestrian(&attributes(0.0));
        let veh = reg.add_vehicle(&vehicle(0.0));
        assert!(matches!(reg.accelerate(ped, 1.0), Err(Error::NotAVehicle(id)) if id == ped));
        reg.accelerate(veh, 1.5).unwrap();
        reg.steer(veh, 3.0).unwrap();
        let veh = reg.get_vehicle(veh).unwrap();
        assert_eq!(veh.acceleration(), 1.5);
        assert_eq!(veh.omega(), 3.0);
    }

    #[test]
    fn removed_agent_is_gone() {
        let mut reg = AgentRegistry::new();
        let id = reg.add_agent(&attributes(0.0));
        assert_eq!(reg.len(), 1);
        reg.remove(id).unwrap();
        assert!(reg.is_empty());
        assert!(matches!(reg.get(id), Err(Error::NotFound(_))));
        assert!(matches!(reg.update(id, 0.1, Integrator::Euler), Err(Error::NotFound(_))));
    }

    #[test]
    fn follow_errors() {
        let mut reg = AgentRegistry::new();
        let a = reg.add_vehicle(&vehicle(0.0));
        let b = reg.add_agent(&attributes(20.0));
        assert!(matches!(reg.follow(a, a, &IdmParams::default(), 0.1), Err(Error::SameAgent(_))));
        assert!(matches!(
            reg.follow(a, b, &IdmParams::default(), 0.1),
            Err(Error::NotAVehicle(id)) if id == b
        ));
        let c = reg.add_vehicle(&vehicle(40.0));
        reg.remove(c).unwrap();
        assert!(matches!(
            reg.follow(a, c, &IdmParams::default(), 0.1),
            Err(Error::NotFound(id)) if id == c
        ));
    }

    #[test]
    fn follow_leaves_leader_untouched() {
        let mut reg = AgentRegistry::new();
        let lead = reg.add_vehicle(&vehicle(20.0));
        let id = reg.add_mmv(&vehicle(0.0));
        let before = reg.get(lead).unwrap().clone();
        reg.follow(id, lead, &IdmParams::default(), 1.0).unwrap();
        assert_eq!(reg.get(lead).unwrap(), &before);
        assert!(reg.get_vehicle(id).unwrap().velocity() > 0.0);
    }

    #[test]
    fn seek_goal_reaches_goal() {
        let mut reg = AgentRegistry::new();
        let id = reg.add_pedestrian(&attributes(0.0));
        let mut reached = false;
        for _ in 0..100 {
            reached = reg.seek_goal(id, 1.0).unwrap();
            if reached {
                break;
            }
        }
        assert!(reached);
        assert_approx_eq!(reg.get(id).unwrap().position().x, 10.0, 0.1);
    }

    #[cfg(feature = "debug")]
    fn debug_lines(reg: &mut AgentRegistry) -> usize {
        reg.debug().as_array().map_or(0, |frame| frame.len())
    }

    #[cfg(feature = "debug")]
    #[test]
    fn platoon_debug_frame_has_every_gap() {
        let mut reg = AgentRegistry::new();
        let platoon = [60.0, 40.0, 20.0, 0.0].map(|x| reg.add_vehicle(&vehicle(x)));
        reg.follow_platoon(&platoon, &IdmParams::default(), 0.1).unwrap();
        assert_eq!(debug_lines(&mut reg), 3);
        reg.follow_platoon(&platoon, &IdmParams::default(), 0.1).unwrap();
        assert_eq!(debug_lines(&mut reg), 3);
    }

    #[cfg(feature = "debug")]
    #[test]
    fn debug_frame_ignores_lines_from_outside() {
        let mut reg = AgentRegistry::new();
        let lead = reg.add_vehicle(&vehicle(20.0));
        let id = reg.add_vehicle(&vehicle(0.0));
        let follower = reg.get_vehicle(id).unwrap().clone();
        let leader = reg.get_vehicle(lead).unwrap().clone();
        for _ in 0..1000 {
            follower.gap(&leader);
        }
        reg.follow(id, lead, &IdmParams::default(), 0.1).unwrap();
        assert_eq!(debug_lines(&mut reg), 1);

        for _ in 0..10 {
            follower.gap(&leader);
        }
        reg.update(id, 0.1, Integrator::Euler).unwrap();
        assert_eq!(debug_lines(&mut reg), 0);
        reg.seek_goal(id, 0.1).unwrap();
        assert_eq!(debug_lines(&mut reg), 0);
    }

    #[test]
    fn update_all_reports_reached() {
        let mut reg = AgentRegistry::new();
        let fast = reg.add_agent(&attributes(0.0));
        let slow = reg.add_agent(&attributes(0.0));
        reg.get_mut(fast).unwrap().set_velocity(10.0);
        reg.get_mut(slow).unwrap().set_velocity(1.0);
        assert_eq!(reg.update_all(1.0, Integrator::Euler), vec![fast]);
    }
}
