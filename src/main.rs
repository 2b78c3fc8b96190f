use agent_kinematics::cgmath::Point2;
use agent_kinematics::{AgentAttributes, AgentRegistry, IdmParams, VehicleAttributes};
use log::{info, warn};
use rand_distr::{Distribution, Normal};

/// The number of vehicles in the platoon.
const NUM_VEHICLES: usize = 8;

/// The mean spacing between the centres of consecutive vehicles in m.
const MEAN_SPACING: f64 = 25.0; // m

/// The time step in s.
const DT: f64 = 0.1; // s

/// The number of frames to simulate.
const NUM_FRAMES: usize = 600;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = rand::thread_rng();
    let spacing = Normal::new(MEAN_SPACING, 4.0).expect("Invalid standard deviation");

    let mut registry = AgentRegistry::new();
    let mut x = 0.0;
    let mut platoon = vec![];
    for _ in 0..NUM_VEHICLES {
        let id = registry.add_vehicle(&VehicleAttributes {
            agent: AgentAttributes {
                position: Point2::new(x, 0.0),
                goal_position: Point2::new(5000.0, 0.0),
                heading_angle: 0.0,
                length: 2.7,
                width: 1.8,
            },
            front_overhang: 0.9,
            rear_overhang: 1.0,
            steering_angle: 0.0,
        });
        platoon.push(id);
        x -= spacing.sample(&mut rng).max(8.0);
    }

    // The leader cruises at a constant speed
    let leader = platoon[0];
    if let Ok(agent) = registry.get_mut(leader) {
        agent.set_velocity(15.0);
    }

    let idm = IdmParams::default();
    info!("Simulating a platoon of {} vehicles...", NUM_VEHICLES);
    for frame in 0..NUM_FRAMES {
        if let Err(err) = registry.update(leader, DT, Default::default()) {
            warn!("Leader update failed: {}", err);
            return;
        }
        if let Err(err) = registry.follow_platoon(&platoon, &idm, DT) {
            warn!("Platoon update failed: {}", err);
            return;
        }
        if frame % 100 == 0 {
            for id in &platoon {
                if let Ok(veh) = registry.get_vehicle(*id) {
                    info!(
                        "frame {:>4} {:?}: x = {:>8.2} m, v = {:>5.2} m/s, a = {:>5.2} m/s^2",
                        frame,
                        id,
                        veh.position().x,
                        veh.velocity(),
                        veh.acceleration()
                    );
                }
            }
        }
    }

    match registry.to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => warn!("Failed to serialize agents: {}", err),
    }
}
