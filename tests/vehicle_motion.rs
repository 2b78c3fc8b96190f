//! Tests of the bicycle model, integrators and car following.

use agent_kinematics::math::{distance, Point2d};
use agent_kinematics::{AgentAttributes, IdmParams, Vehicle, VehicleAttributes};
use assert_approx_eq::assert_approx_eq;

fn vehicle(x: f64, y: f64, heading: f64) -> Vehicle {
    Vehicle::new(&VehicleAttributes {
        agent: AgentAttributes {
            position: Point2d::new(x, y),
            goal_position: Point2d::new(1000.0, 0.0),
            heading_angle: heading,
            length: 4.0,
            width: 2.0,
        },
        front_overhang: 1.0,
        rear_overhang: 1.0,
        steering_angle: 0.0,
    })
}

/// Test that the origin and centre convert back and forth exactly.
#[test]
fn origin_center_round_trip() {
    for heading in [0.0, 17.0, 90.0, 200.0, 359.9] {
        let veh = vehicle(3.5, -7.25, heading);
        let origin = veh.origin_from_center();
        assert_approx_eq!(distance(origin, veh.origin()), 0.0, 1e-9);
        let center = veh.center_from_origin();
        assert_approx_eq!(distance(center, veh.position()), 0.0, 1e-9);
    }
}

/// Test that a hard steering command saturates and stays saturated.
#[test]
fn steering_saturates() {
    let mut veh = vehicle(0.0, 0.0, 0.0);
    veh.steer(50.0);
    for _ in 0..10 {
        veh.update(1.0);
        assert!(veh.steering_angle() <= 90.0);
    }
    assert_eq!(veh.steering_angle(), 90.0);
}

/// Test that the heading stays within [0, 360) while turning either way.
#[test]
fn heading_stays_normalised() {
    for omega in [0.5, -0.5] {
        let mut veh = vehicle(0.0, 0.0, 0.0);
        veh.set_velocity(12.0);
        veh.steer(omega);
        for _ in 0..500 {
            veh.update(0.1);
            let heading = veh.heading_angle();
            assert!((0.0..360.0).contains(&heading), "heading {}", heading);
        }
    }
}

/// Test that a stationary vehicle does not move, whatever the time step.
#[test]
fn stationary_vehicle_stays_put() {
    let mut veh = vehicle(5.0, 5.0, 45.0);
    let before = veh.position();
    for dt in [0.0, 0.5, 10.0] {
        veh.update(dt);
        veh.update_rk4(dt);
    }
    assert_eq!(distance(before, veh.position()), 0.0);
}

/// Euler and RK4 agree on velocity, but RK4 adds the same displacement to x and y.
#[test]
fn rk4_and_euler_diverge_in_position() {
    let mut euler = vehicle(0.0, 0.0, 90.0);
    let mut rk4 = euler.clone();
    euler.set_velocity(2.0);
    rk4.set_velocity(2.0);
    euler.accelerate(1.0);
    rk4.accelerate(1.0);
    for _ in 0..5 {
        euler.update(0.2);
        rk4.update_rk4(0.2);
    }
    assert_approx_eq!(euler.velocity(), rk4.velocity());
    assert_approx_eq!(euler.velocity(), 3.0);
    // Euler moves along the heading only
    assert_approx_eq!(euler.position().x, 0.0);
    assert!(euler.position().y > 0.0);
    // RK4 moves both axes by the same amount
    assert_approx_eq!(rk4.position().x, rk4.position().y);
    assert!(distance(euler.position(), rk4.position()) > 1.0);
}

/// Two vehicles at the same speed and exactly the desired gap neither speed up nor slow down.
#[test]
fn idm_equilibrium() {
    let idm = IdmParams {
        desired_velocity: 1000.0,
        ..Default::default()
    };
    let mut follower = vehicle(0.0, 0.0, 0.0);
    follower.set_velocity(10.0);
    // desired gap = 2 + 10 * 1.5 = 17; front at 5, so the leader's rear is at 22
    let mut leader = vehicle(23.0, 0.0, 0.0);
    leader.set_velocity(10.0);
    assert_approx_eq!(follower.gap(&leader), idm.desired_gap(10.0, 10.0));

    follower.follow(&leader, &idm, 0.1);
    assert_approx_eq!(follower.acceleration(), 0.0);
    assert_approx_eq!(follower.velocity(), 10.0);
}

/// The gap is unchanged when the whole scene is mirrored.
#[test]
fn gap_is_reflection_symmetric() {
    let follower = vehicle(0.0, 1.0, 10.0);
    let leader = vehicle(30.0, 4.0, 5.0);
    let follower_mirror = vehicle(0.0, 1.0, 170.0);
    let leader_mirror = vehicle(-30.0, 4.0, 175.0);
    assert_approx_eq!(follower.gap(&leader), follower_mirror.gap(&leader_mirror));
}

/// The gap is unchanged when the overhang roles and the vehicle order are swapped.
#[test]
fn gap_is_symmetric_under_role_swap() {
    let with_overhangs = |x: f64, heading: f64, front: f64, rear: f64| {
        Vehicle::new(&VehicleAttributes {
            agent: AgentAttributes {
                position: Point2d::new(x, 0.0),
                goal_position: Point2d::new(0.0, 0.0),
                heading_angle: heading,
                length: 4.0,
                width: 2.0,
            },
            front_overhang: front,
            rear_overhang: rear,
            steering_angle: 0.0,
        })
    };
    // Heading east: a's front to b's rear
    let a = with_overhangs(0.0, 0.0, 1.5, 0.5);
    let b = with_overhangs(30.0, 0.0, 0.7, 1.2);
    // Heading west, order swapped and overhangs swapped
    let b_rev = with_overhangs(30.0, 180.0, 1.5, 0.5);
    let a_rev = with_overhangs(0.0, 180.0, 0.7, 1.2);
    assert_approx_eq!(a.gap(&b), b_rev.gap(&a_rev));
}

/// A vehicle well behind a stopped vehicle accelerates towards its desired speed.
#[test]
fn follower_accelerates_on_open_road() {
    let mut follower = vehicle(0.0, 0.0, 0.0);
    let leader = vehicle(20.0, 0.0, 0.0);
    let idm = IdmParams {
        desired_velocity: 30.0,
        max_acceleration: 1.0,
        comf_deceleration: 1.5,
        acc_exponent: 4.0,
        time_headway: 1.5,
        min_gap: 2.0,
    };
    let vel = follower.velocity();
    follower.follow(&leader, &idm, 1.0);
    assert!(follower.acceleration() >= 0.0);
    assert_approx_eq!(follower.acceleration(), 1.0 - (2.0f64 / 14.0).powi(2));
    assert!(follower.velocity() > vel);
}

/// A follower approaching a stopped vehicle brakes before reaching it.
#[test]
fn follower_stops_behind_leader() {
    let mut follower = vehicle(0.0, 0.0, 0.0);
    follower.set_velocity(10.0);
    let leader = vehicle(80.0, 0.0, 0.0);
    let idm = IdmParams::default();
    for _ in 0..600 {
        follower.follow(&leader, &idm, 0.05);
        assert!(follower.gap(&leader) > 0.0);
        assert!(follower.front_coords().x < leader.rear_coords().x);
    }
    assert!(follower.velocity().abs() < 0.5);
}
