//! Integration schemes used to advance an agent by one time step.

/// The integration scheme to use for a single update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Integrator {
    /// Explicit Euler: position advances using the velocity at the start of the step.
    #[default]
    Euler,
    /// Fourth-order Runge-Kutta with piecewise-constant acceleration.
    Rk4,
}

/// The scalar increments produced by one RK4 step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Rk4Step {
    /// The distance travelled over the step in m.
    pub displacement: f64,
    /// The change in velocity over the step in m/s.
    pub delta_vel: f64,
}

/// Performs one RK4 step of the system `x' = v, v' = a` with `a` held constant.
///
/// # Parameters
/// * `vel` - The velocity at the start of the step (m/s)
/// * `acc` - The acceleration over the step (m/s^2)
/// * `dt` - The time step in seconds
pub(crate) fn rk4_step(vel: f64, acc: f64, dt: f64) -> Rk4Step {
    let (k1_v, k1_a) = (vel, acc);
    let (k2_v, k2_a) = (vel + 0.5 * k1_a * dt, acc);
    let (k3_v, k3_a) = (vel + 0.5 * k2_a * dt, acc);
    let (k4_v, k4_a) = (vel + k3_a * dt, acc);
    Rk4Step {
        displacement: (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) / 6.0 * dt,
        delta_vel: (k1_a + 2.0 * k2_a + 2.0 * k3_a + k4_a) / 6.0 * dt,
    }
}
