/// The parameters of the intelligent driver model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdmParams {
    /// The desired velocity in m/s.
    pub desired_velocity: f64,
    /// The maximum acceleration in m/s<sup>2</sup>. Must be positive.
    pub max_acceleration: f64,
    /// The comfortable deceleration in m/s<sup>2</sup>, a positive number.
    pub comf_deceleration: f64,
    /// The acceleration exponent.
    pub acc_exponent: f64,
    /// The desired time headway to the vehicle ahead in s.
    pub time_headway: f64,
    /// The minimum gap to maintain to the vehicle ahead in m.
    pub min_gap: f64,
}

impl Default for IdmParams {
    fn default() -> Self {
        Self {
            desired_velocity: 30.0,
            max_acceleration: 1.0,
            comf_deceleration: 1.5,
            acc_exponent: 4.0,
            time_headway: 1.5,
            min_gap: 2.0,
        }
    }
}

impl IdmParams {
    /// Calculates the desired gap to the vehicle ahead.
    ///
    /// # Arguments
    /// * `my_vel` - The velocity of the simulated vehicle (m/s).
    /// * `their_vel` - The vehicle ahead's velocity (m/s).
    pub fn desired_gap(&self, my_vel: f64, their_vel: f64) -> f64 {
        let appr = my_vel - their_vel;
        let factor = 1. / (2. * (self.max_acceleration * self.comf_deceleration).sqrt());
        let dyn_gap = my_vel * self.time_headway + my_vel * appr * factor;
        self.min_gap + f64::max(0.0, dyn_gap)
    }

    /// Computes an acceleration using the intelligent driver model.
    ///
    /// `net_dist` must be non-zero; it is not guarded.
    ///
    /// # Arguments
    /// * `net_dist` - The distance between this vehicle and the vehicle ahead in metres.
    /// * `my_vel` - The velocity of the simulated vehicle (m/s).
    /// * `their_vel` - The vehicle ahead's velocity (m/s).
    pub fn acceleration(&self, net_dist: f64, my_vel: f64, their_vel: f64) -> f64 {
        let free = (my_vel / self.desired_velocity).powf(self.acc_exponent);
        let term = self.desired_gap(my_vel, their_vel) / net_dist;
        self.max_acceleration * (1. - free - term * term)
    }
}
