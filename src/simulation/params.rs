//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds every externally settable knob:
//! - gravitational constant and softening (`G`, `eps2`),
//! - step size (`base_dt` scaled by `time_scale`),
//! - Barnes–Hut opening angle and the direct-sum population threshold,
//! - body cap, Roche factor and breakup threshold, random seed

#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct Parameters {
    pub G: f64,                      // gravitational constant
    pub base_dt: f64,                // unscaled step size
    pub time_scale: f64,             // multiplies base_dt each tick
    pub eps2: f64,                   // softening length, squared
    pub theta: f64,                  // Barnes-Hut opening angle
    pub direct_sum_threshold: usize, // populations at or below this use direct N^2 summation
    pub max_bodies: usize,           // body cap
    pub roche_factor: f64,           // multiplier on the Roche distance
    pub min_breakup_mass: f64,       // bodies lighter than this never fragment
    pub seed: u64,                   // deterministic seed for fragment placement
}

impl Parameters {
    /// Effective step size for one tick.
    pub fn dt(&self) -> f64 {
        self.base_dt * self.time_scale
    }

    /// Store the softening as a length; used squared everywhere.
    pub fn set_softening(&mut self, softening: f64) {
        self.eps2 = softening * softening;
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            G: 1.0,
            base_dt: 0.05,
            time_scale: 1.0,
            eps2: 1e-2,
            theta: 0.7,
            direct_sum_threshold: 500,
            max_bodies: 2000,
            roche_factor: 2.44,
            min_breakup_mass: 5.0,
            seed: 42,
        }
    }
}
