//! Configuration types for loading sandbox scenarios from YAML.
//!
//! A thin, `serde`-deserializable layer mapped into runtime types by
//! [`crate::simulation::engine::Sandbox::from_config`]. A scenario is:
//!
//! - [`ParametersConfig`] – every recognized engine option, all optional
//! - an optional preset name
//! - [`BodyConfig`] – explicitly placed bodies
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   G: 1.0                    # gravitational constant
//!   base_dt: 0.05             # unscaled step size
//!   time_scale: 1.0           # dt multiplier
//!   softening: 0.1            # softening length (stored squared)
//!   theta: 0.7                # Barnes-Hut opening angle
//!   direct_sum_threshold: 500 # populations above this use the octree
//!   max_bodies: 2000
//!   roche_factor: 2.44
//!   min_breakup_mass: 5.0
//!   seed: 42
//!
//! preset: binary_star         # optional, spawned before `bodies`
//!
//! bodies:
//!   - kind: planet
//!     m: 12.0
//!     x: [ 40.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, -6.3 ]
//! ```

use serde::Deserialize;

use crate::simulation::bodies::BodyKind;
use crate::simulation::params::Parameters;
use crate::simulation::presets::Preset;

/// Recognized engine options; anything omitted falls back to the engine
/// default.
#[derive(Deserialize, Debug, Default, Clone)]
#[allow(non_snake_case)]
pub struct ParametersConfig {
    pub G: Option<f64>,
    pub base_dt: Option<f64>,
    pub time_scale: Option<f64>,
    pub softening: Option<f64>, // softening length, squared internally
    pub theta: Option<f64>,
    pub direct_sum_threshold: Option<usize>,
    pub max_bodies: Option<usize>,
    pub roche_factor: Option<f64>,
    pub min_breakup_mass: Option<f64>,
    pub seed: Option<u64>,
}

impl ParametersConfig {
    pub fn to_parameters(&self) -> Parameters {
        let mut p = Parameters::default();
        if let Some(g) = self.G {
            p.G = g;
        }
        if let Some(dt) = self.base_dt {
            p.base_dt = dt;
        }
        if let Some(ts) = self.time_scale {
            p.time_scale = ts;
        }
        if let Some(s) = self.softening {
            p.set_softening(s);
        }
        if let Some(theta) = self.theta {
            p.theta = theta;
        }
        if let Some(n) = self.direct_sum_threshold {
            p.direct_sum_threshold = n;
        }
        if let Some(cap) = self.max_bodies {
            p.max_bodies = cap;
        }
        if let Some(rf) = self.roche_factor {
            p.roche_factor = rf;
        }
        if let Some(mb) = self.min_breakup_mass {
            p.min_breakup_mass = mb;
        }
        if let Some(seed) = self.seed {
            p.seed = seed;
        }
        p
    }
}

/// Initial state for one explicitly placed body.
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub kind: BodyKind,
    pub m: f64,       // mass, must be positive
    pub x: [f64; 3],  // initial position
    pub v: [f64; 3],  // initial velocity
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub bodies: Vec<BodyConfig>,
}
