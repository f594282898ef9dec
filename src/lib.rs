pub mod benchmark;
pub mod configuration;
pub mod simulation;

pub use simulation::bodies::{Body, BodyId, BodyKind, BodyStore, NVec3, SpawnError};
pub use simulation::engine::Sandbox;
pub use simulation::events::{CollisionEvent, DisruptionEvent};
pub use simulation::forces::{AccelSet, Acceleration, NewtonianGravity};
pub use simulation::integrator::verlet_step;
pub use simulation::octree::Octree;
pub use simulation::params::Parameters;
pub use simulation::prediction::{PredictError, DEFAULT_HORIZON};
pub use simulation::presets::Preset;

pub use configuration::config::{BodyConfig, ParametersConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_gravity, bench_step};
