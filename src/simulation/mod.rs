pub mod bodies;
pub mod params;
pub mod engine;
pub mod forces;
pub mod octree;
pub mod integrator;
pub mod collisions;
pub mod breakup;
pub mod events;
pub mod trails;
pub mod prediction;
pub mod presets;
