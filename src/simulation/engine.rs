//! The sandbox engine: phase-ordered ticking over a body store.
//!
//! `Sandbox` is the runtime bundle external drivers talk to. One `step()`
//! call runs a full tick in a strict single-threaded order:
//!
//! force compute → integrate → collide → break up → record trails → compact
//!
//! The octree built for the force pass never survives the pass, dead bodies
//! keep their slots until the final compaction, and all randomness flows
//! through one seeded rng, so a fixed seed and initial state replay the
//! same trajectory.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::bodies::{Body, BodyId, BodyKind, BodyStore, NVec3, SpawnError};
use crate::simulation::breakup::resolve_breakups;
use crate::simulation::collisions::resolve_collisions;
use crate::simulation::events::{CollisionEvent, DisruptionEvent};
use crate::simulation::forces::{AccelSet, NewtonianGravity};
use crate::simulation::integrator::verlet_step;
use crate::simulation::params::Parameters;
use crate::simulation::prediction::{predict_orbit, PredictError};
use crate::simulation::presets::Preset;
use crate::simulation::trails::TrailSet;

pub struct Sandbox {
    store: BodyStore,
    params: Parameters,
    rng: StdRng,
    trails: TrailSet,
    collisions: Vec<CollisionEvent>,
    disruptions: Vec<DisruptionEvent>,
}

impl Sandbox {
    pub fn new(params: Parameters) -> Self {
        Self {
            store: BodyStore::new(params.max_bodies),
            rng: StdRng::seed_from_u64(params.seed),
            params,
            trails: TrailSet::new(),
            collisions: Vec::new(),
            disruptions: Vec::new(),
        }
    }

    /// Build a sandbox from a deserialized scenario: parameters first, then
    /// the optional preset, then any explicitly listed bodies.
    pub fn from_config(cfg: &ScenarioConfig) -> Result<Self, SpawnError> {
        let mut sandbox = Self::new(cfg.parameters.to_parameters());
        if let Some(preset) = cfg.preset {
            sandbox.apply_preset(preset);
        }
        for bc in &cfg.bodies {
            sandbox.spawn(
                bc.kind,
                bc.m,
                NVec3::new(bc.x[0], bc.x[1], bc.x[2]),
                NVec3::new(bc.v[0], bc.v[1], bc.v[2]),
            )?;
        }
        Ok(sandbox)
    }

    // population ===========================================================

    pub fn spawn(
        &mut self,
        kind: BodyKind,
        m: f64,
        x: NVec3,
        v: NVec3,
    ) -> Result<BodyId, SpawnError> {
        self.store.set_max_bodies(self.params.max_bodies);
        self.store.spawn(kind, m, x, v)
    }

    /// Soft-remove a body; it stops interacting next tick and its slot is
    /// reclaimed at that tick's compaction. Idempotent.
    pub fn kill(&mut self, id: BodyId) {
        self.store.kill(id);
    }

    /// Remove everything: bodies, trails, pending events. The clock and id
    /// counter keep running.
    pub fn clear(&mut self) {
        self.store.clear();
        self.trails.clear();
        self.collisions.clear();
        self.disruptions.clear();
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.store.set_max_bodies(self.params.max_bodies);
        preset.populate(&mut self.store, &self.params, &mut self.rng);
    }

    // stepping =============================================================

    /// Advance one tick of `base_dt × time_scale`.
    pub fn step(&mut self) {
        let dt = self.params.dt();
        self.step_dt(dt);
    }

    /// Advance one tick of an explicit `dt`.
    pub fn step_dt(&mut self, dt: f64) {
        self.collisions.clear();
        self.disruptions.clear();
        self.store.set_max_bodies(self.params.max_bodies);

        let forces = AccelSet::new().with(NewtonianGravity {
            G: self.params.G,
            eps2: self.params.eps2,
            theta: self.params.theta,
            direct_sum_threshold: self.params.direct_sum_threshold,
        });

        verlet_step(&mut self.store, &forces, dt);
        resolve_collisions(&mut self.store, &mut self.collisions);
        resolve_breakups(
            &mut self.store,
            &self.params,
            &mut self.rng,
            &mut self.disruptions,
        );
        self.trails.record(&self.store);
        self.store.compact();
    }

    // observation ==========================================================

    /// Read-only view of all live bodies, for drawing.
    pub fn bodies(&self) -> impl Iterator<Item = &Body> {
        self.store.alive_bodies()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.store.get(id)
    }

    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// Simulation clock.
    pub fn time(&self) -> f64 {
        self.store.t
    }

    /// Mergers from the most recent tick.
    pub fn collisions(&self) -> &[CollisionEvent] {
        &self.collisions
    }

    /// Tidal breakups from the most recent tick.
    pub fn disruptions(&self) -> &[DisruptionEvent] {
        &self.disruptions
    }

    pub fn trail(&self, id: BodyId) -> Option<&std::collections::VecDeque<NVec3>> {
        self.trails.trail(id)
    }

    /// Forward-simulate one body against frozen attractors. Never mutates
    /// simulation state.
    pub fn predict_orbit(&self, id: BodyId, steps: usize) -> Result<Vec<NVec3>, PredictError> {
        predict_orbit(&self.store, id, steps, &self.params)
    }

    // configuration ========================================================

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Parameters {
        &mut self.params
    }

    /// Re-seed the fragment-placement rng mid-run.
    pub fn reseed(&mut self, seed: u64) {
        self.params.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Borrow the raw store, mainly for diagnostics like
    /// [`crate::simulation::forces::total_energy`].
    pub fn store(&self) -> &BodyStore {
        &self.store
    }
}
