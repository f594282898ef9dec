//! Body registry for the sandbox.
//!
//! `BodyStore` owns the authoritative list of simulated bodies, keyed by a
//! stable `BodyId`. Removal is a soft delete: a dead body keeps its slot for
//! the remainder of the current tick (so pairwise loops never see indices
//! move mid-pass) and is compacted out once all resolvers have run.

use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

pub type NVec3 = Vector3<f64>;

/// Radius clamp bounds shared by every kind's scaling law.
pub const MIN_RADIUS: f64 = 0.15;
pub const MAX_RADIUS: f64 = 12.0;

/// Stable, monotonically assigned body identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u64);

/// Category of a body. Selects the base-mass/base-radius scaling law and a
/// display color; the physics does not otherwise interpret it, except that
/// black holes are never tidally disrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Star,
    Planet,
    BlackHole,
    Asteroid,
    Debris,
}

impl BodyKind {
    /// Reference mass at which a body of this kind has its base radius.
    pub fn base_mass(self) -> f64 {
        match self {
            BodyKind::Star => 800.0,
            BodyKind::Planet => 10.0,
            BodyKind::BlackHole => 4000.0,
            BodyKind::Asteroid => 0.5,
            BodyKind::Debris => 0.1,
        }
    }

    pub fn base_radius(self) -> f64 {
        match self {
            BodyKind::Star => 4.0,
            BodyKind::Planet => 1.0,
            BodyKind::BlackHole => 2.0,
            BodyKind::Asteroid => 0.3,
            BodyKind::Debris => 0.18,
        }
    }

    /// Default display color, carried only for event payloads.
    pub fn color(self) -> [f32; 3] {
        match self {
            BodyKind::Star => [1.0, 0.85, 0.4],
            BodyKind::Planet => [0.35, 0.55, 0.95],
            BodyKind::BlackHole => [0.15, 0.1, 0.25],
            BodyKind::Asteroid => [0.6, 0.55, 0.5],
            BodyKind::Debris => [0.75, 0.45, 0.3],
        }
    }

    /// Radius from mass: constant-density cube-root growth around the kind's
    /// base point, clamped to the global bounds.
    pub fn radius_for_mass(self, m: f64) -> f64 {
        let r = self.base_radius() * (m / self.base_mass()).cbrt();
        r.clamp(MIN_RADIUS, MAX_RADIUS)
    }
}

/// A simulated point mass.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub m: f64,          // mass, always > 0
    pub x: NVec3,        // position
    pub v: NVec3,        // velocity
    pub a: NVec3,        // acceleration, recomputed every tick
    pub radius: f64,     // derived from kind + mass
    pub alive: bool,     // soft-delete flag
    pub age: f64,        // accumulated simulated time
    pub color: [f32; 3], // kind default, mass-blended on merge
}

impl Body {
    /// Recompute the derived radius after a mass change.
    pub fn update_radius(&mut self) {
        self.radius = self.kind.radius_for_mass(self.m);
    }

    pub fn momentum(&self) -> NVec3 {
        self.v * self.m
    }
}

/// Why a spawn was rejected. Both variants are expected, recoverable
/// conditions; the store is left untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpawnError {
    #[error("body population is at the configured cap of {0}")]
    Capacity(usize),
    #[error("position or velocity component is not finite")]
    NonFiniteInput,
    #[error("mass must be positive")]
    NonPositiveMass,
}

/// Authoritative collection of bodies plus the simulation clock.
#[derive(Debug, Clone)]
pub struct BodyStore {
    pub bodies: Vec<Body>,
    pub t: f64, // simulation time
    next_id: u64,
    max_bodies: usize,
}

impl BodyStore {
    pub fn new(max_bodies: usize) -> Self {
        Self {
            bodies: Vec::new(),
            t: 0.0,
            next_id: 0,
            max_bodies,
        }
    }

    pub fn max_bodies(&self) -> usize {
        self.max_bodies
    }

    pub fn set_max_bodies(&mut self, cap: usize) {
        self.max_bodies = cap;
    }

    /// Add a body. Mass must be positive and all state finite; the live
    /// population must be below the cap. On error nothing is mutated.
    pub fn spawn(
        &mut self,
        kind: BodyKind,
        m: f64,
        x: NVec3,
        v: NVec3,
    ) -> Result<BodyId, SpawnError> {
        if !(m.is_finite() && m > 0.0) {
            if m.is_finite() {
                return Err(SpawnError::NonPositiveMass);
            }
            return Err(SpawnError::NonFiniteInput);
        }
        if !(x.iter().all(|c| c.is_finite()) && v.iter().all(|c| c.is_finite())) {
            return Err(SpawnError::NonFiniteInput);
        }
        if self.count() >= self.max_bodies {
            return Err(SpawnError::Capacity(self.max_bodies));
        }

        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.push(Body {
            id,
            kind,
            m,
            x,
            v,
            a: NVec3::zeros(),
            radius: kind.radius_for_mass(m),
            alive: true,
            age: 0.0,
            color: kind.color(),
        });
        Ok(id)
    }

    /// Mark a body dead. Idempotent; unknown ids are a no-op.
    pub fn kill(&mut self, id: BodyId) {
        if let Some(b) = self.bodies.iter_mut().find(|b| b.id == id) {
            b.alive = false;
        }
    }

    /// Empty the store. Ids keep advancing so handles are never reused.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id && b.alive)
    }

    /// Number of live bodies.
    pub fn count(&self) -> usize {
        self.bodies.iter().filter(|b| b.alive).count()
    }

    /// Raw slot count, including dead bodies awaiting compaction.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn alive_bodies(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter().filter(|b| b.alive)
    }

    /// Drop dead slots via swap-remove. Called once per tick, after all
    /// resolvers; indices are unstable across this call and stable between
    /// calls.
    pub fn compact(&mut self) {
        let mut i = 0;
        while i < self.bodies.len() {
            if self.bodies[i].alive {
                i += 1;
            } else {
                self.bodies.swap_remove(i);
            }
        }
    }
}
