//! Force / acceleration contributors for the sandbox engine
//!
//! Defines the [`Acceleration`] trait and the summing [`AccelSet`], plus the
//! one gravity term the sandbox uses: [`NewtonianGravity`], which picks
//! direct pairwise summation for small populations and a Barnes–Hut octree
//! for large ones.

use crate::simulation::bodies::{BodyStore, NVec3};
use crate::simulation::octree::Octree;

/// Collection of acceleration terms. Each term implements [`Acceleration`]
/// and their contributions are summed into a single acceleration vector per
/// body slot.
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all body slots in `store`
    /// - `out[i]` is set to the sum of contributions from all terms
    /// - dead slots receive zero
    pub fn accumulate_accels(&self, t: f64, store: &BodyStore, out: &mut [NVec3]) {
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(t, store, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources operating on a [`BodyStore`].
/// Implementations add their contribution into `out[i]` for each live body.
pub trait Acceleration {
    fn acceleration(&self, t: f64, store: &BodyStore, out: &mut [NVec3]);
}

/// Newtonian gravity with softening.
///
/// Populations at or below `direct_sum_threshold` use the exact unordered
/// pairwise sum; larger populations build a Barnes–Hut octree per call and
/// query it body by body. Dead bodies neither exert nor feel anything.
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64,
    pub eps2: f64,  // softening, squared
    pub theta: f64, // opening angle for the tree path
    pub direct_sum_threshold: usize,
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, _t: f64, store: &BodyStore, out: &mut [NVec3]) {
        let live = store.count();
        if live == 0 {
            return;
        }

        if live <= self.direct_sum_threshold {
            self.direct(store, out);
        } else {
            self.tree(store, out);
        }
    }
}

impl NewtonianGravity {
    /// Exact O(n²) summation over unordered live pairs, applying each
    /// interaction to both bodies at once (Newton's third law).
    fn direct(&self, store: &BodyStore, out: &mut [NVec3]) {
        let n = store.bodies.len();
        for i in 0..n {
            let bi = &store.bodies[i];
            if !bi.alive {
                continue;
            }
            let xi = bi.x;
            let mi = bi.m;

            for j in (i + 1)..n {
                let bj = &store.bodies[j];
                if !bj.alive {
                    continue;
                }

                // Displacement from i to j: i is pulled along +r, j along -r.
                let r = bj.x - xi;
                let d2 = r.dot(&r) + self.eps2;
                let inv_r = d2.sqrt().recip();
                let inv_r3 = inv_r * inv_r * inv_r;
                let coef = self.G * inv_r3;

                out[i] += coef * bj.m * r;
                out[j] -= coef * mi * r;
            }
        }
    }

    /// Approximate O(n log n) evaluation through a per-call octree.
    fn tree(&self, store: &BodyStore, out: &mut [NVec3]) {
        let tree = Octree::build(store);
        for (i, b) in store.bodies.iter().enumerate() {
            if b.alive {
                out[i] += tree.acceleration_on(i, store, self.G, self.eps2, self.theta);
            }
        }
    }
}

/// Total mechanical energy of the live population: kinetic plus softened
/// pairwise potential. Diagnostic only; never feeds back into the dynamics.
#[allow(non_snake_case)]
pub fn total_energy(store: &BodyStore, G: f64, eps2: f64) -> f64 {
    let bodies: Vec<_> = store.alive_bodies().collect();
    let mut e = 0.0;

    for b in &bodies {
        e += 0.5 * b.m * b.v.dot(&b.v);
    }
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let r = bodies[j].x - bodies[i].x;
            let d = (r.dot(&r) + eps2).sqrt();
            e -= G * bodies[i].m * bodies[j].m / d;
        }
    }
    e
}
