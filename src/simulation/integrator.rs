//! Fixed-step velocity–Verlet integration
//!
//! One `verlet_step` advances the whole store by `dt` using two force
//! evaluations: kick with the current accelerations, drift positions, then
//! kick again with freshly computed accelerations. Symplectic and
//! time-reversible, so energy drift stays bounded over the thousands of
//! ticks an interactive session runs for.

use crate::simulation::bodies::{BodyStore, NVec3};
use crate::simulation::forces::AccelSet;

/// Advance all live bodies by one step of velocity–Verlet.
///
/// Updates positions, velocities, per-body accelerations and ages in-place
/// and advances the store clock by `dt`. Dead slots are untouched.
pub fn verlet_step(store: &mut BodyStore, forces: &AccelSet, dt: f64) {
    let n = store.bodies.len();
    if n == 0 {
        return;
    }
    let half_dt = 0.5 * dt;

    // a_n from x_n at time t_n
    let mut accels = vec![NVec3::zeros(); n];
    forces.accumulate_accels(store.t, store, &mut accels);

    // Kick: v_n+1/2 = v_n + (dt/2) a_n
    // Drift: x_n+1 = x_n + dt v_n+1/2
    for (b, a) in store.bodies.iter_mut().zip(accels.iter()) {
        if !b.alive {
            continue;
        }
        b.v += half_dt * *a;
        b.x += dt * b.v;
    }

    store.t += dt;

    // a_n+1 from x_n+1 at time t_n+1
    forces.accumulate_accels(store.t, store, &mut accels);

    // Second kick: v_n+1 = v_n+1/2 + (dt/2) a_n+1
    for (b, a) in store.bodies.iter_mut().zip(accels.iter()) {
        if !b.alive {
            continue;
        }
        b.v += half_dt * *a;
        b.a = *a;
        b.age += dt;
    }
}
