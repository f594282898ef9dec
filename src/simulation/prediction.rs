//! Orbit prediction for a single body.
//!
//! Forward-simulates one chosen body against a frozen snapshot of every
//! other live body, producing a polyline for visualization. The snapshot
//! attractors are never advanced and the real store is only borrowed
//! immutably, so prediction can never perturb the simulation.

use thiserror::Error;

use crate::simulation::bodies::{BodyId, BodyStore, NVec3};
use crate::simulation::params::Parameters;

/// Default forward horizon, in prediction steps.
pub const DEFAULT_HORIZON: usize = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredictError {
    #[error("no live body with that id")]
    UnknownBody,
}

/// A fixed attractor sampled from the live population.
#[derive(Debug, Clone, Copy)]
struct Attractor {
    x: NVec3,
    m: f64,
}

/// Predict the trajectory of `id` over `steps` leapfrog steps.
///
/// Uses direct summation over the frozen attractors and half the engine's
/// current step size; cheap enough to re-run every time the user drags a
/// velocity handle. Returns one point per step.
pub fn predict_orbit(
    store: &BodyStore,
    id: BodyId,
    steps: usize,
    params: &Parameters,
) -> Result<Vec<NVec3>, PredictError> {
    let subject = store.get(id).ok_or(PredictError::UnknownBody)?;

    let attractors: Vec<Attractor> = store
        .alive_bodies()
        .filter(|b| b.id != id)
        .map(|b| Attractor { x: b.x, m: b.m })
        .collect();

    let dt = params.dt() * 0.5;
    let half_dt = 0.5 * dt;
    let mut x = subject.x;
    let mut v = subject.v;
    let mut a = accel_at(x, &attractors, params.G, params.eps2);

    let mut points = Vec::with_capacity(steps);
    for _ in 0..steps {
        v += half_dt * a;
        x += dt * v;
        a = accel_at(x, &attractors, params.G, params.eps2);
        v += half_dt * a;
        points.push(x);
    }
    Ok(points)
}

#[allow(non_snake_case)]
fn accel_at(x: NVec3, attractors: &[Attractor], G: f64, eps2: f64) -> NVec3 {
    let mut acc = NVec3::zeros();
    for att in attractors {
        let r = att.x - x;
        let d2 = r.dot(&r) + eps2;
        let inv_r = d2.sqrt().recip();
        let inv_r3 = inv_r * inv_r * inv_r;
        acc += G * att.m * inv_r3 * r;
    }
    acc
}
