//! Roche-limit tidal breakup
//!
//! A body that strays inside the Roche distance of a much heavier neighbor
//! cannot hold itself together against the tide and is replaced by a small
//! cloud of debris fragments. Fragment placement uses the engine's seeded
//! rng, so runs with the same seed fragment identically.

use rand::rngs::StdRng;
use rand::Rng;

use crate::simulation::bodies::{BodyKind, BodyStore, NVec3};
use crate::simulation::events::DisruptionEvent;
use crate::simulation::params::Parameters;

/// Disruptors must outweigh the victim by at least this factor.
const DISRUPTOR_MASS_RATIO: f64 = 10.0;

/// Fragment count bounds; the count scales with the victim's mass.
const MIN_FRAGMENTS: usize = 3;
const MAX_FRAGMENTS: usize = 8;

/// Roche distance of disruptor `d` for a victim of mass `m_b`:
/// `radius(d) · roche_factor · (m_d / m_b)^(1/3)`.
fn roche_distance(d_radius: f64, d_mass: f64, b_mass: f64, roche_factor: f64) -> f64 {
    d_radius * roche_factor * (d_mass / b_mass).cbrt()
}

/// Scan for bodies inside a qualifying disruptor's Roche distance and
/// fragment them.
///
/// Candidates are flagged in a read-only pass over the pre-breakup state;
/// the first qualifying disruptor in store order wins, so the outcome does
/// not depend on resolution order. Bodies killed earlier this tick (for
/// example by a merge) are skipped. Black holes are never disrupted.
pub fn resolve_breakups(
    store: &mut BodyStore,
    params: &Parameters,
    rng: &mut StdRng,
    events: &mut Vec<DisruptionEvent>,
) {
    let n = store.bodies.len();
    let mut flagged: Vec<usize> = Vec::new();

    for bi in 0..n {
        let b = &store.bodies[bi];
        if !b.alive || b.kind == BodyKind::BlackHole || b.m <= params.min_breakup_mass {
            continue;
        }

        for d in store.bodies.iter() {
            if !d.alive || d.id == b.id || d.m < DISRUPTOR_MASS_RATIO * b.m {
                continue;
            }
            let limit = roche_distance(d.radius, d.m, b.m, params.roche_factor);
            if (d.x - b.x).norm() < limit {
                flagged.push(bi);
                break; // first qualifying disruptor wins
            }
        }
    }

    for bi in flagged {
        if !store.bodies[bi].alive {
            continue;
        }
        fragment(store, bi, rng, events);
    }
}

/// Replace body `bi` with 3..=8 debris fragments sharing its momentum.
///
/// Fragment masses are equal shares of the original; the spawn loop stops
/// silently at the body cap, so a crowded store can lose a little mass
/// here; that approximation is accepted.
fn fragment(store: &mut BodyStore, bi: usize, rng: &mut StdRng, events: &mut Vec<DisruptionEvent>) {
    let (mass, position, velocity, radius, color) = {
        let b = &store.bodies[bi];
        (b.m, b.x, b.v, b.radius, b.color)
    };

    let count = (MIN_FRAGMENTS + (mass / 20.0) as usize).min(MAX_FRAGMENTS);
    let frag_mass = mass / count as f64;
    let spread = 1.5 * radius;
    let kick = 0.3 * (velocity.norm() + 1.0).sqrt();

    store.bodies[bi].alive = false;

    for _ in 0..count {
        let offset = NVec3::new(
            rng.gen_range(-spread..=spread),
            rng.gen_range(-spread..=spread),
            rng.gen_range(-spread..=spread),
        );
        let perturb = NVec3::new(
            rng.gen_range(-kick..=kick),
            rng.gen_range(-kick..=kick),
            rng.gen_range(-kick..=kick),
        );
        if store
            .spawn(
                BodyKind::Debris,
                frag_mass,
                position + offset,
                velocity + perturb,
            )
            .is_err()
        {
            break;
        }
    }

    events.push(DisruptionEvent {
        position,
        mass,
        color,
    });
}
