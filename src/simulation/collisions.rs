//! Collision resolution through perfectly inelastic mergers
//!
//! Overlapping bodies merge into one, conserving total mass and momentum.
//! Detection and resolution are separate passes: every overlapping pair is
//! collected against the pre-resolution positions, so the order in which
//! merges are applied cannot bias the geometry mid-pass.

use crate::simulation::bodies::BodyStore;
use crate::simulation::events::{blend_colors, CollisionEvent};

/// An overlapping pair found during detection, by slot index.
#[derive(Debug, Clone, Copy)]
struct Overlap {
    i: usize,
    j: usize,
}

/// Detect and merge all overlapping live pairs.
///
/// Survivor selection: the heavier body absorbs the lighter; on an exact
/// mass tie the lower id survives, so resolution is deterministic. A body
/// that already died earlier in this pass is skipped, which makes cascades
/// (A hits B, B's survivor hits C) resolve over successive ticks instead of
/// double-processing anything.
pub fn resolve_collisions(store: &mut BodyStore, events: &mut Vec<CollisionEvent>) {
    let n = store.bodies.len();
    let mut overlaps = Vec::new();

    for i in 0..n {
        let bi = &store.bodies[i];
        if !bi.alive {
            continue;
        }
        for j in (i + 1)..n {
            let bj = &store.bodies[j];
            if !bj.alive {
                continue;
            }
            let r = bj.x - bi.x;
            let touch = bi.radius + bj.radius;
            if r.dot(&r) < touch * touch {
                overlaps.push(Overlap { i, j });
            }
        }
    }

    for Overlap { i, j } in overlaps {
        if !store.bodies[i].alive || !store.bodies[j].alive {
            continue;
        }

        let heavier_is_i = {
            let (bi, bj) = (&store.bodies[i], &store.bodies[j]);
            bi.m > bj.m || (bi.m == bj.m && bi.id < bj.id)
        };
        let (survivor, absorbed) = if heavier_is_i { (i, j) } else { (j, i) };

        let (m1, x1, v1, c1) = {
            let b = &store.bodies[survivor];
            (b.m, b.x, b.v, b.color)
        };
        let (m2, x2, v2, c2) = {
            let b = &store.bodies[absorbed];
            (b.m, b.x, b.v, b.color)
        };

        let total = m1 + m2;
        let position = (x1 * m1 + x2 * m2) / total;
        let velocity = (v1 * m1 + v2 * m2) / total;
        let color = blend_colors(c1, m1, c2, m2);

        let b = &mut store.bodies[survivor];
        b.m = total;
        b.x = position;
        b.v = velocity;
        b.color = color;
        b.update_radius();

        store.bodies[absorbed].alive = false;

        events.push(CollisionEvent {
            position,
            combined_mass: total,
            color,
        });
    }
}
