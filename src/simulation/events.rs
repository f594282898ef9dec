//! Discrete events emitted for external renderer/audio collaborators.
//!
//! Events are notifications only: the physics never reads them back. The
//! engine buffers them per tick and hands them out by value.

use crate::simulation::bodies::NVec3;

/// Two bodies merged this tick.
#[derive(Debug, Clone)]
pub struct CollisionEvent {
    pub position: NVec3,
    pub combined_mass: f64,
    pub color: [f32; 3], // mass-weighted blend of the two inputs
}

/// A body was tidally torn apart this tick.
#[derive(Debug, Clone)]
pub struct DisruptionEvent {
    pub position: NVec3,
    pub mass: f64,
    pub color: [f32; 3],
}

/// Mass-weighted blend of two display colors.
pub fn blend_colors(c1: [f32; 3], m1: f64, c2: [f32; 3], m2: f64) -> [f32; 3] {
    let total = m1 + m2;
    let (w1, w2) = ((m1 / total) as f32, (m2 / total) as f32);
    [
        c1[0] * w1 + c2[0] * w2,
        c1[1] * w1 + c2[1] * w2,
        c1[2] * w1 + c2[2] * w2,
    ]
}
