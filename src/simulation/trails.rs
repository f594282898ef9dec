//! Bounded per-body position history for visualization.
//!
//! A sliding window of past positions, appended once per tick and capped at
//! [`TRAIL_CAPACITY`] points. Purely observational: the physics never reads
//! trails back.

use std::collections::{HashMap, VecDeque};

use crate::simulation::bodies::{BodyId, BodyStore, NVec3};

pub const TRAIL_CAPACITY: usize = 200;

/// Trail buffers for every live body, keyed by id.
#[derive(Debug, Default)]
pub struct TrailSet {
    trails: HashMap<BodyId, VecDeque<NVec3>>,
}

impl TrailSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the current position of every live body, evicting the oldest
    /// point once a buffer is full, and drop buffers of bodies that died.
    pub fn record(&mut self, store: &BodyStore) {
        for b in store.alive_bodies() {
            let trail = self.trails.entry(b.id).or_default();
            if trail.len() == TRAIL_CAPACITY {
                trail.pop_front();
            }
            trail.push_back(b.x);
        }
        self.trails.retain(|id, _| store.get(*id).is_some());
    }

    pub fn trail(&self, id: BodyId) -> Option<&VecDeque<NVec3>> {
        self.trails.get(&id)
    }

    pub fn clear(&mut self) {
        self.trails.clear();
    }
}
