//! # Barnes–Hut Octree
//!
//! Hierarchical spatial approximation for N-body gravity. Instead of the
//! naive `O(N²)` all-pairs sum, distant clusters of bodies are treated as a
//! single pseudo-body at their center of mass, giving `O(N log N)` force
//! evaluation with a tunable accuracy knob (the opening angle `theta`).
//!
//! ## Structure
//!
//! - The simulation volume is a cube, recursively split into 8 octants.
//! - Nodes live in a flat arena (`Vec<OctreeNode>`) and refer to each other
//!   by index; the tree is rebuilt from scratch for every force pass and
//!   never persisted across ticks.
//! - A node is `Empty`, a single-body `Leaf`, or `Internal` with exactly 8
//!   children, never a leaf and a parent at the same time.
//! - Every node carries the aggregate mass and center of mass of the live
//!   bodies inside its cube, accumulated during insertion and normalized by
//!   a single post-order finalize pass.

use crate::simulation::bodies::{BodyStore, NVec3};

/// Smallest half-size a node may subdivide below. Bodies closer together
/// than this are left aggregated; the softening term handles them anyway.
const MIN_HALF: f64 = 1e-6;

/// Hard cap on tree depth for pathological (near-coincident) clusters.
const MAX_DEPTH: u32 = 48;

/// Payload of an octree node.
#[derive(Debug, Clone, Copy)]
pub enum NodeKind {
    /// No body stored here. May still carry aggregate mass if a degenerate
    /// cluster stopped descending at this node.
    Empty,
    /// Exactly one body, identified by its slot index in the store.
    Leaf(usize),
    /// Eight children, one per octant, indexed into the arena.
    Internal([usize; 8]),
}

/// A cubic region of space with its aggregate physical data.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub center: NVec3,
    pub half: f64, // half the edge length
    pub mass: f64,
    /// Mass-weighted position sum during the build; the true center of mass
    /// after [`Octree::finalize`] has run.
    pub com: NVec3,
    pub kind: NodeKind,
}

impl OctreeNode {
    fn new(center: NVec3, half: f64) -> Self {
        Self {
            center,
            half,
            mass: 0.0,
            com: NVec3::zeros(),
            kind: NodeKind::Empty,
        }
    }
}

/// A complete Barnes–Hut octree over the live bodies of a store.
///
/// Built at the start of a force pass and discarded at its end; the nodes
/// never change after [`Octree::finalize`].
pub struct Octree {
    pub nodes: Vec<OctreeNode>,
    pub root: usize,
}

impl Octree {
    /// Build and finalize an octree over all live bodies.
    ///
    /// The root cube is centered on the origin with a half-size of
    /// `1.5 × max(|coordinate|)` over the live population, floored at 100 so
    /// a compact cluster near the origin still gets a sane volume.
    pub fn build(store: &BodyStore) -> Self {
        let mut extent: f64 = 0.0;
        for b in store.alive_bodies() {
            extent = extent.max(b.x.x.abs()).max(b.x.y.abs()).max(b.x.z.abs());
        }
        let half = (1.5 * extent).max(100.0);

        let mut tree = Octree {
            nodes: vec![OctreeNode::new(NVec3::zeros(), half)],
            root: 0,
        };

        for (i, b) in store.bodies.iter().enumerate() {
            if b.alive {
                tree.insert(tree.root, i, store, 0);
            }
        }

        tree.finalize(tree.root);
        tree
    }

    /// Net gravitational acceleration on body `i` via tree traversal.
    ///
    /// Leaves contribute exact softened pairwise terms (skipping `i` itself
    /// and dead bodies); internal nodes whose apparent size `width/distance`
    /// falls below `theta` contribute a single aggregate term, otherwise all
    /// 8 children are visited.
    #[allow(non_snake_case)]
    pub fn acceleration_on(
        &self,
        i: usize,
        store: &BodyStore,
        G: f64,
        eps2: f64,
        theta: f64,
    ) -> NVec3 {
        let pos = store.bodies[i].x;
        let mut acc = NVec3::zeros();
        self.traverse(self.root, i, pos, store, G, eps2, theta, &mut acc);
        acc
    }

    // build helpers ========================================================

    /// Insert one body, accumulating its mass and weighted position into
    /// every node visited on the way down.
    fn insert(&mut self, node_idx: usize, body_idx: usize, store: &BodyStore, depth: u32) {
        let b = &store.bodies[body_idx];
        let (x, m) = (b.x, b.m);

        let node = &mut self.nodes[node_idx];
        node.mass += m;
        node.com += x * m;

        // Degenerate cluster: keep the mass aggregated here rather than
        // subdividing forever around near-coincident positions.
        if node.half * 0.5 < MIN_HALF || depth >= MAX_DEPTH {
            return;
        }

        match node.kind {
            NodeKind::Empty => {
                node.kind = NodeKind::Leaf(body_idx);
            }
            NodeKind::Leaf(prev_idx) => {
                // Subdivide, push the pre-existing body down first, then
                // descend with the new one.
                let children = self.subdivide(node_idx);
                self.nodes[node_idx].kind = NodeKind::Internal(children);

                let prev_child = children[self.octant_of(node_idx, store.bodies[prev_idx].x)];
                self.insert(prev_child, prev_idx, store, depth + 1);

                let child = children[self.octant_of(node_idx, x)];
                self.insert(child, body_idx, store, depth + 1);
            }
            NodeKind::Internal(children) => {
                let child = children[self.octant_of(node_idx, x)];
                self.insert(child, body_idx, store, depth + 1);
            }
        }
    }

    /// Allocate 8 equal child octants for a node, split at its center.
    fn subdivide(&mut self, node_idx: usize) -> [usize; 8] {
        let center = self.nodes[node_idx].center;
        let quarter = self.nodes[node_idx].half * 0.5;

        let mut children = [0usize; 8];
        for (oct, slot) in children.iter_mut().enumerate() {
            // Octant encoding: bit 0 = +x, bit 1 = +y, bit 2 = +z.
            let offset = NVec3::new(
                if oct & 1 == 0 { -quarter } else { quarter },
                if oct & 2 == 0 { -quarter } else { quarter },
                if oct & 4 == 0 { -quarter } else { quarter },
            );
            *slot = self.nodes.len();
            self.nodes.push(OctreeNode::new(center + offset, quarter));
        }
        children
    }

    /// Which octant of `node_idx` the point `p` falls into.
    fn octant_of(&self, node_idx: usize, p: NVec3) -> usize {
        let c = self.nodes[node_idx].center;
        let mut oct = 0;
        if p.x >= c.x {
            oct |= 1;
        }
        if p.y >= c.y {
            oct |= 2;
        }
        if p.z >= c.z {
            oct |= 4;
        }
        oct
    }

    /// Post-order pass converting each node's accumulated position sum into
    /// a true center of mass.
    fn finalize(&mut self, node_idx: usize) {
        if let NodeKind::Internal(children) = self.nodes[node_idx].kind {
            for child in children {
                self.finalize(child);
            }
        }
        let node = &mut self.nodes[node_idx];
        if node.mass > 0.0 {
            node.com /= node.mass;
        }
    }

    // query helpers ========================================================

    #[allow(non_snake_case, clippy::too_many_arguments)]
    fn traverse(
        &self,
        node_idx: usize,
        body_idx: usize,
        pos: NVec3,
        store: &BodyStore,
        G: f64,
        eps2: f64,
        theta: f64,
        acc: &mut NVec3,
    ) {
        let node = &self.nodes[node_idx];
        if node.mass <= 0.0 {
            return;
        }

        match node.kind {
            NodeKind::Leaf(j) => {
                if j == body_idx {
                    return;
                }
                let b = &store.bodies[j];
                if !b.alive {
                    return;
                }
                *acc += point_mass_accel(b.x - pos, b.m, G, eps2);
            }
            NodeKind::Internal(children) => {
                let r = node.com - pos;
                let dist = r.norm();
                if dist == 0.0 {
                    return;
                }
                let width = 2.0 * node.half;
                if width / dist < theta {
                    // Far field: the whole subtree as one pseudo-body.
                    *acc += point_mass_accel(r, node.mass, G, eps2);
                } else {
                    for child in children {
                        self.traverse(child, body_idx, pos, store, G, eps2, theta, acc);
                    }
                }
            }
            NodeKind::Empty => {
                // Mass without a leaf: a degenerate cluster that stopped
                // descending. Treat it as an aggregate point mass.
                let r = node.com - pos;
                if r.norm() == 0.0 {
                    return;
                }
                *acc += point_mass_accel(r, node.mass, G, eps2);
            }
        }
    }
}

/// Softened inverse-square acceleration from a point mass at displacement `r`.
#[allow(non_snake_case)]
fn point_mass_accel(r: NVec3, m: f64, G: f64, eps2: f64) -> NVec3 {
    let d2 = r.dot(&r) + eps2;
    let inv_r = d2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    G * m * inv_r3 * r
}
