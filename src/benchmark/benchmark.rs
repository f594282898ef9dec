//! Manual timing harness for the gravity paths.
//!
//! Not a criterion suite on purpose: these print CSV-ish lines that can be
//! pasted straight into a spreadsheet to eyeball the O(N²) / O(N log N)
//! crossover.

use std::time::Instant;

use crate::simulation::bodies::{BodyKind, BodyStore, NVec3};
use crate::simulation::forces::{AccelSet, Acceleration, NewtonianGravity};
use crate::simulation::integrator::verlet_step;
use crate::simulation::params::Parameters;

/// Deterministic test population of size `n`, no rng needed.
fn make_store(n: usize) -> BodyStore {
    let mut store = BodyStore::new(n + 1);
    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 50.0,
            (i_f * 0.13).cos() * 50.0,
            (i_f * 0.07).sin() * 50.0,
        );
        let _ = store.spawn(BodyKind::Asteroid, 1.0, x, NVec3::zeros());
    }
    store
}

fn direct_term(p: &Parameters) -> NewtonianGravity {
    NewtonianGravity {
        G: p.G,
        eps2: p.eps2,
        theta: p.theta,
        direct_sum_threshold: usize::MAX, // force the direct path
    }
}

fn tree_term(p: &Parameters) -> NewtonianGravity {
    NewtonianGravity {
        G: p.G,
        eps2: p.eps2,
        theta: p.theta,
        direct_sum_threshold: 0, // force the tree path
    }
}

/// Time one acceleration pass, direct vs Barnes–Hut, over growing N.
pub fn bench_gravity() {
    let params = Parameters::default();
    let ns = [200, 400, 800, 1600, 3200, 6400];

    println!("N,direct_s,tree_s");
    for n in ns {
        let store = make_store(n);
        let mut out = vec![NVec3::zeros(); n];

        let direct = direct_term(&params);
        let tree = tree_term(&params);

        // Warm up both paths
        direct.acceleration(0.0, &store, &mut out);
        tree.acceleration(0.0, &store, &mut out);

        let t0 = Instant::now();
        direct.acceleration(0.0, &store, &mut out);
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        tree.acceleration(0.0, &store, &mut out);
        let dt_tree = t1.elapsed().as_secs_f64();

        println!("{n},{dt_direct:.6},{dt_tree:.6}");
    }
}

/// Time full verlet steps (two force evaluations each) on both paths.
pub fn bench_step() {
    let params = Parameters::default();
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let steps = 3;

    println!("N,direct_step_s,tree_step_s");
    for n in ns {
        let template = make_store(n);

        let mut store_direct = template.clone();
        let forces_direct = AccelSet::new().with(direct_term(&params));
        verlet_step(&mut store_direct, &forces_direct, params.dt()); // warm up
        let t0 = Instant::now();
        for _ in 0..steps {
            verlet_step(&mut store_direct, &forces_direct, params.dt());
        }
        let direct_per_step = t0.elapsed().as_secs_f64() / steps as f64;

        let mut store_tree = template.clone();
        let forces_tree = AccelSet::new().with(tree_term(&params));
        verlet_step(&mut store_tree, &forces_tree, params.dt());
        let t1 = Instant::now();
        for _ in 0..steps {
            verlet_step(&mut store_tree, &forces_tree, params.dt());
        }
        let tree_per_step = t1.elapsed().as_secs_f64() / steps as f64;

        println!("{n},{direct_per_step:.6},{tree_per_step:.6}");
    }
}
