use approx::assert_relative_eq;

use gravbox::simulation::bodies::{BodyKind, BodyStore, NVec3, SpawnError};
use gravbox::simulation::forces::{total_energy, AccelSet, Acceleration, NewtonianGravity};
use gravbox::simulation::octree::Octree;
use gravbox::simulation::params::Parameters;
use gravbox::{Preset, Sandbox, DEFAULT_HORIZON};

/// Parameters tuned for short deterministic tests
fn test_params() -> Parameters {
    Parameters {
        base_dt: 0.05,
        eps2: 1e-4,
        ..Parameters::default()
    }
}

/// Sandbox with a circular binary: two 800-mass stars at ±25 on x,
/// counter-orbiting in the x/z plane at v = sqrt(G·800/(4·25))
fn binary_sandbox(dt: f64) -> Sandbox {
    let mut sandbox = Sandbox::new(Parameters {
        base_dt: dt,
        ..test_params()
    });
    sandbox.apply_preset(Preset::BinaryStar);
    sandbox
}

/// Deterministic scattered store of `n` unit asteroids, no rng
fn scattered_store(n: usize) -> BodyStore {
    let mut store = BodyStore::new(n + 8);
    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 40.0,
            (i_f * 0.13).cos() * 40.0,
            (i_f * 0.07).sin() * 40.0,
        );
        store
            .spawn(BodyKind::Asteroid, 1.0, x, NVec3::zeros())
            .unwrap();
    }
    store
}

fn separation(sandbox: &Sandbox) -> f64 {
    let bodies: Vec<_> = sandbox.bodies().collect();
    assert_eq!(bodies.len(), 2);
    (bodies[0].x - bodies[1].x).norm()
}

// ==================================================================================
// Body store tests
// ==================================================================================

#[test]
fn spawn_rejects_bad_input_without_mutating() {
    let mut store = BodyStore::new(10);

    let nan = NVec3::new(f64::NAN, 0.0, 0.0);
    assert_eq!(
        store.spawn(BodyKind::Planet, 1.0, nan, NVec3::zeros()),
        Err(SpawnError::NonFiniteInput)
    );
    assert_eq!(
        store.spawn(BodyKind::Planet, -1.0, NVec3::zeros(), NVec3::zeros()),
        Err(SpawnError::NonPositiveMass)
    );
    assert_eq!(
        store.spawn(BodyKind::Planet, 0.0, NVec3::zeros(), NVec3::zeros()),
        Err(SpawnError::NonPositiveMass)
    );
    assert_eq!(store.count(), 0);
}

#[test]
fn spawn_rejects_at_capacity() {
    let mut store = BodyStore::new(2);
    store
        .spawn(BodyKind::Planet, 1.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    store
        .spawn(BodyKind::Planet, 1.0, NVec3::new(5.0, 0.0, 0.0), NVec3::zeros())
        .unwrap();

    let third = store.spawn(BodyKind::Planet, 1.0, NVec3::new(10.0, 0.0, 0.0), NVec3::zeros());
    assert_eq!(third, Err(SpawnError::Capacity(2)));
    assert_eq!(store.count(), 2);
}

#[test]
fn kill_is_idempotent_and_compaction_reclaims_slots() {
    let mut store = BodyStore::new(10);
    let a = store
        .spawn(BodyKind::Planet, 1.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    let b = store
        .spawn(BodyKind::Planet, 2.0, NVec3::new(3.0, 0.0, 0.0), NVec3::zeros())
        .unwrap();

    store.kill(a);
    store.kill(a); // no-op the second time
    assert_eq!(store.count(), 1);
    assert_eq!(store.len(), 2); // slot survives until compaction

    store.compact();
    assert_eq!(store.len(), 1);
    assert!(store.get(a).is_none());
    assert!(store.get(b).is_some());
}

#[test]
fn clear_resets_count_to_zero() {
    let mut sandbox = Sandbox::new(test_params());
    sandbox.apply_preset(Preset::SolarSystem);
    assert!(sandbox.count() > 0);

    sandbox.clear();
    assert_eq!(sandbox.count(), 0);
}

#[test]
fn radius_follows_cube_root_law_within_clamp() {
    // Eightfold mass doubles the radius
    let r1 = BodyKind::Planet.radius_for_mass(10.0);
    let r2 = BodyKind::Planet.radius_for_mass(80.0);
    assert_relative_eq!(r2, 2.0 * r1, max_relative = 1e-12);

    // Clamp bounds hold at the extremes
    assert_eq!(BodyKind::Debris.radius_for_mass(1e-9), 0.15);
    assert_eq!(BodyKind::Star.radius_for_mass(1e12), 12.0);
}

// ==================================================================================
// Gravity tests
// ==================================================================================

fn direct_gravity(p: &Parameters) -> AccelSet {
    AccelSet::new().with(NewtonianGravity {
        G: p.G,
        eps2: p.eps2,
        theta: p.theta,
        direct_sum_threshold: usize::MAX,
    })
}

fn two_body_store(dist: f64, m1: f64, m2: f64) -> BodyStore {
    let mut store = BodyStore::new(4);
    store
        .spawn(BodyKind::Planet, m1, NVec3::new(-dist / 2.0, 0.0, 0.0), NVec3::zeros())
        .unwrap();
    store
        .spawn(BodyKind::Planet, m2, NVec3::new(dist / 2.0, 0.0, 0.0), NVec3::zeros())
        .unwrap();
    store
}

#[test]
fn gravity_newton_third_law() {
    let store = two_body_store(10.0, 2.0, 3.0);
    let p = test_params();
    let forces = direct_gravity(&p);

    let mut acc = vec![NVec3::zeros(); 2];
    forces.accumulate_accels(0.0, &store, &mut acc);

    let net = acc[0] * store.bodies[0].m + acc[1] * store.bodies[1].m;
    assert!(net.norm() < 1e-12, "net force not zero: {net:?}");
}

#[test]
fn gravity_inverse_square_law() {
    let p = Parameters {
        eps2: 0.0,
        ..test_params()
    };
    let forces = direct_gravity(&p);

    let store_r = two_body_store(10.0, 1.0, 1.0);
    let store_2r = two_body_store(20.0, 1.0, 1.0);

    let mut acc_r = vec![NVec3::zeros(); 2];
    let mut acc_2r = vec![NVec3::zeros(); 2];
    forces.accumulate_accels(0.0, &store_r, &mut acc_r);
    forces.accumulate_accels(0.0, &store_2r, &mut acc_2r);

    let ratio = acc_r[0].norm() / acc_2r[0].norm();
    assert!((ratio - 4.0).abs() < 1e-9, "expected ~4x, got {ratio}");
}

#[test]
fn gravity_softening_prevents_blowup() {
    let p = Parameters {
        eps2: 0.1,
        ..test_params()
    };
    let store = two_body_store(1e-9, 1.0, 1.0);
    let forces = direct_gravity(&p);

    let mut acc = vec![NVec3::zeros(); 2];
    forces.accumulate_accels(0.0, &store, &mut acc);
    assert!(acc[0].norm() < 1e6, "softening failed: {}", acc[0].norm());
}

#[test]
fn dead_bodies_exert_and_feel_nothing() {
    let mut store = two_body_store(10.0, 1.0, 1.0);
    let far = store
        .spawn(BodyKind::Star, 1e6, NVec3::new(0.0, 5.0, 0.0), NVec3::zeros())
        .unwrap();
    store.kill(far);

    let p = test_params();
    let forces = direct_gravity(&p);
    let mut acc = vec![NVec3::zeros(); store.len()];
    forces.accumulate_accels(0.0, &store, &mut acc);

    // The dead megastar contributes nothing, so the two live bodies only
    // pull on each other along x
    assert!(acc[0].y.abs() < 1e-12);
    assert!(acc[1].y.abs() < 1e-12);
    assert_eq!(acc[2], NVec3::zeros());
}

// ==================================================================================
// Octree tests
// ==================================================================================

#[test]
fn octree_root_aggregates_mass_and_com() {
    let mut store = scattered_store(50);
    let heavy = store
        .spawn(BodyKind::Star, 950.0, NVec3::new(10.0, 0.0, 0.0), NVec3::zeros())
        .unwrap();
    assert!(store.get(heavy).is_some());

    let tree = Octree::build(&store);
    let root = &tree.nodes[tree.root];

    let total: f64 = store.alive_bodies().map(|b| b.m).sum();
    let com: NVec3 = store.alive_bodies().map(|b| b.x * b.m).sum::<NVec3>() / total;

    assert_relative_eq!(root.mass, total, max_relative = 1e-12);
    assert!((root.com - com).norm() < 1e-9);
}

#[test]
fn octree_excludes_dead_bodies() {
    let mut store = scattered_store(20);
    let id = store.bodies[7].id;
    store.kill(id);

    let tree = Octree::build(&store);
    let total: f64 = store.alive_bodies().map(|b| b.m).sum();
    assert_relative_eq!(tree.nodes[tree.root].mass, total, max_relative = 1e-12);
}

#[test]
fn barnes_hut_error_shrinks_as_theta_tightens() {
    let store = scattered_store(200);
    let p = test_params();

    let mut exact = vec![NVec3::zeros(); store.len()];
    direct_gravity(&p).accumulate_accels(0.0, &store, &mut exact);

    let mean_error = |theta: f64| -> f64 {
        let tree = Octree::build(&store);
        let mut err = 0.0;
        for i in 0..store.len() {
            let approx = tree.acceleration_on(i, &store, p.G, p.eps2, theta);
            err += (approx - exact[i]).norm() / exact[i].norm().max(1e-12);
        }
        err / store.len() as f64
    };

    let coarse = mean_error(0.9);
    let medium = mean_error(0.5);
    let fine = mean_error(0.1);

    assert!(
        coarse > medium && medium > fine,
        "errors not strictly decreasing: {coarse} {medium} {fine}"
    );
    assert!(fine < 1e-3);
}

#[test]
fn octree_handles_coincident_bodies() {
    let mut store = BodyStore::new(4);
    let x = NVec3::new(1.0, 2.0, 3.0);
    store.spawn(BodyKind::Asteroid, 1.0, x, NVec3::zeros()).unwrap();
    store.spawn(BodyKind::Asteroid, 2.0, x, NVec3::zeros()).unwrap();

    // Must terminate and still account for all mass
    let tree = Octree::build(&store);
    assert_relative_eq!(tree.nodes[tree.root].mass, 3.0, max_relative = 1e-12);
}

// ==================================================================================
// Integrator / long-run stability tests
// ==================================================================================

#[test]
fn binary_star_stays_bounded_for_1000_ticks() {
    let mut sandbox = binary_sandbox(0.15);
    let initial = separation(&sandbox);

    for _ in 0..1000 {
        sandbox.step();
        assert_eq!(sandbox.count(), 2, "binary should never merge or split");
        let s = separation(&sandbox);
        assert!(
            (s - initial).abs() < 0.2 * initial,
            "separation drifted out of band: {s} vs {initial}"
        );
    }
}

#[test]
fn binary_energy_drift_is_bounded() {
    let mut sandbox = binary_sandbox(0.15);
    let p = sandbox.params().clone();
    let e0 = total_energy(sandbox.store(), p.G, p.eps2);

    for _ in 0..3000 {
        sandbox.step();
    }

    let e1 = total_energy(sandbox.store(), p.G, p.eps2);
    let drift = ((e1 - e0) / e0).abs();
    assert!(drift < 0.02, "energy drifted by {drift}");
}

#[test]
fn step_advances_clock_and_ages() {
    let mut sandbox = Sandbox::new(test_params());
    sandbox
        .spawn(BodyKind::Planet, 1.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();

    for _ in 0..10 {
        sandbox.step();
    }
    let dt = sandbox.params().dt();
    assert_relative_eq!(sandbox.time(), 10.0 * dt, max_relative = 1e-12);
    let body = sandbox.bodies().next().unwrap();
    assert_relative_eq!(body.age, 10.0 * dt, max_relative = 1e-12);
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn overlapping_bodies_merge_within_one_tick() {
    let mut sandbox = Sandbox::new(test_params());
    let light = sandbox
        .spawn(
            BodyKind::Asteroid,
            1.0,
            NVec3::new(0.05, 0.0, 0.0),
            NVec3::new(0.5, 0.0, 0.0),
        )
        .unwrap();
    let heavy = sandbox
        .spawn(
            BodyKind::Asteroid,
            2.0,
            NVec3::zeros(),
            NVec3::new(0.0, 0.0, 1.0),
        )
        .unwrap();

    let p_before: NVec3 = sandbox.bodies().map(|b| b.momentum()).sum();
    sandbox.step();

    assert_eq!(sandbox.count(), 1);
    assert_eq!(sandbox.collisions().len(), 1);
    assert!(sandbox.get(light).is_none());

    let survivor = sandbox.get(heavy).expect("heavier body survives");
    assert_relative_eq!(survivor.m, 3.0, max_relative = 1e-12);

    // Momentum conserved through integration + merge (forces are internal)
    let p_after = survivor.momentum();
    assert!((p_after - p_before).norm() < 1e-9);

    assert_relative_eq!(sandbox.collisions()[0].combined_mass, 3.0, max_relative = 1e-12);
}

#[test]
fn equal_mass_merge_keeps_lower_id() {
    let mut sandbox = Sandbox::new(test_params());
    let first = sandbox
        .spawn(BodyKind::Asteroid, 1.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    let second = sandbox
        .spawn(BodyKind::Asteroid, 1.0, NVec3::new(0.1, 0.0, 0.0), NVec3::zeros())
        .unwrap();

    sandbox.step();

    assert!(sandbox.get(first).is_some());
    assert!(sandbox.get(second).is_none());
}

#[test]
fn merged_radius_follows_survivor_kind_law() {
    let mut sandbox = Sandbox::new(test_params());
    sandbox
        .spawn(BodyKind::Planet, 30.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    let heavy = sandbox
        .spawn(BodyKind::Planet, 50.0, NVec3::new(0.5, 0.0, 0.0), NVec3::zeros())
        .unwrap();

    sandbox.step();

    let survivor = sandbox.get(heavy).unwrap();
    assert_relative_eq!(
        survivor.radius,
        BodyKind::Planet.radius_for_mass(80.0),
        max_relative = 1e-12
    );
}

// ==================================================================================
// Tidal breakup tests
// ==================================================================================

#[test]
fn body_inside_roche_limit_fragments() {
    let mut sandbox = Sandbox::new(test_params());
    sandbox
        .spawn(BodyKind::Star, 800.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    // Planet mass 10: disruptor outweighs it 80x, Roche distance is
    // 4.0 · 2.44 · 80^(1/3) ≈ 42, so separation 20 is well inside
    let victim = sandbox
        .spawn(
            BodyKind::Planet,
            10.0,
            NVec3::new(20.0, 0.0, 0.0),
            NVec3::zeros(),
        )
        .unwrap();

    sandbox.step();

    assert!(sandbox.get(victim).is_none(), "victim should be gone");
    assert_eq!(sandbox.disruptions().len(), 1);

    let fragments: Vec<_> = sandbox
        .bodies()
        .filter(|b| b.kind == BodyKind::Debris)
        .collect();
    assert!(fragments.len() >= 3);

    let total: f64 = fragments.iter().map(|b| b.m).sum();
    assert!(
        (total - 10.0).abs() / 10.0 < 0.05,
        "fragment mass {total} too far from original"
    );
}

#[test]
fn black_holes_and_light_bodies_never_fragment() {
    let mut sandbox = Sandbox::new(test_params());
    sandbox
        .spawn(BodyKind::Star, 4000.0, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    // Below min_breakup_mass (and outside the merge radius)
    let pebble = sandbox
        .spawn(
            BodyKind::Asteroid,
            1.0,
            NVec3::new(10.0, 0.0, 0.0),
            NVec3::new(0.0, 0.0, 20.0),
        )
        .unwrap();
    // A black hole sitting deep inside the star's Roche distance
    let hole = sandbox
        .spawn(
            BodyKind::BlackHole,
            40.0,
            NVec3::new(0.0, 25.0, 0.0),
            NVec3::new(12.0, 0.0, 0.0),
        )
        .unwrap();

    sandbox.step();

    assert!(sandbox.get(pebble).is_some());
    assert!(sandbox.get(hole).is_some());
    assert!(sandbox.disruptions().is_empty());
}

// ==================================================================================
// Determinism tests
// ==================================================================================

#[test]
fn same_seed_replays_identical_trajectories() {
    let run = || {
        let mut sandbox = Sandbox::new(Parameters {
            seed: 1234,
            ..test_params()
        });
        sandbox.apply_preset(Preset::ChaosField);
        for _ in 0..50 {
            sandbox.step();
        }
        sandbox
            .bodies()
            .map(|b| (b.id, b.x, b.v))
            .collect::<Vec<_>>()
    };

    let a = run();
    let b = run();
    assert_eq!(a.len(), b.len());
    for ((id_a, x_a, v_a), (id_b, x_b, v_b)) in a.iter().zip(b.iter()) {
        assert_eq!(id_a, id_b);
        assert_eq!(x_a, x_b);
        assert_eq!(v_a, v_b);
    }
}

// ==================================================================================
// Trail tests
// ==================================================================================

#[test]
fn trails_are_capped_sliding_windows() {
    let mut sandbox = Sandbox::new(test_params());
    let id = sandbox
        .spawn(
            BodyKind::Planet,
            1.0,
            NVec3::zeros(),
            NVec3::new(1.0, 0.0, 0.0),
        )
        .unwrap();

    for _ in 0..50 {
        sandbox.step();
    }
    assert_eq!(sandbox.trail(id).unwrap().len(), 50);

    for _ in 0..300 {
        sandbox.step();
    }
    let trail = sandbox.trail(id).unwrap();
    assert_eq!(trail.len(), 200);

    // Window slides: the oldest surviving point is from tick 151
    let dt = sandbox.params().dt();
    assert_relative_eq!(trail.front().unwrap().x, 151.0 * dt, max_relative = 1e-9);
}

// ==================================================================================
// Orbit prediction tests
// ==================================================================================

#[test]
fn prediction_returns_polyline_without_mutating_state() {
    let mut sandbox = Sandbox::new(test_params());
    let central = 2000.0;
    sandbox
        .spawn(BodyKind::Star, central, NVec3::zeros(), NVec3::zeros())
        .unwrap();
    let r = 40.0;
    let v = (sandbox.params().G * central / r).sqrt();
    let planet = sandbox
        .spawn(
            BodyKind::Planet,
            5.0,
            NVec3::new(r, 0.0, 0.0),
            NVec3::new(0.0, 0.0, -v),
        )
        .unwrap();

    let before: Vec<_> = sandbox.bodies().map(|b| (b.x, b.v)).collect();
    let t_before = sandbox.time();

    let path = sandbox.predict_orbit(planet, DEFAULT_HORIZON).unwrap();
    assert_eq!(path.len(), DEFAULT_HORIZON);

    // A circular orbit around a frozen attractor stays on its circle
    for point in &path {
        let dist = point.norm();
        assert!(
            (dist - r).abs() < 0.05 * r,
            "predicted point left the circle: {dist}"
        );
    }

    let after: Vec<_> = sandbox.bodies().map(|b| (b.x, b.v)).collect();
    assert_eq!(before, after, "prediction must not touch real state");
    assert_eq!(sandbox.time(), t_before);
}

#[test]
fn prediction_fails_cleanly_for_unknown_body() {
    let sandbox = Sandbox::new(test_params());
    let err = sandbox.predict_orbit(gravbox::BodyId(999), 10);
    assert!(err.is_err());
}
