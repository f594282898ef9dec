//! Preset scene generators
//!
//! Each preset issues a deterministic sequence of spawns, using the
//! closed-form circular-orbit speed `v = sqrt(G·M/r)` wherever a body is
//! meant to orbit a dominant central mass. Spawns that fail past the body
//! cap are silently dropped; presets are a convenience layer, not core
//! state.

use rand::rngs::StdRng;
use rand::Rng;
use serde::Deserialize;

use crate::simulation::bodies::{BodyKind, BodyStore, NVec3};
use crate::simulation::params::Parameters;

/// Named starting configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    BinaryStar,
    SolarSystem,
    FigureEight,
    ClusterCollision,
    LagrangeFive,
    ChaosField,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "binary_star" => Some(Self::BinaryStar),
            "solar_system" => Some(Self::SolarSystem),
            "figure_eight" => Some(Self::FigureEight),
            "cluster_collision" => Some(Self::ClusterCollision),
            "lagrange_five" => Some(Self::LagrangeFive),
            "chaos_field" => Some(Self::ChaosField),
            _ => None,
        }
    }

    /// Spawn this preset's bodies into `store`.
    pub fn populate(self, store: &mut BodyStore, params: &Parameters, rng: &mut StdRng) {
        match self {
            Self::BinaryStar => binary_star(store, params),
            Self::SolarSystem => solar_system(store, params),
            Self::FigureEight => figure_eight(store),
            Self::ClusterCollision => cluster_collision(store, params),
            Self::LagrangeFive => lagrange_five(store, params),
            Self::ChaosField => chaos_field(store, rng),
        }
    }
}

/// Circular-orbit speed around a central mass `M` at radius `r`.
#[allow(non_snake_case)]
fn circular_speed(G: f64, central_mass: f64, r: f64) -> f64 {
    (G * central_mass / r).sqrt()
}

/// Two equal stars on a circular orbit about their barycenter.
fn binary_star(store: &mut BodyStore, params: &Parameters) {
    let m = 800.0;
    let r = 25.0;
    // Each star orbits the barycenter; the effective central mass at
    // separation 2r gives v = sqrt(G·m / 4r).
    let v = (params.G * m / (4.0 * r)).sqrt();

    let _ = store.spawn(
        BodyKind::Star,
        m,
        NVec3::new(-r, 0.0, 0.0),
        NVec3::new(0.0, 0.0, v),
    );
    let _ = store.spawn(
        BodyKind::Star,
        m,
        NVec3::new(r, 0.0, 0.0),
        NVec3::new(0.0, 0.0, -v),
    );
}

/// One star, five planets on circular orbits, and a sparse asteroid belt.
fn solar_system(store: &mut BodyStore, params: &Parameters) {
    let central = 2000.0;
    let _ = store.spawn(BodyKind::Star, central, NVec3::zeros(), NVec3::zeros());

    let orbits: [(f64, f64); 5] = [
        (15.0, 4.0),
        (22.0, 8.0),
        (30.0, 14.0),
        (40.0, 10.0),
        (52.0, 6.0),
    ];
    for (r, m) in orbits {
        let v = circular_speed(params.G, central, r);
        let _ = store.spawn(
            BodyKind::Planet,
            m,
            NVec3::new(r, 0.0, 0.0),
            NVec3::new(0.0, 0.0, -v),
        );
    }

    // Belt between the outer orbits, phased deterministically.
    for i in 0..24 {
        let angle = i as f64 * std::f64::consts::TAU / 24.0;
        let r = 60.0 + 2.0 * (i as f64 * 0.7).sin();
        let v = circular_speed(params.G, central, r);
        let _ = store.spawn(
            BodyKind::Asteroid,
            0.4,
            NVec3::new(r * angle.cos(), 0.0, r * angle.sin()),
            NVec3::new(v * angle.sin(), 0.0, -v * angle.cos()),
        );
    }
}

/// The classic equal-mass figure-eight choreography, scaled up so the
/// bodies stay well clear of their merge radii. The canonical solution
/// assumes G·m = 1; scaling lengths by `L` requires scaling speeds by
/// `1/sqrt(L)`.
fn figure_eight(store: &mut BodyStore) {
    let scale: f64 = 20.0;
    let v_scale = scale.sqrt().recip();

    let x1 = NVec3::new(0.970_004_36, -0.243_087_53, 0.0) * scale;
    let v3 = NVec3::new(-0.932_407_37, -0.864_731_46, 0.0) * v_scale;
    let v1 = -v3 * 0.5;

    let _ = store.spawn(BodyKind::Asteroid, 1.0, x1, v1);
    let _ = store.spawn(BodyKind::Asteroid, 1.0, -x1, v1);
    let _ = store.spawn(BodyKind::Asteroid, 1.0, NVec3::zeros(), v3);
}

/// Two compact clusters on a collision course.
fn cluster_collision(store: &mut BodyStore, params: &Parameters) {
    let approach = 0.4 * circular_speed(params.G, 60.0, 10.0);
    for side in [-1.0, 1.0] {
        let center = NVec3::new(side * 60.0, 0.0, 0.0);
        for i in 0..60 {
            let i_f = i as f64;
            // Deterministic quasi-random placement, no rng needed.
            let offset = NVec3::new(
                (i_f * 0.37).sin() * 8.0,
                (i_f * 0.13).cos() * 8.0,
                (i_f * 0.07).sin() * 8.0,
            );
            let _ = store.spawn(
                BodyKind::Asteroid,
                1.0,
                center + offset,
                NVec3::new(-side * approach, 0.0, 0.0),
            );
        }
    }
}

/// Central star, a planet, its two trojan companions at ±60°, and an outer
/// planet: five bodies sharing circular orbits.
fn lagrange_five(store: &mut BodyStore, params: &Parameters) {
    let central = 2000.0;
    let _ = store.spawn(BodyKind::Star, central, NVec3::zeros(), NVec3::zeros());

    let r = 40.0;
    let v = circular_speed(params.G, central, r);
    for angle_deg in [0.0_f64, 60.0, -60.0] {
        let a = angle_deg.to_radians();
        let m = if angle_deg == 0.0 { 20.0 } else { 0.5 };
        let kind = if angle_deg == 0.0 {
            BodyKind::Planet
        } else {
            BodyKind::Asteroid
        };
        let _ = store.spawn(
            kind,
            m,
            NVec3::new(r * a.cos(), 0.0, r * a.sin()),
            NVec3::new(v * a.sin(), 0.0, -v * a.cos()),
        );
    }

    let outer_r = 70.0;
    let outer_v = circular_speed(params.G, central, outer_r);
    let _ = store.spawn(
        BodyKind::Planet,
        12.0,
        NVec3::new(-outer_r, 0.0, 0.0),
        NVec3::new(0.0, 0.0, outer_v),
    );
}

/// A seeded random field of mixed bodies with small drift velocities.
fn chaos_field(store: &mut BodyStore, rng: &mut StdRng) {
    for _ in 0..80 {
        let kind = match rng.gen_range(0..10) {
            0 => BodyKind::Star,
            1..=3 => BodyKind::Planet,
            _ => BodyKind::Asteroid,
        };
        let m = match kind {
            BodyKind::Star => rng.gen_range(400.0..1200.0),
            BodyKind::Planet => rng.gen_range(5.0..25.0),
            _ => rng.gen_range(0.2..2.0),
        };
        let x = NVec3::new(
            rng.gen_range(-80.0..80.0),
            rng.gen_range(-80.0..80.0),
            rng.gen_range(-80.0..80.0),
        );
        let v = NVec3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        let _ = store.spawn(kind, m, x, v);
    }
}
