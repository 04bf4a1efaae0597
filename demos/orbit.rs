use nalgebra::Vector3;

use particle_integrate::integrator::{self, Method};
use particle_integrate::physics::gravity::{self, MU_EARTH, R_EARTH};
use particle_integrate::types::{AccelerationModel, ButcherTableau, ParticleState, SimConfig};

fn main() {
    println!("=== Circular LEO, 400 km, 3 orbits ===\n");

    let r0 = R_EARTH + 400_000.0;
    let v0 = gravity::circular_speed(MU_EARTH, r0);
    let period = std::f64::consts::TAU * (r0.powi(3) / MU_EARTH).sqrt();
    let initial = ParticleState::new(Vector3::new(r0, 0.0, 0.0), Vector3::new(0.0, v0, 0.0));
    let e0 = gravity::specific_energy(MU_EARTH, &initial.pos, &initial.vel);

    println!("Orbital speed: {v0:.1} m/s");
    println!("Period:        {:.1} min", period / 60.0);
    println!();

    let config = SimConfig { dt: 10.0, max_time: 3.0 * period };
    let accel = |_t: f64, s: &ParticleState| gravity::point_mass(MU_EARTH, 1.0, &s.pos);

    let summary = |name: &str, state: &ParticleState| {
        let alt_err = state.pos.norm() - r0;
        let e = gravity::specific_energy(MU_EARTH, &state.pos, &state.vel);
        println!(
            "  {:<14} radius drift {:>12.3} m   energy drift {:>+10.3e}",
            name,
            alt_err,
            (e - e0) / e0.abs()
        );
    };

    for method in Method::ALL {
        let mut state = initial;
        let mut model = AccelerationModel::new(accel);
        match integrator::propagate(&mut state, &config, method, &mut model, |_, _| {}) {
            Ok(_) => summary(method.name(), &state),
            Err(e) => println!("  {:<14} {e}", method.name()),
        }
    }

    let mut state = initial;
    let tableau = ButcherTableau::three_eighths();
    let mut model = AccelerationModel::new(accel);
    match integrator::propagate_tableau(&mut state, &config, &tableau, &mut model, |_, _| {}) {
        Ok(_) => summary("3/8 rule", &state),
        Err(e) => println!("  {:<14} {e}", "3/8 rule"),
    }

    println!();
    println!("Note: explicit RK methods are not symplectic; energy drifts secularly.");
}
