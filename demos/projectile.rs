use nalgebra::Vector3;

use particle_integrate::integrator::{self, Method};
use particle_integrate::physics::{drag, gravity};
use particle_integrate::types::{AccelerationModel, ParticleState, SimConfig};

fn main() {
    // 0.5 kg ball, 10 cm^2 cross-section, launched at 45 deg
    let k = drag::quadratic_coefficient(1.225, 0.47, 0.01, 0.5);
    let speed = 40.0;
    let launch = ParticleState::new(
        Vector3::zeros(),
        Vector3::new(speed * 0.5_f64.sqrt(), 0.0, speed * 0.5_f64.sqrt()),
    );
    let config = SimConfig { dt: 0.01, max_time: 10.0 };

    println!("=== Projectile with quadratic drag (k = {k:.5} 1/m) ===\n");

    for method in Method::ALL {
        let mut state = launch;
        let mut model = AccelerationModel::new(|_t: f64, s: &ParticleState| {
            gravity::uniform() + drag::quadratic(k, &s.vel)
        });

        // Track apex and first ground crossing without storing the path
        let mut apex = 0.0_f64;
        let mut landing: Option<(f64, f64)> = None;
        let result = integrator::propagate(&mut state, &config, method, &mut model, |t, s| {
            apex = apex.max(s.pos.z);
            if landing.is_none() && s.pos.z < 0.0 {
                landing = Some((t, s.pos.x));
            }
        });

        match (result, landing) {
            (Ok(_), Some((t, range))) => println!(
                "  {:<9} apex {:>7.3} m   range {:>8.3} m   flight {:>6.2} s",
                method.name(),
                apex,
                range,
                t
            ),
            (Ok(_), None) => {
                println!("  {:<9} still airborne at t = {}", method.name(), config.max_time)
            }
            (Err(e), _) => println!("  {:<9} {e}", method.name()),
        }
    }
}
