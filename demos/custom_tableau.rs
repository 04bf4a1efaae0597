use nalgebra::Vector2;

use particle_integrate::integrator;
use particle_integrate::physics::spring;
use particle_integrate::types::{
    ButcherTableau, DeltaState, ParticleState, SimConfig, TableauError,
};

/// Counts evaluations while applying the tableau's `a` row itself.
struct CountingSpring {
    omega2: f64,
    calls: usize,
}

impl particle_integrate::types::StageDerivative<2> for CountingSpring {
    fn evaluate_stage(
        &mut self,
        state: &ParticleState<2>,
        _time: f64,
        dt: f64,
        stages: &[DeltaState<2>],
        tableau: &ButcherTableau,
        stage: usize,
    ) -> DeltaState<2> {
        self.calls += 1;
        let p = tableau.stage_state(state, dt, stages, stage);
        DeltaState::new(p.vel, spring::hooke(self.omega2, &p.pos))
    }
}

fn main() -> Result<(), TableauError> {
    // Ralston's third-order method
    let ralston3 = ButcherTableau::from_rows(
        &[
            &[0.0, 0.0, 0.0],
            &[0.5, 0.0, 0.0],
            &[0.0, 0.75, 0.0],
        ],
        &[2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
        &[0.0, 0.5, 0.75],
    )?;

    let omega = 1.0;
    let x0 = Vector2::new(1.0, 0.0);
    let v0 = Vector2::new(0.0, 1.0);
    let config = SimConfig { dt: 0.05, max_time: 10.0 };
    let (x_exact, _) = spring::exact(omega, &x0, &v0, config.max_time);

    let mut eval = CountingSpring { omega2: omega * omega, calls: 0 };
    let mut state = ParticleState::new(x0, v0);
    match integrator::propagate_tableau(&mut state, &config, &ralston3, &mut eval, |_, _| {}) {
        Ok(steps) => println!(
            "Ralston-3: {} stages, {} steps, {} evaluations, pos error {:.3e}",
            ralston3.stages(),
            steps,
            eval.calls,
            (state.pos - x_exact).norm()
        ),
        Err(e) => println!("Ralston-3: {e}"),
    }

    // A diagonal entry makes the method implicit; construction refuses it
    let implicit = ButcherTableau::from_rows(&[&[0.5]], &[1.0], &[0.5]);
    match implicit {
        Ok(_) => println!("unexpectedly accepted an implicit tableau"),
        Err(e) => println!("Rejected: {e}"),
    }

    Ok(())
}
