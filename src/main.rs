use std::process;

use nalgebra::{Vector1, Vector3};

use particle_integrate::integrator;
use particle_integrate::physics::spring;
use particle_integrate::types::{
    AccelerationModel, ButcherTableau, DeltaState, ParticleState, SimConfig,
};

/// y' = y on the scalar harness: d(pos)/dt = pos, d(vel)/dt = vel.
fn growth(s: &ParticleState<1>, _t: f64, offset: f64, prior: &DeltaState<1>) -> DeltaState<1> {
    let p = s.apply(prior, offset);
    DeltaState::new(p.pos, p.vel)
}

fn growth_stage(
    s: &ParticleState<1>,
    _t: f64,
    dt: f64,
    stages: &[DeltaState<1>],
    tableau: &ButcherTableau,
    i: usize,
) -> DeltaState<1> {
    let p = tableau.stage_state(s, dt, stages, i);
    DeltaState::new(p.pos, p.vel)
}

fn main() {
    // -----------------------------------------------------------------------
    // Arguments: [dt] [method]
    // -----------------------------------------------------------------------
    let args: Vec<String> = std::env::args().skip(1).collect();
    let dt = match args.first().map(|s| s.parse::<f64>()) {
        None => 0.5,
        Some(Ok(dt)) => dt,
        Some(Err(e)) => {
            eprintln!("error: step size `{}`: {e}", args[0]);
            process::exit(2);
        }
    };
    let methods = match args.get(1).map(|s| s.parse::<integrator::Method>()) {
        None => integrator::Method::ALL.to_vec(),
        Some(Ok(m)) => vec![m],
        Some(Err(e)) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    };

    let tableaus = [
        ("heun", ButcherTableau::heun()),
        ("kutta3", ButcherTableau::kutta3()),
        ("rk4 (tableau)", ButcherTableau::rk4()),
        ("3/8 rule", ButcherTableau::three_eighths()),
    ];

    println!();
    println!("====================================================================");
    println!("  EXPLICIT INTEGRATOR COMPARISON — dt = {dt}");
    println!("====================================================================");
    println!();

    // -----------------------------------------------------------------------
    // Exponential growth y' = y, y(0) = 1, to t = 4
    // -----------------------------------------------------------------------
    let growth_config = SimConfig { dt, max_time: 4.0 };
    let exact = growth_config.max_time.exp();

    println!("  y' = y, y(0) = 1, t = 0..4   (exact y(4) = {exact:.5})");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:<14}  {:>5}  {:>12}  {:>12}  {:>10}",
        "method", "evals", "y(4)", "abs error", "steps"
    );
    println!("  {}", "─".repeat(60));

    for method in &methods {
        let mut state = ParticleState::new(Vector1::new(1.0), Vector1::new(1.0));
        match integrator::propagate(&mut state, &growth_config, *method, &mut growth, |_, _| {}) {
            Ok(steps) => println!(
                "  {:<14}  {:>5}  {:>12.5}  {:>12.3e}  {:>10}",
                method.name(),
                method.evaluations(),
                state.pos.x,
                (state.pos.x - exact).abs(),
                steps
            ),
            Err(e) => println!("  {:<14}  {e}", method.name()),
        }
    }
    for (name, tableau) in &tableaus {
        let mut state = ParticleState::new(Vector1::new(1.0), Vector1::new(1.0));
        let result = integrator::propagate_tableau(
            &mut state,
            &growth_config,
            tableau,
            &mut growth_stage,
            |_, _| {},
        );
        match result {
            Ok(steps) => println!(
                "  {:<14}  {:>5}  {:>12.5}  {:>12.3e}  {:>10}",
                name,
                tableau.stages(),
                state.pos.x,
                (state.pos.x - exact).abs(),
                steps
            ),
            Err(e) => println!("  {name:<14}  {e}"),
        }
    }
    println!();

    // -----------------------------------------------------------------------
    // Harmonic oscillator, omega = 2, ten periods
    // -----------------------------------------------------------------------
    let omega: f64 = 2.0;
    let period = std::f64::consts::TAU / omega;
    let osc_config = SimConfig {
        dt: dt.min(period / 20.0),
        max_time: 10.0 * period,
    };
    let x0 = Vector3::new(1.0, 0.0, 0.0);
    let v0 = Vector3::new(0.0, omega, 0.0);
    let e0 = spring::energy(omega, &x0, &v0);
    let (x_exact, _) = spring::exact(omega, &x0, &v0, osc_config.max_time);
    let accel = move |_t: f64, s: &ParticleState| spring::hooke(omega * omega, &s.pos);

    println!(
        "  Harmonic oscillator, omega = {omega}, 10 periods, dt = {:.4}",
        osc_config.dt
    );
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  {:<14}  {:>14}  {:>14}", "method", "pos error", "energy drift");
    println!("  {}", "─".repeat(48));

    let report = |name: &str, state: &ParticleState| {
        let drift = (spring::energy(omega, &state.pos, &state.vel) - e0) / e0;
        println!(
            "  {:<14}  {:>14.3e}  {:>+14.3e}",
            name,
            (state.pos - x_exact).norm(),
            drift
        );
    };

    for method in &methods {
        let mut state = ParticleState::new(x0, v0);
        let mut model = AccelerationModel::new(accel);
        match integrator::propagate(&mut state, &osc_config, *method, &mut model, |_, _| {}) {
            Ok(_) => report(method.name(), &state),
            Err(e) => println!("  {:<14}  {e}", method.name()),
        }
    }
    for (name, tableau) in &tableaus {
        let mut state = ParticleState::new(x0, v0);
        let mut model = AccelerationModel::new(accel);
        let result =
            integrator::propagate_tableau(&mut state, &osc_config, tableau, &mut model, |_, _| {});
        match result {
            Ok(_) => report(*name, &state),
            Err(e) => println!("  {name:<14}  {e}"),
        }
    }

    println!();
    println!("  Note: `midpoint` is the single-evaluation variant; its velocity");
    println!("  update is not second order. The textbook rule is ButcherTableau::midpoint.");
    println!("====================================================================");
    println!();
}
