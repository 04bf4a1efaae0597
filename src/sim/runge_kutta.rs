use nalgebra::SVector;

use crate::dynamics::state::{DeltaState, ParticleState};
use crate::dynamics::StageDerivative;
use crate::sim::tableau::ButcherTableau;

/// One step of the explicit Runge-Kutta method described by `tableau`.
///
/// ```text
/// k_i     = f(t + c_i h, y + h * sum_{j<i} a_ij k_j)
/// y_{n+1} = y + h * sum_i b_i k_i
/// ```
///
/// Stage `i` is evaluated with the samples `k_0..k_{i-1}` only; forming the
/// weighted intermediate state from them is up to `evaluate`. The state is
/// written once, after all `s` stages are in.
pub fn explicit_rk_step<const D: usize, E>(
    state: &mut ParticleState<D>,
    time: f64,
    dt: f64,
    tableau: &ButcherTableau,
    evaluate: &mut E,
) where
    E: StageDerivative<D> + ?Sized,
{
    let s = tableau.stages();
    let mut ks = vec![DeltaState::<D>::zeros(); s];

    for i in 0..s {
        let k = evaluate.evaluate_stage(state, time, dt, &ks[..i], tableau, i);
        log::trace!("stage {i}/{s} at t={}", tableau.stage_time(time, dt, i));
        ks[i] = k;
    }

    let mut delta_pos = SVector::<f64, D>::zeros();
    let mut delta_vel = SVector::<f64, D>::zeros();
    for (b, k) in tableau.b().iter().zip(&ks) {
        delta_pos += *b * k.vel;
        delta_vel += *b * k.accel;
    }

    state.pos += dt * delta_pos;
    state.vel += dt * delta_vel;
}
