use crate::dynamics::state::{ParticleState, SimConfig};
use crate::dynamics::{Derivative, StageDerivative};
use crate::sim::integrator::Method;
use crate::sim::runge_kutta::explicit_rk_step;
use crate::sim::tableau::ButcherTableau;

// Final step is snapped to `max_time` when the remainder is below this
// fraction of `dt`.
const END_SNAP: f64 = 1e-9;

/// Reasons the fixed-step driver refuses to run or stops early.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RunError {
    #[error("invalid step size {0}: must be finite and positive")]
    InvalidStep(f64),

    #[error("invalid end time {0}: must be finite and non-negative")]
    InvalidDuration(f64),

    #[error("state became non-finite at step {step} (t={time})")]
    NonFinite { step: usize, time: f64 },
}

fn validate(config: &SimConfig) -> Result<(), RunError> {
    if !config.dt.is_finite() || config.dt <= 0.0 {
        return Err(RunError::InvalidStep(config.dt));
    }
    if !config.max_time.is_finite() || config.max_time < 0.0 {
        return Err(RunError::InvalidDuration(config.max_time));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Fixed-step loop
// ---------------------------------------------------------------------------

fn drive<const D: usize>(
    state: &mut ParticleState<D>,
    config: &SimConfig,
    mut step: impl FnMut(&mut ParticleState<D>, f64, f64),
    mut observe: impl FnMut(f64, &ParticleState<D>),
) -> Result<usize, RunError> {
    validate(config)?;

    let end = config.max_time;
    let mut time = 0.0;
    let mut steps = 0;

    while time < end {
        let dt = config.dt.min(end - time);
        step(state, time, dt);
        steps += 1;

        // k * dt instead of a running sum, so long runs don't drift
        let next = steps as f64 * config.dt;
        time = if end - next < config.dt * END_SNAP { end } else { next };

        if !state.is_finite() {
            log::warn!("stopping at step {steps}: non-finite state at t={time}");
            return Err(RunError::NonFinite { step: steps, time });
        }
        observe(time, state);
    }

    log::debug!("propagated {steps} steps to t={time}");
    Ok(steps)
}

/// Advance `state` from t = 0 to `config.max_time` with a fixed-formula method.
///
/// The final step is shortened to land exactly on `max_time`. `observe` is
/// called with the time and state after each step. Returns the number of
/// steps taken.
pub fn propagate<const D: usize, E>(
    state: &mut ParticleState<D>,
    config: &SimConfig,
    method: Method,
    evaluate: &mut E,
    observe: impl FnMut(f64, &ParticleState<D>),
) -> Result<usize, RunError>
where
    E: Derivative<D> + ?Sized,
{
    drive(state, config, |s, t, dt| method.step(s, t, dt, evaluate), observe)
}

/// Same as [`propagate`], stepping with an explicit Runge-Kutta tableau.
pub fn propagate_tableau<const D: usize, E>(
    state: &mut ParticleState<D>,
    config: &SimConfig,
    tableau: &ButcherTableau,
    evaluate: &mut E,
    observe: impl FnMut(f64, &ParticleState<D>),
) -> Result<usize, RunError>
where
    E: StageDerivative<D> + ?Sized,
{
    drive(
        state,
        config,
        |s, t, dt| explicit_rk_step(s, t, dt, tableau, evaluate),
        observe,
    )
}
