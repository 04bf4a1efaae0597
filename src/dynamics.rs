pub mod state;

use nalgebra::SVector;

use crate::sim::tableau::ButcherTableau;
use state::{DeltaState, ParticleState};

// ---------------------------------------------------------------------------
// Derivative evaluation contracts
// ---------------------------------------------------------------------------

/// Derivative callback for the fixed-formula steppers.
///
/// Receives the state at the start of the step, the absolute step time, a
/// sub-step offset and the single prior stage sample. The implementation is
/// responsible for building the intermediate point implied by
/// `(offset, prior)` and returning dy/dt there. It must not depend on hidden
/// state that changes between stages, or the closed-form weights of the
/// steppers no longer hold.
pub trait Derivative<const D: usize> {
    fn evaluate(
        &mut self,
        state: &ParticleState<D>,
        time: f64,
        offset: f64,
        prior: &DeltaState<D>,
    ) -> DeltaState<D>;
}

impl<F, const D: usize> Derivative<D> for F
where
    F: FnMut(&ParticleState<D>, f64, f64, &DeltaState<D>) -> DeltaState<D>,
{
    fn evaluate(
        &mut self,
        state: &ParticleState<D>,
        time: f64,
        offset: f64,
        prior: &DeltaState<D>,
    ) -> DeltaState<D> {
        self(state, time, offset, prior)
    }
}

/// Derivative callback for the tableau-driven stepper.
///
/// `stages` holds the samples already computed for this step, so
/// `stages.len() == stage` on every call. The implementation combines them
/// with the tableau's `a` row for `stage` (see [`ButcherTableau::stage_state`]).
pub trait StageDerivative<const D: usize> {
    fn evaluate_stage(
        &mut self,
        state: &ParticleState<D>,
        time: f64,
        dt: f64,
        stages: &[DeltaState<D>],
        tableau: &ButcherTableau,
        stage: usize,
    ) -> DeltaState<D>;
}

impl<F, const D: usize> StageDerivative<D> for F
where
    F: FnMut(
        &ParticleState<D>,
        f64,
        f64,
        &[DeltaState<D>],
        &ButcherTableau,
        usize,
    ) -> DeltaState<D>,
{
    fn evaluate_stage(
        &mut self,
        state: &ParticleState<D>,
        time: f64,
        dt: f64,
        stages: &[DeltaState<D>],
        tableau: &ButcherTableau,
        stage: usize,
    ) -> DeltaState<D> {
        self(state, time, dt, stages, tableau, stage)
    }
}

// ---------------------------------------------------------------------------
// Equations of motion from an acceleration field
// ---------------------------------------------------------------------------

/// Point-mass equations of motion: d(pos)/dt = vel, d(vel)/dt = accel(t, state).
///
/// Implements both callback shapes, so one force model can drive every
/// stepper in the crate.
#[derive(Debug, Clone, Copy)]
pub struct AccelerationModel<F>(pub F);

impl<F> AccelerationModel<F> {
    pub fn new(accel: F) -> Self {
        Self(accel)
    }
}

impl<F, const D: usize> Derivative<D> for AccelerationModel<F>
where
    F: FnMut(f64, &ParticleState<D>) -> SVector<f64, D>,
{
    fn evaluate(
        &mut self,
        state: &ParticleState<D>,
        time: f64,
        offset: f64,
        prior: &DeltaState<D>,
    ) -> DeltaState<D> {
        let point = state.apply(prior, offset);
        let accel = (self.0)(time + offset, &point);
        DeltaState::new(point.vel, accel)
    }
}

impl<F, const D: usize> StageDerivative<D> for AccelerationModel<F>
where
    F: FnMut(f64, &ParticleState<D>) -> SVector<f64, D>,
{
    fn evaluate_stage(
        &mut self,
        state: &ParticleState<D>,
        time: f64,
        dt: f64,
        stages: &[DeltaState<D>],
        tableau: &ButcherTableau,
        stage: usize,
    ) -> DeltaState<D> {
        let point = tableau.stage_state(state, dt, stages, stage);
        let accel = (self.0)(tableau.stage_time(time, dt, stage), &point);
        DeltaState::new(point.vel, accel)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
