//! Explicit single-step integrators for point-mass state.
//!
//! Advances `(pos, vel)` through dy/dt = f(t, y) with a caller-supplied
//! derivative callback. Fixed-formula steppers (Euler, Midpoint, Ralston,
//! RK4) live in [`sim::integrator`]; the general Butcher-tableau stepper in
//! [`sim::runge_kutta`].

pub mod dynamics;
pub mod physics;
pub mod sim;

pub mod integrator {
    pub use crate::sim::integrator::{
        euler_step, midpoint_step, ralston_step, rk4_step, Method, ParseMethodError,
    };
    pub use crate::sim::runge_kutta::explicit_rk_step;
    pub use crate::sim::runner::{propagate, propagate_tableau};
}

pub mod types {
    pub use crate::dynamics::state::{DeltaState, ParticleState, SimConfig};
    pub use crate::dynamics::{AccelerationModel, Derivative, StageDerivative};
    pub use crate::sim::integrator::ParseMethodError;
    pub use crate::sim::runner::RunError;
    pub use crate::sim::tableau::{ButcherTableau, TableauError};
}
