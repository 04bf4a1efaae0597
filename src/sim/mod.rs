pub mod integrator;
pub mod runge_kutta;
pub mod runner;
pub mod tableau;

pub use integrator::{euler_step, midpoint_step, ralston_step, rk4_step, Method, ParseMethodError};
pub use runge_kutta::explicit_rk_step;
pub use runner::{propagate, propagate_tableau, RunError};
pub use tableau::{ButcherTableau, TableauError};
