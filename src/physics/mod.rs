//! Example acceleration fields for driving the integrators.
//!
//! Each function maps a particle state (or part of it) to an acceleration,
//! ready to be wrapped in [`AccelerationModel`](crate::dynamics::AccelerationModel).

pub mod drag;
pub mod gravity;
pub mod spring;
