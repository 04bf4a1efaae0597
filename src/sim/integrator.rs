use std::fmt;
use std::str::FromStr;

use crate::dynamics::state::{DeltaState, ParticleState};
use crate::dynamics::Derivative;

// ---------------------------------------------------------------------------
// Fixed-formula explicit steppers
// ---------------------------------------------------------------------------
//
// Each stepper advances `state` in place by `dt`. Position and velocity are
// written once, after every stage sample for the step has been computed.
// None of them check for non-finite values; that is the driver's job.

/// Forward Euler: one evaluation at the start of the step.
pub fn euler_step<const D: usize, E>(
    state: &mut ParticleState<D>,
    time: f64,
    dt: f64,
    evaluate: &mut E,
) where
    E: Derivative<D> + ?Sized,
{
    let k1 = evaluate.evaluate(state, time, 0.0, &DeltaState::zeros());

    state.pos += dt * k1.vel;
    state.vel += dt * k1.accel;
}

/// Single-evaluation midpoint variant.
///
/// Not the textbook two-evaluation midpoint rule. The derivative is sampled
/// once at offset `dt / 2` with no prior sample, then position is advanced
/// with `k1.vel * (1 + dt / 2)` and velocity with `k1.accel * 1.5`. For
/// y' = y the position update equals the second-order Taylor step, but the
/// velocity update does not. Use `ButcherTableau::midpoint` with
/// [`explicit_rk_step`](super::runge_kutta::explicit_rk_step) for the
/// textbook method.
pub fn midpoint_step<const D: usize, E>(
    state: &mut ParticleState<D>,
    time: f64,
    dt: f64,
    evaluate: &mut E,
) where
    E: Derivative<D> + ?Sized,
{
    let k1 = evaluate.evaluate(state, time, 0.5 * dt, &DeltaState::zeros());

    state.pos += dt * (k1.vel + (dt / 2.0) * k1.vel);
    state.vel += dt * (k1.accel * 1.5);
}

/// Ralston's two-stage second-order method (b = 1/4, 3/4).
pub fn ralston_step<const D: usize, E>(
    state: &mut ParticleState<D>,
    time: f64,
    dt: f64,
    evaluate: &mut E,
) where
    E: Derivative<D> + ?Sized,
{
    let k1 = evaluate.evaluate(state, time, 0.0, &DeltaState::zeros());
    let k2 = evaluate.evaluate(state, time, (2.0 / 3.0) * dt, &k1);

    state.pos += dt * (0.25 * k1.vel + 0.75 * k2.vel);
    state.vel += dt * (0.25 * k1.accel + 0.75 * k2.accel);
}

/// Classical 4th-order Runge-Kutta.
pub fn rk4_step<const D: usize, E>(
    state: &mut ParticleState<D>,
    time: f64,
    dt: f64,
    evaluate: &mut E,
) where
    E: Derivative<D> + ?Sized,
{
    let k1 = evaluate.evaluate(state, time, 0.0, &DeltaState::zeros());
    let k2 = evaluate.evaluate(state, time, 0.5 * dt, &k1);
    let k3 = evaluate.evaluate(state, time, 0.5 * dt, &k2);
    let k4 = evaluate.evaluate(state, time, dt, &k3);

    state.pos += (dt / 6.0) * (k1.vel + 2.0 * (k2.vel + k3.vel) + k4.vel);
    state.vel += (dt / 6.0) * (k1.accel + 2.0 * (k2.accel + k3.accel) + k4.accel);
}

// ---------------------------------------------------------------------------
// Method selection
// ---------------------------------------------------------------------------

/// Fixed-formula stepper chosen by the caller for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Euler,
    Midpoint,
    Ralston,
    Rk4,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Euler, Method::Midpoint, Method::Ralston, Method::Rk4];

    pub fn name(self) -> &'static str {
        match self {
            Method::Euler => "euler",
            Method::Midpoint => "midpoint",
            Method::Ralston => "ralston",
            Method::Rk4 => "rk4",
        }
    }

    /// Derivative evaluations per step.
    pub fn evaluations(self) -> usize {
        match self {
            Method::Euler | Method::Midpoint => 1,
            Method::Ralston => 2,
            Method::Rk4 => 4,
        }
    }

    /// Global order of accuracy for general point-mass dynamics.
    ///
    /// `None` for the midpoint variant: its velocity update
    /// `vel += 1.5 * dt * accel` does not converge as `dt -> 0`, and its
    /// position update is only first order.
    pub fn order(self) -> Option<usize> {
        match self {
            Method::Euler => Some(1),
            Method::Midpoint => None,
            Method::Ralston => Some(2),
            Method::Rk4 => Some(4),
        }
    }

    pub fn step<const D: usize, E>(
        self,
        state: &mut ParticleState<D>,
        time: f64,
        dt: f64,
        evaluate: &mut E,
    ) where
        E: Derivative<D> + ?Sized,
    {
        match self {
            Method::Euler => euler_step(state, time, dt, evaluate),
            Method::Midpoint => midpoint_step(state, time, dt, evaluate),
            Method::Ralston => ralston_step(state, time, dt, evaluate),
            Method::Rk4 => rk4_step(state, time, dt, evaluate),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown integration method `{0}` (expected euler, midpoint, ralston or rk4)")]
pub struct ParseMethodError(String);

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Method::ALL
            .into_iter()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| ParseMethodError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::AccelerationModel;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::{Vector1, Vector3};

    /// y' = y in both components: d(pos)/dt = pos, d(vel)/dt = vel.
    fn growth(s: &ParticleState<1>, _t: f64, offset: f64, prior: &DeltaState<1>) -> DeltaState<1> {
        let p = s.apply(prior, offset);
        DeltaState::new(p.pos, p.vel)
    }

    fn unit() -> ParticleState<1> {
        ParticleState::new(Vector1::new(1.0), Vector1::new(1.0))
    }

    /// Integrate y' = y from y(0) = 1 to t = 1 and return |e - y(1)|.
    fn growth_error(method: Method, dt: f64) -> f64 {
        let steps = (1.0 / dt).round() as usize;
        let mut state = unit();
        for k in 0..steps {
            method.step(&mut state, k as f64 * dt, dt, &mut growth);
        }
        (std::f64::consts::E - state.pos.x).abs()
    }

    #[test]
    fn euler_matches_hand_computed_sequence() {
        let expected = [1.5, 2.25, 3.375, 5.0625, 7.5938, 11.3906, 17.0859, 25.6289];
        let mut state = unit();
        for (n, want) in expected.iter().enumerate() {
            euler_step(&mut state, n as f64 * 0.5, 0.5, &mut growth);
            assert_abs_diff_eq!(state.pos.x, *want, epsilon = 1e-3);
            assert_abs_diff_eq!(state.vel.x, *want, epsilon = 1e-3);
        }
        assert_relative_eq!(state.pos.x, 25.628_906_25, epsilon = 1e-12);
    }

    #[test]
    fn midpoint_position_matches_hand_computed_sequence() {
        let expected = [1.625, 2.6406, 4.2910, 6.9729, 11.3310, 18.4128, 29.9208, 48.6213];
        let mut state = unit();
        for (n, want) in expected.iter().enumerate() {
            midpoint_step(&mut state, n as f64 * 0.5, 0.5, &mut growth);
            assert_abs_diff_eq!(state.pos.x, *want, epsilon = 1e-3);
        }
    }

    #[test]
    fn midpoint_velocity_uses_fixed_weight() {
        // vel += dt * 1.5 * accel, not the Taylor factor (1 + dt/2)
        let mut state = unit();
        midpoint_step(&mut state, 0.0, 0.5, &mut growth);
        assert_relative_eq!(state.pos.x, 1.625);
        assert_relative_eq!(state.vel.x, 1.75);
    }

    #[test]
    fn midpoint_samples_half_step() {
        let mut offsets = Vec::new();
        let mut eval = |s: &ParticleState<1>, t: f64, off: f64, prior: &DeltaState<1>| {
            offsets.push(off);
            growth(s, t, off, prior)
        };
        midpoint_step(&mut unit(), 0.0, 0.4, &mut eval);
        assert_eq!(offsets, vec![0.2]);
    }

    #[test]
    fn ralston_single_step() {
        // k1 = 1, k2 = 1 + (2/3)(0.5) = 4/3, y1 = 1 + 0.5 (0.25 + 1) = 1.625
        let mut state = unit();
        ralston_step(&mut state, 0.0, 0.5, &mut growth);
        assert_relative_eq!(state.pos.x, 1.625, epsilon = 1e-12);
        assert_relative_eq!(state.vel.x, 1.625, epsilon = 1e-12);
    }

    #[test]
    fn rk4_single_step_matches_taylor_polynomial() {
        let h: f64 = 0.5;
        let taylor = 1.0 + h + h * h / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        let mut state = unit();
        rk4_step(&mut state, 0.0, h, &mut growth);
        assert_relative_eq!(state.pos.x, taylor, epsilon = 1e-12);
        assert_relative_eq!(state.vel.x, taylor, epsilon = 1e-12);
    }

    #[test]
    fn rk4_calls_stages_in_order() {
        let mut offsets = Vec::new();
        let mut eval = |s: &ParticleState<1>, t: f64, off: f64, prior: &DeltaState<1>| {
            offsets.push(off);
            growth(s, t, off, prior)
        };
        rk4_step(&mut unit(), 0.0, 0.2, &mut eval);
        assert_eq!(offsets, vec![0.0, 0.1, 0.1, 0.2]);
    }

    #[test]
    fn rk4_converges_fourth_order() {
        let ratio = growth_error(Method::Rk4, 0.05) / growth_error(Method::Rk4, 0.025);
        assert!(ratio > 15.0 && ratio < 17.0, "RK4 error ratio {ratio}");
    }

    #[test]
    fn euler_converges_first_order() {
        let ratio = growth_error(Method::Euler, 0.01) / growth_error(Method::Euler, 0.005);
        assert!(ratio > 1.9 && ratio < 2.1, "Euler error ratio {ratio}");
    }

    #[test]
    fn ralston_converges_second_order() {
        let ratio = growth_error(Method::Ralston, 0.02) / growth_error(Method::Ralston, 0.01);
        assert!(ratio > 3.8 && ratio < 4.2, "Ralston error ratio {ratio}");
    }

    #[test]
    fn zero_step_leaves_state_unchanged() {
        let start = ParticleState::new(Vector3::new(1.0, -2.0, 3.0), Vector3::new(0.5, 0.0, -4.0));
        let mut model = AccelerationModel::new(|_t: f64, s: &ParticleState| -4.0 * s.pos);
        for method in Method::ALL {
            let mut state = start;
            method.step(&mut state, 7.0, 0.0, &mut model);
            assert_eq!(state, start, "{method} moved the state with dt = 0");
        }
    }

    #[test]
    fn constant_acceleration_exact_for_rk4() {
        // Projectile: pos(t) = v0 t + g t^2 / 2
        let g = Vector3::new(0.0, 0.0, -9.80665);
        let mut model = AccelerationModel::new(move |_t: f64, _s: &ParticleState| g);
        let mut state = ParticleState::new(Vector3::zeros(), Vector3::new(10.0, 0.0, 20.0));
        rk4_step(&mut state, 0.0, 2.0, &mut model);
        let pos = Vector3::new(20.0, 0.0, 40.0 - 2.0 * 9.80665);
        let vel = Vector3::new(10.0, 0.0, 20.0 - 2.0 * 9.80665);
        assert_relative_eq!(state.pos, pos, epsilon = 1e-12);
        assert_relative_eq!(state.vel, vel, epsilon = 1e-12);
    }

    #[test]
    fn time_argument_reaches_evaluator() {
        let mut seen = Vec::new();
        let mut eval = |s: &ParticleState<1>, t: f64, off: f64, prior: &DeltaState<1>| {
            seen.push(t + off);
            growth(s, t, off, prior)
        };
        let time = 3.0;
        ralston_step(&mut unit(), time, 0.3, &mut eval);
        assert_eq!(time, 3.0);
        assert_relative_eq!(seen[0], 3.0);
        assert_relative_eq!(seen[1], 3.2, epsilon = 1e-12);
    }

    #[test]
    fn method_metadata() {
        assert_eq!(Method::ALL.iter().map(|m| m.evaluations()).sum::<usize>(), 8);
        assert_eq!(Method::Euler.order(), Some(1));
        assert_eq!(Method::Midpoint.order(), None);
        assert_eq!(Method::Ralston.order(), Some(2));
        assert_eq!(Method::Rk4.order(), Some(4));
        assert_eq!(Method::Midpoint.to_string(), "midpoint");
    }

    /// Integrate to t = 1 under constant `accel` from `(x0, v0)` and return
    /// the final (position error, velocity error) against the exact motion.
    fn midpoint_kinematic_error(dt: f64, x0: f64, v0: f64, accel: f64) -> (f64, f64) {
        let mut model = AccelerationModel::new(move |_t: f64, _s: &ParticleState<1>| {
            Vector1::new(accel)
        });
        let mut state = ParticleState::new(Vector1::new(x0), Vector1::new(v0));
        let steps = (1.0 / dt).round() as usize;
        for k in 0..steps {
            midpoint_step(&mut state, k as f64 * dt, dt, &mut model);
        }
        let x_exact = x0 + v0 + 0.5 * accel;
        let v_exact = v0 + accel;
        ((state.pos.x - x_exact).abs(), (state.vel.x - v_exact).abs())
    }

    #[test]
    fn midpoint_velocity_does_not_converge() {
        // Constant accel = 1 from rest: v(1) = 1.5 for every dt
        for dt in [0.1, 0.05, 0.025] {
            let (_, vel_err) = midpoint_kinematic_error(dt, 0.0, 0.0, 1.0);
            assert_abs_diff_eq!(vel_err, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn midpoint_position_is_first_order() {
        // Constant velocity: x(1) = 1 + dt / 2, error halves with dt
        let errors: Vec<f64> = [0.1, 0.05, 0.025]
            .iter()
            .map(|dt| midpoint_kinematic_error(*dt, 0.0, 1.0, 0.0).0)
            .collect();
        assert_abs_diff_eq!(errors[0], 0.05, epsilon = 1e-9);
        assert_abs_diff_eq!(errors[1], 0.025, epsilon = 1e-9);
        assert_abs_diff_eq!(errors[2], 0.0125, epsilon = 1e-9);
    }

    #[test]
    fn parse_method_names() {
        assert_eq!("rk4".parse::<Method>(), Ok(Method::Rk4));
        assert_eq!(" Euler ".parse::<Method>(), Ok(Method::Euler));
        assert_eq!("RALSTON".parse::<Method>(), Ok(Method::Ralston));
        let err = "leapfrog".parse::<Method>().unwrap_err();
        assert!(err.to_string().contains("leapfrog"));
    }
}
