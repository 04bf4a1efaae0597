use nalgebra::SVector;

/// Hookean spring anchored at the origin: `-(k/m) * x`.
pub fn hooke<const D: usize>(stiffness_per_mass: f64, pos: &SVector<f64, D>) -> SVector<f64, D> {
    -stiffness_per_mass * pos
}

/// Closed-form undamped oscillator, `omega = sqrt(k/m)`.
/// Returns `(x(t), v(t))` for initial `(x0, v0)`.
pub fn exact<const D: usize>(
    omega: f64,
    x0: &SVector<f64, D>,
    v0: &SVector<f64, D>,
    t: f64,
) -> (SVector<f64, D>, SVector<f64, D>) {
    let (s, c) = (omega * t).sin_cos();
    let x = x0 * c + v0 * (s / omega);
    let v = -x0 * (omega * s) + v0 * c;
    (x, v)
}

/// Mechanical energy per unit mass, `(v^2 + omega^2 x^2) / 2`.
pub fn energy<const D: usize>(omega: f64, pos: &SVector<f64, D>, vel: &SVector<f64, D>) -> f64 {
    0.5 * (vel.norm_squared() + omega * omega * pos.norm_squared())
}
