use nalgebra::SVector;

/// Linear (Stokes) drag acceleration: `-b * v`.
pub fn linear<const D: usize>(b: f64, vel: &SVector<f64, D>) -> SVector<f64, D> {
    -b * vel
}

/// Quadratic drag acceleration: `-k |v| v`, with `k = rho * cd * area / (2 m)`.
pub fn quadratic<const D: usize>(k: f64, vel: &SVector<f64, D>) -> SVector<f64, D> {
    let speed = vel.norm();
    if speed > 1e-6 {
        -k * speed * vel
    } else {
        SVector::zeros()
    }
}

/// Quadratic drag constant `rho * cd * area / (2 m)`.
pub fn quadratic_coefficient(density: f64, cd: f64, area: f64, mass: f64) -> f64 {
    0.5 * density * cd * area / mass
}
