use nalgebra::{SVector, Vector3};

pub const G0: f64 = 9.80665;                 // m/s^2, standard gravity
pub const MU_EARTH: f64 = 3.986_004_418e14;  // m^3/s^2
pub const R_EARTH: f64 = 6_378_137.0;        // equatorial radius, m

/// Uniform gravity along -Z (flat-earth projectile frame).
pub fn uniform() -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -G0)
}

/// Point-mass central gravity `-mu * r / |r|^3`, any dimension.
///
/// Returns zero when `|r| < cutoff`. `cutoff` is in the caller's length
/// unit (e.g. 1.0 for metres, something tiny for normalized units).
pub fn point_mass<const D: usize>(mu: f64, cutoff: f64, pos: &SVector<f64, D>) -> SVector<f64, D> {
    let r = pos.norm();
    if r < cutoff {
        return SVector::zeros();
    }
    -mu / (r * r * r) * pos
}

/// Speed of a circular orbit of radius `r`.
pub fn circular_speed(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}

/// Specific orbital energy `v^2 / 2 - mu / r`, conserved by the exact flow.
pub fn specific_energy<const D: usize>(
    mu: f64,
    pos: &SVector<f64, D>,
    vel: &SVector<f64, D>,
) -> f64 {
    0.5 * vel.norm_squared() - mu / pos.norm()
}
