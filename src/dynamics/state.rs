use nalgebra::SVector;

// ---------------------------------------------------------------------------
// Particle state: position and velocity
// ---------------------------------------------------------------------------

/// Position and velocity of a point mass in `D` dimensions.
///
/// `D = 1` is a scalar state, handy for checking methods against y' = y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleState<const D: usize = 3> {
    pub pos: SVector<f64, D>, // m
    pub vel: SVector<f64, D>, // m/s
}

impl<const D: usize> ParticleState<D> {
    pub fn new(pos: SVector<f64, D>, vel: SVector<f64, D>) -> Self {
        Self { pos, vel }
    }

    /// Euler-extrapolated state: `pos + d.vel * dt`, `vel + d.accel * dt`.
    pub fn apply(&self, d: &DeltaState<D>, dt: f64) -> Self {
        Self {
            pos: self.pos + d.vel * dt,
            vel: self.vel + d.accel * dt,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().chain(self.vel.iter()).all(|x| x.is_finite())
    }
}

impl<const D: usize> Default for ParticleState<D> {
    fn default() -> Self {
        Self {
            pos: SVector::zeros(),
            vel: SVector::zeros(),
        }
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

/// One derivative sample dy/dt: rate of change of position and velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaState<const D: usize = 3> {
    pub vel: SVector<f64, D>,   // d(pos)/dt
    pub accel: SVector<f64, D>, // d(vel)/dt
}

impl<const D: usize> DeltaState<D> {
    pub fn new(vel: SVector<f64, D>, accel: SVector<f64, D>) -> Self {
        Self { vel, accel }
    }

    pub fn zeros() -> Self {
        Self {
            vel: SVector::zeros(),
            accel: SVector::zeros(),
        }
    }
}

impl<const D: usize> Default for DeltaState<D> {
    fn default() -> Self {
        Self::zeros()
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub dt: f64,
    pub max_time: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,        // 100 Hz
            max_time: 10.0,  // s
        }
    }
}
