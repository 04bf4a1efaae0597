use nalgebra::{DMatrix, DVector, SVector};

use crate::dynamics::state::{DeltaState, ParticleState};

const SOFT_CHECK_TOL: f64 = 1e-12;

/// Errors raised while building a [`ButcherTableau`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableauError {
    #[error("tableau has no stages")]
    Empty,

    #[error("dimension mismatch: b has {b} entries, c has {c}, a is {rows}x{cols}")]
    DimensionMismatch {
        b: usize,
        c: usize,
        rows: usize,
        cols: usize,
    },

    #[error("row {row} of a has {found} entries, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("not explicit: a[{row}][{col}] = {value} must be zero on or above the diagonal")]
    NotExplicit { row: usize, col: usize, value: f64 },

    #[error("non-finite coefficient in {name}[{index}]")]
    NonFinite { name: &'static str, index: usize },
}

// ---------------------------------------------------------------------------
// Butcher tableau
// ---------------------------------------------------------------------------

/// Coefficients (a, b, c) of an explicit Runge-Kutta method.
///
/// ```text
/// c_0 |
/// c_1 | a_10
/// c_2 | a_20 a_21
///  .. | ..
/// ----+----------------
///     | b_0  b_1  .. b_s
/// ```
///
/// Immutable once built. The constructors reject tableaus that are empty,
/// inconsistently sized, non-finite, or have a nonzero entry on or above the
/// diagonal of `a`.
#[derive(Debug, Clone, PartialEq)]
pub struct ButcherTableau {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
}

impl ButcherTableau {
    /// Validate and build a tableau from nalgebra storage.
    pub fn new(a: DMatrix<f64>, b: DVector<f64>, c: DVector<f64>) -> Result<Self, TableauError> {
        let s = b.len();
        if s == 0 {
            return Err(TableauError::Empty);
        }
        if c.len() != s || a.nrows() != s || a.ncols() != s {
            return Err(TableauError::DimensionMismatch {
                b: s,
                c: c.len(),
                rows: a.nrows(),
                cols: a.ncols(),
            });
        }

        if let Some(index) = b.iter().position(|x| !x.is_finite()) {
            return Err(TableauError::NonFinite { name: "b", index });
        }
        if let Some(index) = c.iter().position(|x| !x.is_finite()) {
            return Err(TableauError::NonFinite { name: "c", index });
        }
        for row in 0..s {
            for col in 0..s {
                let value = a[(row, col)];
                if !value.is_finite() {
                    return Err(TableauError::NonFinite {
                        name: "a",
                        index: row * s + col,
                    });
                }
                if col >= row && value != 0.0 {
                    return Err(TableauError::NotExplicit { row, col, value });
                }
            }
        }

        let tableau = Self { a, b, c };
        tableau.soft_checks();
        log::debug!("built explicit tableau with {s} stages");
        Ok(tableau)
    }

    /// Build a tableau from row slices. Each row of `a` must hold `b.len()`
    /// entries, zeros included.
    pub fn from_rows(a: &[&[f64]], b: &[f64], c: &[f64]) -> Result<Self, TableauError> {
        let s = b.len();
        if let Some((row, r)) = a.iter().enumerate().find(|(_, r)| r.len() != s) {
            return Err(TableauError::RowLength {
                row,
                expected: s,
                found: r.len(),
            });
        }
        let flat: Vec<f64> = a.iter().flat_map(|r| r.iter().copied()).collect();
        let matrix = DMatrix::from_row_slice(a.len(), s, &flat);
        Self::new(matrix, DVector::from_column_slice(b), DVector::from_column_slice(c))
    }

    // Presets are known-valid, so they skip validation.
    fn preset(s: usize, a: &[f64], b: &[f64], c: &[f64]) -> Self {
        Self {
            a: DMatrix::from_row_slice(s, s, a),
            b: DVector::from_column_slice(b),
            c: DVector::from_column_slice(c),
        }
    }

    /// Forward Euler, 1 stage.
    pub fn euler() -> Self {
        Self::preset(1, &[0.0], &[1.0], &[0.0])
    }

    /// Explicit (textbook) midpoint, 2 stages.
    pub fn midpoint() -> Self {
        Self::preset(2, &[0.0, 0.0, 0.5, 0.0], &[0.0, 1.0], &[0.0, 0.5])
    }

    /// Heun's method (explicit trapezoid), 2 stages.
    pub fn heun() -> Self {
        Self::preset(2, &[0.0, 0.0, 1.0, 0.0], &[0.5, 0.5], &[0.0, 1.0])
    }

    /// Ralston's minimum-error second-order method, 2 stages.
    pub fn ralston() -> Self {
        Self::preset(
            2,
            &[0.0, 0.0, 2.0 / 3.0, 0.0],
            &[0.25, 0.75],
            &[0.0, 2.0 / 3.0],
        )
    }

    /// Kutta's third-order method, 3 stages.
    pub fn kutta3() -> Self {
        #[rustfmt::skip]
        let a = [
            0.0,  0.0, 0.0,
            0.5,  0.0, 0.0,
            -1.0, 2.0, 0.0,
        ];
        Self::preset(3, &a, &[1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0], &[0.0, 0.5, 1.0])
    }

    /// Classical fourth-order Runge-Kutta, 4 stages.
    pub fn rk4() -> Self {
        #[rustfmt::skip]
        let a = [
            0.0, 0.0, 0.0, 0.0,
            0.5, 0.0, 0.0, 0.0,
            0.0, 0.5, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        ];
        Self::preset(
            4,
            &a,
            &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
            &[0.0, 0.5, 0.5, 1.0],
        )
    }

    /// Kutta's 3/8-rule fourth-order method, 4 stages.
    pub fn three_eighths() -> Self {
        #[rustfmt::skip]
        let a = [
            0.0,        0.0,  0.0, 0.0,
            1.0 / 3.0,  0.0,  0.0, 0.0,
            -1.0 / 3.0, 1.0,  0.0, 0.0,
            1.0,        -1.0, 1.0, 0.0,
        ];
        Self::preset(
            4,
            &a,
            &[0.125, 0.375, 0.375, 0.125],
            &[0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0],
        )
    }

    fn soft_checks(&self) {
        for i in 0..self.stages() {
            let row_sum: f64 = self.a.row(i).sum();
            if (row_sum - self.c[i]).abs() > SOFT_CHECK_TOL {
                log::warn!(
                    "tableau row {i}: sum of a = {row_sum} differs from c = {}",
                    self.c[i]
                );
            }
        }
        let total = self.weight_sum();
        if (total - 1.0).abs() > SOFT_CHECK_TOL {
            log::warn!("tableau weights sum to {total}, method is not consistent");
        }
    }

    /// Stage count s.
    pub fn stages(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    pub fn weight_sum(&self) -> f64 {
        self.b.sum()
    }

    /// Absolute time of `stage`: `time + c[stage] * dt`.
    pub fn stage_time(&self, time: f64, dt: f64, stage: usize) -> f64 {
        time + self.c[stage] * dt
    }

    /// Intermediate state for `stage`: `y + dt * sum_j a[stage][j] * k_j`,
    /// summed over the computed samples in `stages`.
    pub fn stage_state<const D: usize>(
        &self,
        state: &ParticleState<D>,
        dt: f64,
        stages: &[DeltaState<D>],
        stage: usize,
    ) -> ParticleState<D> {
        let mut dpos = SVector::<f64, D>::zeros();
        let mut dvel = SVector::<f64, D>::zeros();
        for (j, k) in stages.iter().enumerate().take(stage) {
            let a_ij = self.a[(stage, j)];
            dpos += a_ij * k.vel;
            dvel += a_ij * k.accel;
        }
        ParticleState::new(state.pos + dt * dpos, state.vel + dt * dvel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    fn presets() -> Vec<(&'static str, ButcherTableau)> {
        vec![
            ("euler", ButcherTableau::euler()),
            ("midpoint", ButcherTableau::midpoint()),
            ("heun", ButcherTableau::heun()),
            ("ralston", ButcherTableau::ralston()),
            ("kutta3", ButcherTableau::kutta3()),
            ("rk4", ButcherTableau::rk4()),
            ("three_eighths", ButcherTableau::three_eighths()),
        ]
    }

    #[test]
    fn presets_pass_validation() {
        for (name, t) in presets() {
            let rebuilt = ButcherTableau::new(t.a().clone(), t.b().clone(), t.c().clone());
            assert_eq!(rebuilt.as_ref(), Ok(&t), "{name} should validate");
        }
    }

    #[test]
    fn presets_are_consistent() {
        for (name, t) in presets() {
            assert_relative_eq!(t.weight_sum(), 1.0, epsilon = 1e-12);
            for i in 0..t.stages() {
                assert_relative_eq!(t.a().row(i).sum(), t.c()[i], epsilon = 1e-12);
            }
            assert!(t.stages() > 0, "{name}");
        }
    }

    #[test]
    fn from_rows_builds_rk4() {
        let t = ButcherTableau::from_rows(
            &[
                &[0.0, 0.0, 0.0, 0.0],
                &[0.5, 0.0, 0.0, 0.0],
                &[0.0, 0.5, 0.0, 0.0],
                &[0.0, 0.0, 1.0, 0.0],
            ],
            &[1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
            &[0.0, 0.5, 0.5, 1.0],
        )
        .unwrap();
        assert_eq!(t, ButcherTableau::rk4());
        assert_eq!(t.stages(), 4);
    }

    #[test]
    fn rejects_empty() {
        let err = ButcherTableau::from_rows(&[], &[], &[]).unwrap_err();
        assert_eq!(err, TableauError::Empty);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = ButcherTableau::from_rows(&[&[0.0, 0.0], &[1.0, 0.0]], &[0.5, 0.5], &[0.0])
            .unwrap_err();
        assert_eq!(
            err,
            TableauError::DimensionMismatch { b: 2, c: 1, rows: 2, cols: 2 }
        );

        let err = ButcherTableau::from_rows(&[&[0.0, 0.0]], &[0.5, 0.5], &[0.0, 1.0]).unwrap_err();
        assert!(matches!(err, TableauError::DimensionMismatch { rows: 1, .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = ButcherTableau::from_rows(&[&[0.0, 0.0], &[1.0]], &[0.5, 0.5], &[0.0, 1.0])
            .unwrap_err();
        assert_eq!(err, TableauError::RowLength { row: 1, expected: 2, found: 1 });
    }

    #[test]
    fn rejects_implicit_entries() {
        // Diagonal entry makes it a DIRK, not explicit
        let err = ButcherTableau::from_rows(&[&[0.5, 0.0], &[0.5, 0.5]], &[0.5, 0.5], &[0.5, 1.0])
            .unwrap_err();
        assert_eq!(err, TableauError::NotExplicit { row: 0, col: 0, value: 0.5 });

        let err = ButcherTableau::from_rows(&[&[0.0, 1.0], &[1.0, 0.0]], &[0.5, 0.5], &[1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, TableauError::NotExplicit { row: 0, col: 1, .. }));
    }

    #[test]
    fn rejects_non_finite() {
        let err = ButcherTableau::from_rows(&[&[0.0]], &[f64::NAN], &[0.0]).unwrap_err();
        assert_eq!(err, TableauError::NonFinite { name: "b", index: 0 });

        let err = ButcherTableau::from_rows(
            &[&[0.0, 0.0], &[f64::INFINITY, 0.0]],
            &[0.5, 0.5],
            &[0.0, 1.0],
        )
        .unwrap_err();
        assert_eq!(err, TableauError::NonFinite { name: "a", index: 2 });
    }

    #[test]
    fn inconsistent_weights_still_build() {
        // Soft check only: logged, not rejected
        let t = ButcherTableau::from_rows(&[&[0.0]], &[0.5], &[0.0]).unwrap();
        assert_relative_eq!(t.weight_sum(), 0.5);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = TableauError::NotExplicit { row: 1, col: 2, value: 0.25 };
        assert_eq!(
            err.to_string(),
            "not explicit: a[1][2] = 0.25 must be zero on or above the diagonal"
        );
    }

    #[test]
    fn stage_state_combines_prior_samples() {
        let t = ButcherTableau::kutta3();
        let state = ParticleState::new(Vector2::new(1.0, 1.0), Vector2::new(0.0, 0.0));
        let k0 = DeltaState::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 2.0));
        let k1 = DeltaState::new(Vector2::new(0.0, 1.0), Vector2::new(4.0, 0.0));

        // Stage 2 of Kutta3: a = [-1, 2]
        let p = t.stage_state(&state, 0.5, &[k0, k1], 2);
        assert_relative_eq!(p.pos, Vector2::new(0.5, 2.0));
        assert_relative_eq!(p.vel, Vector2::new(4.0, -1.0));
        assert_relative_eq!(t.stage_time(3.0, 0.5, 2), 3.5);
    }
}
