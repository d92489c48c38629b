//! Direct factorization of the implicit matrix
//!
//! `A` never changes during a run, so it is factorized once and each step
//! costs only a forward and a backward substitution.
//!
//! # Backends
//!
//! - [`LinearBackend::Banded`] (default): LU with partial pivoting on the
//!   band of `A`. The Crank-Nicolson `A` has lower and upper bandwidth 2
//!   (the boundary stencils reach two columns away from the diagonal), so
//!   factorization is `O(N)` and each solve is `O(N)`.
//! - [`LinearBackend::DenseLu`]: nalgebra's dense LU with partial pivoting.
//!   `O(N³)` to factorize, kept as a reference implementation.
//!
//! # Banded LU
//!
//! Row interchanges can push fill-in up to `kl` columns beyond the original
//! upper bandwidth, so `U` is stored with bandwidth `kl + ku`. The
//! multipliers of each elimination step are stored apart from `U` and the
//! interchanges replayed on the right-hand side, the same split as LAPACK's
//! `gbtrf`/`gbtrs` pair.

use nalgebra::{DVector, Dyn, linalg::LU};

use crate::error::{DryingError, DryingResult};
use crate::solver::sparse::SparseMatrix;

/// Linear-solver backend for the per-step solve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinearBackend {
    /// Banded LU with partial pivoting
    #[default]
    Banded,
    /// Dense LU from nalgebra
    DenseLu,
}

impl LinearBackend {
    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            LinearBackend::Banded => "banded LU",
            LinearBackend::DenseLu => "dense LU",
        }
    }
}

// =================================================================================================
// Factorization
// =================================================================================================

/// A factorized square matrix, reusable for any number of right-hand sides
#[derive(Debug, Clone)]
pub enum Factorization {
    /// Banded LU
    Banded(BandedLu),
    /// Dense LU of an `n × n` matrix
    Dense {
        /// nalgebra factors
        lu: LU<f64, Dyn, Dyn>,
        /// System size
        n: usize,
    },
}

impl Factorization {
    /// Factorize `matrix` with the chosen backend
    ///
    /// # Errors
    ///
    /// [`DryingError::SingularSystem`] when the matrix is not square or is
    /// singular.
    pub fn new(matrix: &SparseMatrix, backend: LinearBackend) -> DryingResult<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(DryingError::singular(format!(
                "cannot factorize a {}x{} matrix",
                matrix.nrows(),
                matrix.ncols()
            )));
        }

        match backend {
            LinearBackend::Banded => BandedLu::factorize(matrix).map(Factorization::Banded),
            LinearBackend::DenseLu => {
                let lu = matrix.to_dense().lu();
                if !lu.is_invertible() {
                    return Err(DryingError::singular("dense LU found a zero pivot"));
                }
                Ok(Factorization::Dense {
                    lu,
                    n: matrix.nrows(),
                })
            }
        }
    }

    /// Solve `A·x = rhs`
    ///
    /// # Errors
    ///
    /// [`DryingError::SingularSystem`] when the right-hand side has the
    /// wrong length or the solution is not finite.
    pub fn solve(&self, rhs: &DVector<f64>) -> DryingResult<DVector<f64>> {
        let solution = match self {
            Factorization::Banded(lu) => lu.solve(rhs)?,
            Factorization::Dense { lu, n } => {
                if rhs.len() != *n {
                    return Err(DryingError::singular(format!(
                        "right-hand side of length {} for a system of size {n}",
                        rhs.len()
                    )));
                }
                lu.solve(rhs)
                    .ok_or_else(|| DryingError::singular("dense LU solve failed"))?
            }
        };

        if let Some(index) = solution.iter().position(|x| !x.is_finite()) {
            return Err(DryingError::singular(format!(
                "non-finite solution component at index {index}"
            )));
        }

        Ok(solution)
    }

    /// Backend used for this factorization
    pub fn backend(&self) -> LinearBackend {
        match self {
            Factorization::Banded(_) => LinearBackend::Banded,
            Factorization::Dense { .. } => LinearBackend::DenseLu,
        }
    }
}

// =================================================================================================
// Banded LU
// =================================================================================================

/// LU factors of a banded matrix with partial pivoting
#[derive(Debug, Clone, PartialEq)]
pub struct BandedLu {
    n: usize,
    /// Lower bandwidth of the original matrix
    kl: usize,
    /// Upper bandwidth of `U` (original upper bandwidth + `kl`)
    ku: usize,
    /// Row-major band storage, `kl + ku + 1` slots per row
    band: Vec<f64>,
    /// `kl` multipliers per elimination step
    multipliers: Vec<f64>,
    /// Row swapped with row `k` at step `k`
    pivots: Vec<usize>,
}

impl BandedLu {
    /// Factorize a square sparse matrix
    pub fn factorize(matrix: &SparseMatrix) -> DryingResult<Self> {
        let n = matrix.nrows();
        let (kl, ku_original) = matrix.bandwidth();
        let ku = ku_original + kl;

        let mut lu = Self {
            n,
            kl,
            ku,
            band: vec![0.0; n * (kl + ku + 1)],
            multipliers: vec![0.0; n * kl],
            pivots: (0..n).collect(),
        };

        let mut scale = 0.0f64;
        for (row, col, value) in matrix.triplets() {
            *lu.at_mut(row, col) = value;
            scale = scale.max(value.abs());
        }
        let tolerance = f64::EPSILON * scale;

        for k in 0..n {
            let last_row = (k + kl).min(n - 1);
            let last_col = (k + ku).min(n - 1);

            // Partial pivoting within the lower band of column k
            let mut pivot_row = k;
            let mut pivot_abs = lu.at(k, k).abs();
            for i in k + 1..=last_row {
                let candidate = lu.at(i, k).abs();
                if candidate > pivot_abs {
                    pivot_row = i;
                    pivot_abs = candidate;
                }
            }

            if !pivot_abs.is_finite() || pivot_abs <= tolerance {
                return Err(DryingError::singular(format!(
                    "zero pivot in column {k} (|pivot| = {pivot_abs:e})"
                )));
            }

            lu.pivots[k] = pivot_row;
            if pivot_row != k {
                for j in k..=last_col {
                    let upper = lu.at(k, j);
                    let lower = lu.at(pivot_row, j);
                    *lu.at_mut(k, j) = lower;
                    *lu.at_mut(pivot_row, j) = upper;
                }
            }

            let pivot = lu.at(k, k);
            for i in k + 1..=last_row {
                let factor = lu.at(i, k) / pivot;
                lu.multipliers[k * kl + (i - k - 1)] = factor;
                *lu.at_mut(i, k) = 0.0;
                if factor != 0.0 {
                    for j in k + 1..=last_col {
                        let update = factor * lu.at(k, j);
                        *lu.at_mut(i, j) -= update;
                    }
                }
            }
        }

        Ok(lu)
    }

    /// Solve `A·x = rhs` with the stored factors
    pub fn solve(&self, rhs: &DVector<f64>) -> DryingResult<DVector<f64>> {
        let n = self.n;
        if rhs.len() != n {
            return Err(DryingError::singular(format!(
                "right-hand side of length {} for a system of size {n}",
                rhs.len()
            )));
        }

        let mut x = rhs.clone();

        // Forward: apply interchanges and L^-1 step by step
        for k in 0..n {
            let p = self.pivots[k];
            if p != k {
                x.swap_rows(k, p);
            }
            let xk = x[k];
            for i in k + 1..=(k + self.kl).min(n - 1) {
                x[i] -= self.multipliers[k * self.kl + (i - k - 1)] * xk;
            }
        }

        // Backward: U^-1
        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in i + 1..=(i + self.ku).min(n - 1) {
                sum -= self.at(i, j) * x[j];
            }
            x[i] = sum / self.at(i, i);
        }

        Ok(x)
    }

    /// System size
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// `(kl, ku)` of the stored factors
    pub fn bandwidth(&self) -> (usize, usize) {
        (self.kl, self.ku)
    }

    #[inline]
    fn offset(&self, row: usize, col: usize) -> usize {
        debug_assert!(
            col + self.kl >= row && col <= row + self.ku,
            "({row}, {col}) outside the band"
        );
        row * (self.kl + self.ku + 1) + (col + self.kl - row)
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> f64 {
        self.band[self.offset(row, col)]
    }

    #[inline]
    fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        let offset = self.offset(row, col);
        &mut self.band[offset]
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::sparse::{SparseFormat, TripletBuilder};
    use approx::assert_relative_eq;

    fn from_dense(rows: &[&[f64]], format: SparseFormat) -> SparseMatrix {
        let mut builder = TripletBuilder::square(rows.len());
        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    builder.set(i, j, value);
                }
            }
        }
        builder.build(format)
    }

    fn assert_solves(matrix: &SparseMatrix, backend: LinearBackend) {
        let n = matrix.nrows();
        let expected = DVector::from_iterator(n, (0..n).map(|i| 1.0 + 0.5 * i as f64));
        let rhs = matrix.mul_vec(&expected);

        let factorization = Factorization::new(matrix, backend).unwrap();
        let solution = factorization.solve(&rhs).unwrap();

        for i in 0..n {
            assert_relative_eq!(solution[i], expected[i], max_relative = 1e-10);
        }
    }

    #[test]
    fn test_identity() {
        let matrix = from_dense(
            &[&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0], &[0.0, 0.0, 1.0]],
            SparseFormat::Csc,
        );
        let lu = BandedLu::factorize(&matrix).unwrap();
        let x = lu.solve(&DVector::from_vec(vec![1.0, 2.0, 3.0])).unwrap();

        assert_eq!(lu.bandwidth(), (0, 0));
        assert_eq!(x.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_tridiagonal_laplacian() {
        let matrix = from_dense(
            &[
                &[2.0, -1.0, 0.0, 0.0],
                &[-1.0, 2.0, -1.0, 0.0],
                &[0.0, -1.0, 2.0, -1.0],
                &[0.0, 0.0, -1.0, 2.0],
            ],
            SparseFormat::Csr,
        );
        assert_solves(&matrix, LinearBackend::Banded);
        assert_solves(&matrix, LinearBackend::DenseLu);
    }

    #[test]
    fn test_pivoting_is_required() {
        // Zero leading entry: elimination without interchanges would fail
        let matrix = from_dense(
            &[&[0.0, 1.0, 2.0], &[3.0, 1.0, 0.0], &[0.0, 4.0, 1.0]],
            SparseFormat::Csc,
        );
        assert_solves(&matrix, LinearBackend::Banded);
    }

    #[test]
    fn test_boundary_style_pentadiagonal() {
        // Crank-Nicolson shape with one-sided boundary rows, alpha = 10
        let n = 12;
        let alpha = 10.0;
        let mut builder = TripletBuilder::square(n);
        builder.set_row_stencil(0, 0, &[-3.0, 4.0, -1.0]);
        for i in 1..n - 1 {
            builder.set_row_stencil(i, i - 1, &[-alpha, 2.0 * (1.0 + alpha), -alpha]);
        }
        builder.set_row_stencil(n - 1, n - 3, &[1.0, -4.0, 4.0]);

        for format in [SparseFormat::Csc, SparseFormat::Csr] {
            let matrix = builder.clone().build(format);
            assert_solves(&matrix, LinearBackend::Banded);
            assert_solves(&matrix, LinearBackend::DenseLu);
        }
    }

    #[test]
    fn test_backends_agree() {
        let matrix = from_dense(
            &[
                &[-3.0, 4.0, -1.0, 0.0, 0.0],
                &[-10.0, 22.0, -10.0, 0.0, 0.0],
                &[0.0, -10.0, 22.0, -10.0, 0.0],
                &[0.0, 0.0, -10.0, 22.0, -10.0],
                &[0.0, 0.0, 1.0, -4.0, 3.5],
            ],
            SparseFormat::Csc,
        );
        let rhs = DVector::from_vec(vec![0.0, 1.0, -2.0, 0.5, 0.1]);

        let banded = Factorization::new(&matrix, LinearBackend::Banded).unwrap();
        let dense = Factorization::new(&matrix, LinearBackend::DenseLu).unwrap();
        assert_eq!(banded.backend(), LinearBackend::Banded);
        assert_eq!(dense.backend(), LinearBackend::DenseLu);

        let x_banded = banded.solve(&rhs).unwrap();
        let x_dense = dense.solve(&rhs).unwrap();
        for i in 0..5 {
            assert_relative_eq!(x_banded[i], x_dense[i], epsilon = 1e-12, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_singular_matrix_is_rejected() {
        let matrix = from_dense(&[&[1.0, 2.0], &[2.0, 4.0]], SparseFormat::Csc);

        for backend in [LinearBackend::Banded, LinearBackend::DenseLu] {
            let result = Factorization::new(&matrix, backend);
            assert!(
                matches!(result, Err(DryingError::SingularSystem { .. })),
                "{} accepted a singular matrix",
                backend.name()
            );
        }
    }

    #[test]
    fn test_empty_row_is_singular() {
        let mut builder = TripletBuilder::square(3);
        builder.set(0, 0, 1.0);
        builder.set(2, 2, 1.0);
        let matrix = builder.build(SparseFormat::Csr);

        assert!(BandedLu::factorize(&matrix).is_err());
    }

    #[test]
    fn test_wrong_rhs_length() {
        let matrix = from_dense(&[&[2.0, 0.0], &[0.0, 2.0]], SparseFormat::Csc);
        let lu = Factorization::new(&matrix, LinearBackend::Banded).unwrap();

        assert!(lu.solve(&DVector::from_vec(vec![1.0, 2.0, 3.0])).is_err());
    }
}
