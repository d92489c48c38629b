//! Crank-Nicolson system matrices
//!
//! # Scheme
//!
//! With `alpha = D·dt/dx²`, the Crank-Nicolson discretization of
//! `∂M/∂t = D·∂²M/∂x²`, multiplied by 2, reads for every interior point:
//!
//! ```text
//! -alpha·u[i-1] + 2(1+alpha)·u[i] - alpha·u[i+1]          (A, next state)
//!   = alpha·p[i-1] + 2(1-alpha)·p[i] + alpha·p[i+1]        (B, previous state)
//! ```
//!
//! # Boundary rows
//!
//! The two boundary rows are algebraic constraints on the new state only,
//! so their rows in `B` stay empty. Both use the second-order one-sided
//! derivative `(∓3u₀ ± 4u₁ ∓ u₂) / 2dx`:
//!
//! ```text
//! row 0      (symmetry)   -3·u[0] + 4·u[1] - u[2]                      = 0
//! row N-1    (Robin)       u[N-3] - 4·u[N-2] + (3 + 2dx·h/D)·u[N-1]    = beta
//! ```
//!
//! where the Robin row is `-D·∂M/∂x = h·(M - M_eq)` multiplied by `2dx/D`,
//! and `beta = 2·dx·h·M_eq/D` is supplied on the right-hand side by the
//! engine.
//!
//! ```text
//!          A                                  B
//! ┌ -3    4   -1                  ┐   ┌ 0                          ┐
//! │ -a  2(1+a) -a                 │   │ a  2(1-a)  a               │
//! │       -a  2(1+a) -a           │   │     a   2(1-a)  a          │
//! │              ...              │   │            ...             │
//! │              -a  2(1+a)  -a   │   │             a  2(1-a)  a   │
//! └               1   -4  3+r     ┘   └                        0   ┘
//! ```

use crate::error::{DryingError, DryingResult};
use crate::physics::{DiscretizationState, Grid, MIN_SPATIAL_POINTS};
use crate::solver::sparse::{SparseFormat, SparseMatrix, TripletBuilder};

/// One-sided stencil of the zero-flux condition at x = 0 (columns 0, 1, 2)
pub const SYMMETRY_STENCIL: [f64; 3] = [-3.0, 4.0, -1.0];

/// Robin stencil at x = L (columns N-3, N-2, N-1) for a surface coefficient `2·dx·h/D`
pub fn robin_stencil(robin: f64) -> [f64; 3] {
    [1.0, -4.0, 3.0 + robin]
}

/// The pair of matrices advanced by the time-stepping engine
///
/// Built once per simulation, independent of the time index.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemMatrices {
    implicit: SparseMatrix,
    explicit: SparseMatrix,
}

impl SystemMatrices {
    /// Assemble `A` and `B` for a grid and its discretization constants
    ///
    /// # Errors
    ///
    /// [`DryingError::Configuration`] when the grid has fewer than three
    /// points.
    pub fn build(
        grid: &Grid,
        discretization: &DiscretizationState,
        format: SparseFormat,
    ) -> DryingResult<Self> {
        let n = grid.spatial_points();
        if n < MIN_SPATIAL_POINTS {
            return Err(DryingError::config(
                "spatial_points",
                n as f64,
                "the boundary stencils need at least three points",
            ));
        }

        let alpha = discretization.alpha;
        let last = n - 1;

        let mut a = TripletBuilder::square(n);
        let mut b = TripletBuilder::square(n);

        a.set_row_stencil(0, 0, &SYMMETRY_STENCIL);

        for i in 1..last {
            a.set_row_stencil(i, i - 1, &[-alpha, 2.0 * (1.0 + alpha), -alpha]);
            b.set_row_stencil(i, i - 1, &[alpha, 2.0 * (1.0 - alpha), alpha]);
        }

        a.set_row_stencil(last, last - 2, &robin_stencil(discretization.robin));

        log::debug!(
            "assembled {n}x{n} system matrices ({format}): nnz(A)={}, nnz(B)={}",
            a.nnz(),
            b.nnz()
        );

        Ok(Self {
            implicit: a.build(format),
            explicit: b.build(format),
        })
    }

    /// Implicit-side matrix `A`, applied to the unknown next state
    pub fn implicit(&self) -> &SparseMatrix {
        &self.implicit
    }

    /// Explicit-side matrix `B`, applied to the known previous state
    pub fn explicit(&self) -> &SparseMatrix {
        &self.explicit
    }

    /// Dimension `N_x` of both matrices
    pub fn dimension(&self) -> usize {
        self.implicit.nrows()
    }

    /// Storage layout of both matrices
    pub fn format(&self) -> SparseFormat {
        self.implicit.format()
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::SimulationConfig;
    use approx::assert_relative_eq;

    fn build(n_x: usize, h: f64, format: SparseFormat) -> (SystemMatrices, DiscretizationState) {
        let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, n_x, 10, h).unwrap();
        let grid = Grid::new(&config).unwrap();
        let state = DiscretizationState::new(&config, &grid);
        (SystemMatrices::build(&grid, &state, format).unwrap(), state)
    }

    #[test]
    fn test_boundary_rows_of_b_are_zero() {
        for n_x in [3, 4, 5, 21, 100] {
            for format in [SparseFormat::Csc, SparseFormat::Csr] {
                let (matrices, _) = build(n_x, 1e-7, format);
                let b = matrices.explicit();

                assert!(b.row_is_zero(0), "row 0 of B not zero for n_x={n_x}");
                assert!(b.row_is_zero(n_x - 1), "last row of B not zero for n_x={n_x}");
            }
        }
    }

    #[test]
    fn test_interior_stencil() {
        let (matrices, state) = build(7, 1e-7, SparseFormat::Csc);
        let (a, b) = (matrices.implicit(), matrices.explicit());
        let alpha = state.alpha;

        for i in 1..6 {
            assert_relative_eq!(a.get(i, i), 2.0 * (1.0 + alpha));
            assert_relative_eq!(a.get(i, i - 1), -alpha);
            assert_relative_eq!(a.get(i, i + 1), -alpha);
            assert_relative_eq!(b.get(i, i), 2.0 * (1.0 - alpha));
            assert_relative_eq!(b.get(i, i - 1), alpha);
            assert_relative_eq!(b.get(i, i + 1), alpha);
            assert_eq!(a.row_entries(i).len(), 3);
        }
    }

    #[test]
    fn test_symmetry_row() {
        let (matrices, _) = build(21, 1e-7, SparseFormat::Csr);
        let a = matrices.implicit();

        assert_eq!(a.row_entries(0), vec![(0, -3.0), (1, 4.0), (2, -1.0)]);
    }

    #[test]
    fn test_robin_row() {
        let (matrices, state) = build(21, 1e-7, SparseFormat::Csc);
        let a = matrices.implicit();

        // 2 dx h / D = 1 for this configuration
        assert_relative_eq!(state.robin, 1.0, max_relative = 1e-12);
        assert_eq!(a.get(20, 18), 1.0);
        assert_eq!(a.get(20, 19), -4.0);
        assert_relative_eq!(a.get(20, 20), 4.0, max_relative = 1e-12);
        assert_eq!(a.row_entries(20).len(), 3);
    }

    #[test]
    fn test_sealed_surface_robin_row() {
        let (matrices, _) = build(5, 0.0, SparseFormat::Csc);
        assert_eq!(matrices.implicit().row_entries(4), vec![(2, 1.0), (3, -4.0), (4, 3.0)]);
    }

    #[test]
    fn test_minimal_grid_has_full_boundary_rows() {
        let (matrices, state) = build(3, 1e-7, SparseFormat::Csc);
        let a = matrices.implicit().to_dense();

        assert_eq!(matrices.dimension(), 3);
        assert_eq!([a[(0, 0)], a[(0, 1)], a[(0, 2)]], SYMMETRY_STENCIL);
        assert_eq!([a[(2, 0)], a[(2, 1)], a[(2, 2)]], robin_stencil(state.robin));
        assert_relative_eq!(a[(1, 1)], 2.0 * (1.0 + state.alpha));
    }

    #[test]
    fn test_formats_describe_same_matrices() {
        let (csc, _) = build(9, 1e-7, SparseFormat::Csc);
        let (csr, _) = build(9, 1e-7, SparseFormat::Csr);

        assert_eq!(csc.format(), SparseFormat::Csc);
        assert_eq!(csr.format(), SparseFormat::Csr);
        assert_eq!(csc.implicit().to_dense(), csr.implicit().to_dense());
        assert_eq!(csc.explicit().to_dense(), csr.explicit().to_dense());
    }

    #[test]
    fn test_bandwidth_of_a() {
        let (matrices, _) = build(21, 1e-7, SparseFormat::Csc);
        // Boundary stencils reach two columns away from the diagonal
        assert_eq!(matrices.implicit().bandwidth(), (2, 2));
        assert_eq!(matrices.explicit().bandwidth(), (1, 1));
    }
}
