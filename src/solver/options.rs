//! Numerical options
//!
//! Neither option changes the simulated physics: both only select how the
//! same linear systems are stored and solved.

use std::fmt;

use crate::solver::factorization::LinearBackend;
use crate::solver::sparse::SparseFormat;

/// How the Crank-Nicolson systems are stored and solved
///
/// # Example
///
/// ```rust
/// use drying_rs::solver::{LinearBackend, SolverOptions, SparseFormat};
///
/// let options = SolverOptions::default()
///     .with_sparse_format(SparseFormat::Csr)
///     .with_backend(LinearBackend::DenseLu);
///
/// assert_eq!(options.sparse_format, SparseFormat::Csr);
/// assert_eq!(options.backend, LinearBackend::DenseLu);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SolverOptions {
    /// Storage layout of `A` and `B`
    pub sparse_format: SparseFormat,
    /// Factorization used for the per-step solve
    pub backend: LinearBackend,
}

impl SolverOptions {
    /// Options with an explicit storage layout and backend
    pub fn new(sparse_format: SparseFormat, backend: LinearBackend) -> Self {
        Self {
            sparse_format,
            backend,
        }
    }

    /// Replace the storage layout
    pub fn with_sparse_format(mut self, sparse_format: SparseFormat) -> Self {
        self.sparse_format = sparse_format;
        self
    }

    /// Replace the linear backend
    pub fn with_backend(mut self, backend: LinearBackend) -> Self {
        self.backend = backend;
        self
    }
}

impl fmt::Display for SolverOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} storage, {}", self.sparse_format, self.backend.name())
    }
}
