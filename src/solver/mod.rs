//! Numerical solver
//!
//! This module provides HOW the drying problem is solved: an implicit
//! Crank-Nicolson finite-difference scheme with a direct factorization of
//! the constant implicit matrix.
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Problem** ([`SimulationConfig`](crate::physics::SimulationConfig)) - WHAT to solve
//! 2. **Options** ([`SolverOptions`]) - storage layout and linear backend
//! 3. **Solver** ([`Solver`] trait) - the numerical method, returns a [`Simulation`]
//!
//! # Module Organization
//!
//! - **`sparse`**: triplet assembly and compressed CSC/CSR storage
//! - **`matrices`**: the `A`/`B` pair with its boundary rows
//! - **`factorization`**: banded and dense LU, factorized once per run
//! - **`engine`**: the [`CrankNicolson`] stepper and [`CrankNicolsonSolver`]
//! - **`history`**: the recorded `time × space` moisture array
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────────┐
//! │ SimulationConfig │  (validated inputs)
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐     ┌──────────────────────┐
//! │ Grid + alpha,beta│────▶│ SystemMatrices (A,B) │ ← SparseFormat
//! └──────────────────┘     └──────────┬───────────┘
//!                                     │
//!                          ┌──────────▼───────────┐
//!                          │ Factorization of A   │ ← LinearBackend
//!                          └──────────┬───────────┘
//!                                     │  N_t steps
//!                          ┌──────────▼───────────┐
//!                          │ MoistureHistory      │ → Simulation
//!                          └──────────────────────┘
//! ```
//!
//! # Error Handling
//!
//! Every fallible call returns [`DryingResult`](crate::error::DryingResult).
//! A non-finite field after any step is reported as
//! [`DryingError::SingularSystem`](crate::error::DryingError::SingularSystem)
//! with the step index.

// =================================================================================================
// Module Declarations
// =================================================================================================
pub mod engine;
pub mod factorization;
pub mod history;
pub mod matrices;
pub mod options;
pub mod sparse;
mod traits;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use engine::{CrankNicolson, CrankNicolsonSolver, simulate};
pub use factorization::{BandedLu, Factorization, LinearBackend};
pub use history::MoistureHistory;
pub use matrices::{SYMMETRY_STENCIL, SystemMatrices, robin_stencil};
pub use options::SolverOptions;
pub use sparse::{SparseFormat, SparseMatrix, TripletBuilder};
pub use traits::{Simulation, Solver};
