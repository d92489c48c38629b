//! drying-rs: Moisture Diffusion Drying Simulation
//!
//! Simulates one-dimensional transient moisture diffusion in a drying slab
//! with an implicit Crank-Nicolson finite-difference scheme, then validates
//! the resulting drying curve against a single-exponential (log-linear)
//! drying model.
//!
//! # Architecture
//!
//! drying-rs keeps the physics apart from the numerics:
//!
//! 1. **Physics** ([`physics`]): validated inputs, grid, stencil constants
//! 2. **Solver** ([`solver`]): sparse `A`/`B` assembly, one factorization of
//!    `A`, `N_t` linear solves recorded into a [`MoistureHistory`](solver::MoistureHistory)
//! 3. **Analysis** ([`analysis`]): average moisture, moisture ratio, tail
//!    regression of `ln MR`, effective diffusivity
//!
//! Each stage consumes the value produced by the previous one, so the
//! pipeline cannot be called out of order. [`model::DryingModel`] offers the
//! same pipeline as a stateful object for callers who prefer
//! solve-then-query.
//!
//! # Time step policy
//!
//! The time step is **not** derived from `N_t`. It is fixed so that the
//! diffusion number is always 10:
//!
//! ```text
//! dt = 10 · dx² / D,     dx = L / (N_x - 1)
//! ```
//!
//! `N_t` only sets how many such steps are taken, so the simulated duration
//! is `N_t · 10 · dx² / D`. Refining the grid shortens both `dt` and the
//! simulated duration.
//!
//! At that diffusion number the scheme oscillates on coarse grids: below
//! roughly 21 points the average moisture can overshoot `M_eq` or rise
//! again near equilibrium. See [`physics::grid`] for measured cases.
//!
//! # Quick Start
//!
//! ```rust
//! use drying_rs::prelude::*;
//!
//! # fn main() -> DryingResult<()> {
//! // 1. Physical inputs: M0, M_eq, D [m²/s], L [m], N_x, N_t, h [m/s]
//! let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7)?;
//!
//! // 2. Solve
//! let simulation = simulate(&config, SolverOptions::default())?;
//!
//! // 3. Analyze
//! let analysis = analyze(&simulation)?;
//! println!("tail slope: {:e} 1/s (r² = {:.4})", analysis.validation.slope(), analysis.validation.r_squared());
//!
//! let d_eff = analysis.effective_diffusivity(&simulation)?;
//! assert!((d_eff - 1e-10).abs() < 0.01 * 1e-10);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`error`]: error taxonomy
//! - [`physics`]: problem definition
//! - [`solver`]: numerical method
//! - [`analysis`]: drying-curve reduction and validation
//! - [`model`]: stateful facade
//! - [`sweep`]: independent runs over many configurations (parallel with
//!   the `parallel` feature)

// Core modules
pub mod error;
pub mod physics;
pub mod solver;

pub mod analysis;
pub mod model;
pub mod sweep;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use drying_rs::prelude::*;
    //! ```
    pub use crate::analysis::{DryingAnalysis, DryingCurve, ValidationResult, analyze};
    pub use crate::error::{DryingError, DryingResult};
    pub use crate::model::DryingModel;
    pub use crate::physics::{Grid, SimulationConfig};
    pub use crate::solver::{
        CrankNicolsonSolver, LinearBackend, MoistureHistory, Simulation, Solver, SolverOptions,
        SparseFormat, simulate,
    };
    pub use crate::sweep::run_sweep;
}
