//! Solver interface and its result
//!
//! A [`Solver`] turns a validated [`SimulationConfig`] (WHAT to simulate)
//! into a [`Simulation`] (the solution). How it gets there, storage layout,
//! factorization, stepping, is the solver's business.

use crate::error::DryingResult;
use crate::physics::{DiscretizationState, Grid, SimulationConfig};
use crate::solver::history::MoistureHistory;
use crate::solver::options::SolverOptions;

// =================================================================================================
// Solver trait
// =================================================================================================

/// Numerical method producing a full moisture history
///
/// # Example
///
/// ```rust
/// use drying_rs::physics::SimulationConfig;
/// use drying_rs::solver::{CrankNicolsonSolver, Solver};
///
/// let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 11, 20, 1e-7).unwrap();
/// let simulation = CrankNicolsonSolver::default().solve(&config).unwrap();
///
/// assert_eq!(simulation.history().time_points(), 21);
/// ```
pub trait Solver {
    /// Run the simulation to completion
    ///
    /// # Errors
    ///
    /// Propagates configuration, assembly and linear-solve errors.
    fn solve(&self, config: &SimulationConfig) -> DryingResult<Simulation>;

    /// Human-readable name of the method
    fn name(&self) -> &str;
}

// =================================================================================================
// Simulation
// =================================================================================================

/// A completed simulation
///
/// Only a [`Solver`] creates one, so holding a `Simulation` proves the run
/// finished. Everything in it is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    config: SimulationConfig,
    options: SolverOptions,
    grid: Grid,
    discretization: DiscretizationState,
    history: MoistureHistory,
}

impl Simulation {
    pub(crate) fn new(
        config: SimulationConfig,
        options: SolverOptions,
        grid: Grid,
        discretization: DiscretizationState,
        history: MoistureHistory,
    ) -> Self {
        Self {
            config,
            options,
            grid,
            discretization,
            history,
        }
    }

    /// Inputs of the run
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Numerical options the run used
    pub fn options(&self) -> SolverOptions {
        self.options
    }

    /// Spatial and temporal grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Stencil constants the matrices were built from
    pub fn discretization(&self) -> &DiscretizationState {
        &self.discretization
    }

    /// Recorded moisture fields, one row per instant
    pub fn history(&self) -> &MoistureHistory {
        &self.history
    }

    /// Decompose into the history, dropping the metadata
    pub fn into_history(self) -> MoistureHistory {
        self.history
    }
}
