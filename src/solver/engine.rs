//! Crank-Nicolson time stepping
//!
//! # Algorithm
//!
//! `A` is factorized once. Each step `n → n+1` then costs one sparse
//! product and one pair of triangular solves:
//!
//! ```text
//! b        = B · u_n
//! b[N-1]   = beta                 (Robin forcing, B's last row is empty)
//! A · u_n+1 = b
//! ```
//!
//! `b[0]` is left at the zero produced by `B`'s empty first row, which is
//! exactly the right-hand side of the symmetry condition.
//!
//! # Example
//!
//! ```rust
//! use drying_rs::physics::SimulationConfig;
//! use drying_rs::solver::{simulate, SolverOptions};
//!
//! let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 50, 1e-7).unwrap();
//! let simulation = simulate(&config, SolverOptions::default()).unwrap();
//!
//! let history = simulation.history();
//! assert_eq!(history.time_points(), 51);
//! assert!(history.final_field()[20] < 0.4);
//! ```

use nalgebra::DVector;

use crate::error::{DryingError, DryingResult};
use crate::physics::{DiscretizationState, Grid, SimulationConfig};
use crate::solver::factorization::{Factorization, LinearBackend};
use crate::solver::history::{HistoryRecorder, MoistureHistory};
use crate::solver::matrices::SystemMatrices;
use crate::solver::options::SolverOptions;
use crate::solver::traits::{Simulation, Solver};

// =================================================================================================
// Stepper
// =================================================================================================

/// Time-stepping engine bound to one set of system matrices
#[derive(Debug, Clone)]
pub struct CrankNicolson {
    matrices: SystemMatrices,
    factorization: Factorization,
    beta: f64,
}

impl CrankNicolson {
    /// Factorize the implicit matrix and keep it for every step
    ///
    /// # Errors
    ///
    /// [`DryingError::SingularSystem`] when `A` cannot be factorized.
    pub fn new(
        matrices: SystemMatrices,
        discretization: &DiscretizationState,
        backend: LinearBackend,
    ) -> DryingResult<Self> {
        let (kl, ku) = matrices.implicit().bandwidth();
        let factorization = Factorization::new(matrices.implicit(), backend)?;

        log::debug!(
            "factorized {n}x{n} implicit matrix with {} (kl={kl}, ku={ku})",
            backend.name(),
            n = matrices.dimension()
        );

        Ok(Self {
            matrices,
            factorization,
            beta: discretization.beta,
        })
    }

    /// Number of unknowns per step
    pub fn dimension(&self) -> usize {
        self.matrices.dimension()
    }

    /// System matrices this engine advances
    pub fn matrices(&self) -> &SystemMatrices {
        &self.matrices
    }

    /// Advance one field by one time step
    ///
    /// # Errors
    ///
    /// [`DryingError::Configuration`] when `previous` does not have one value
    /// per grid point, [`DryingError::SingularSystem`] when the solve fails
    /// or yields a non-finite field.
    pub fn step(&self, previous: &DVector<f64>) -> DryingResult<DVector<f64>> {
        let n = self.dimension();
        if previous.len() != n {
            return Err(DryingError::config(
                "field_length",
                previous.len() as f64,
                format!("expected one value per grid point ({n})"),
            ));
        }

        let mut rhs = self.matrices.explicit().mul_vec(previous);
        rhs[n - 1] = self.beta;

        self.factorization.solve(&rhs)
    }

    /// Run `time_steps` steps from a uniform field
    ///
    /// The returned history holds `time_steps + 1` rows, the initial field
    /// first.
    pub fn run(&self, initial_moisture: f64, time_steps: usize) -> DryingResult<MoistureHistory> {
        let n = self.dimension();
        let mut recorder = HistoryRecorder::new(time_steps + 1, n);

        let mut field = DVector::from_element(n, initial_moisture);
        recorder.push(&field);

        for step in 0..time_steps {
            field = self.step(&field).map_err(|error| match error {
                DryingError::SingularSystem { reason } => {
                    DryingError::singular(format!("step {step}: {reason}"))
                }
                other => other,
            })?;

            log::trace!("step {step}: surface moisture {:.6}", field[n - 1]);
            recorder.push(&field);
        }

        recorder.finish()
    }
}

// =================================================================================================
// Solver
// =================================================================================================

/// [`Solver`] assembling and running a [`CrankNicolson`] engine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrankNicolsonSolver {
    options: SolverOptions,
}

impl CrankNicolsonSolver {
    /// Solver with the given storage layout and backend
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Numerical options in use
    pub fn options(&self) -> SolverOptions {
        self.options
    }
}

impl Solver for CrankNicolsonSolver {
    fn solve(&self, config: &SimulationConfig) -> DryingResult<Simulation> {
        config.validate()?;

        let grid = Grid::new(config)?;
        let discretization = DiscretizationState::new(config, &grid);
        let matrices = SystemMatrices::build(&grid, &discretization, self.options.sparse_format)?;
        let engine = CrankNicolson::new(matrices, &discretization, self.options.backend)?;

        log::info!(
            "simulating {} steps on {} points ({}), dt={:.1} s, Bi={:.3}",
            config.time_steps(),
            grid.spatial_points(),
            self.options,
            grid.time_step(),
            config.biot_number()
        );

        let history = engine.run(config.initial_moisture(), config.time_steps())?;

        log::info!(
            "simulation finished after {:.2} h of drying",
            grid.total_time() / crate::physics::SECONDS_PER_HOUR
        );

        Ok(Simulation::new(*config, self.options, grid, discretization, history))
    }

    fn name(&self) -> &str {
        "Crank-Nicolson"
    }
}

/// Run one simulation with the given options
///
/// Shorthand for `CrankNicolsonSolver::new(options).solve(config)`.
pub fn simulate(config: &SimulationConfig, options: SolverOptions) -> DryingResult<Simulation> {
    CrankNicolsonSolver::new(options).solve(config)
}

// =================================================================================================
// Tests
// =================================================================================================
