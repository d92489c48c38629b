//! Independent simulations over a set of configurations
//!
//! Each configuration owns its grid, matrices, factorization and history,
//! so sweep points share nothing. With the `parallel` feature they run on
//! the rayon pool; results always come back in input order.
//!
//! ```rust
//! use drying_rs::physics::SimulationConfig;
//! use drying_rs::solver::SolverOptions;
//! use drying_rs::sweep::run_sweep;
//!
//! let base = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 11, 20, 1e-7).unwrap();
//! let configs: Vec<_> = [1e-7, 2e-7, 4e-7]
//!     .iter()
//!     .map(|&h| base.with_mass_transfer(h).unwrap())
//!     .collect();
//!
//! let results = run_sweep(&configs, SolverOptions::default());
//! assert_eq!(results.len(), 3);
//! assert!(results.iter().all(|r| r.is_ok()));
//! ```

use crate::error::DryingResult;
use crate::physics::SimulationConfig;
use crate::solver::{CrankNicolsonSolver, Simulation, Solver, SolverOptions};

/// Simulate every configuration
///
/// A failing configuration yields an `Err` in its slot and does not stop
/// the others.
pub fn run_sweep(
    configs: &[SimulationConfig],
    options: SolverOptions,
) -> Vec<DryingResult<Simulation>> {
    run_sweep_with(configs, options, Ok)
}

/// Simulate every configuration and reduce each completed run with `reduce`
///
/// `reduce` runs on the same worker as its simulation, so only its output is
/// kept in memory.
pub fn run_sweep_with<T, F>(
    configs: &[SimulationConfig],
    options: SolverOptions,
    reduce: F,
) -> Vec<DryingResult<T>>
where
    T: Send,
    F: Fn(Simulation) -> DryingResult<T> + Sync + Send,
{
    let solver = CrankNicolsonSolver::new(options);
    let point = |config: &SimulationConfig| solver.solve(config).and_then(&reduce);

    log::info!("running sweep over {} configurations", configs.len());
    map_points(configs, point)
}

#[cfg(feature = "parallel")]
fn map_points<T, P>(configs: &[SimulationConfig], point: P) -> Vec<T>
where
    T: Send,
    P: Fn(&SimulationConfig) -> T + Sync + Send,
{
    use rayon::prelude::*;
    configs.par_iter().map(point).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_points<T, P>(configs: &[SimulationConfig], point: P) -> Vec<T>
where
    P: Fn(&SimulationConfig) -> T,
{
    configs.iter().map(point).collect()
}
