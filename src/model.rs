//! Stateful drying model
//!
//! [`DryingModel`] wraps the pipeline behind an object that is first
//! simulated, then queried. Every query made before
//! [`simulate`](DryingModel::simulate) returns
//! [`DryingError::InvalidState`].
//!
//! ```text
//!   new ──▶ Unsolved ──simulate──▶ Solved
//!              ▲                     │
//!              └──────── reset ──────┘
//! ```
//!
//! The drying curve, its tail validation and the diffusivity estimate are
//! reduced once, when the model is solved. Queries hand out borrows of the
//! stored results.
//!
//! # Example
//!
//! ```rust
//! use drying_rs::model::DryingModel;
//! use drying_rs::physics::SimulationConfig;
//! use drying_rs::solver::SolverOptions;
//!
//! let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7).unwrap();
//! let mut model = DryingModel::new(config, SolverOptions::default()).unwrap();
//!
//! assert!(model.drying_curve().is_err());
//!
//! model.simulate().unwrap();
//! let validation = model.validate_model().unwrap();
//! assert!(validation.slope() < 0.0);
//! ```

use ndarray::Array1;

use crate::analysis::{self, DryingCurve, ValidationResult};
use crate::error::{DryingError, DryingResult};
use crate::physics::{Grid, SimulationConfig};
use crate::solver::{CrankNicolsonSolver, MoistureHistory, Simulation, Solver, SolverOptions};

/// Lifecycle of a [`DryingModel`]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SimulationState {
    /// Nothing has been computed yet
    #[default]
    Unsolved,
    /// The run completed; results are available
    Solved(Box<SolvedRun>),
}

/// Simulation of a solved model and the results reduced from it
///
/// Validation and diffusivity keep their outcome, including the
/// [`DryingError::InsufficientData`] of a run with nothing to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedRun {
    simulation: Simulation,
    curve: DryingCurve,
    validation: DryingResult<ValidationResult>,
    diffusivity: DryingResult<f64>,
}

impl SolvedRun {
    fn new(simulation: Simulation) -> DryingResult<Self> {
        let curve = DryingCurve::from_simulation(&simulation)?;
        let validation = analysis::validate(&curve);

        let config = simulation.config();
        let diffusivity = validation.clone().and_then(|validation| {
            analysis::estimate_diffusivity(
                &validation,
                config.half_thickness(),
                config.mass_transfer(),
            )
        });

        Ok(Self {
            simulation,
            curve,
            validation,
            diffusivity,
        })
    }

    /// Completed simulation
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Average-moisture drying curve
    pub fn curve(&self) -> &DryingCurve {
        &self.curve
    }

    /// Outcome of the tail validation
    pub fn validation(&self) -> Result<&ValidationResult, &DryingError> {
        self.validation.as_ref()
    }

    /// Outcome of the diffusivity estimate
    pub fn diffusivity(&self) -> Result<f64, &DryingError> {
        self.diffusivity.as_ref().copied()
    }
}

/// Drying simulation with a solve-then-query workflow
#[derive(Debug, Clone, PartialEq)]
pub struct DryingModel {
    config: SimulationConfig,
    options: SolverOptions,
    grid: Grid,
    state: SimulationState,
}

impl DryingModel {
    /// Prepare a model; nothing is simulated until [`simulate`](Self::simulate)
    pub fn new(config: SimulationConfig, options: SolverOptions) -> DryingResult<Self> {
        config.validate()?;
        let grid = Grid::new(&config)?;
        Ok(Self {
            config,
            options,
            grid,
            state: SimulationState::Unsolved,
        })
    }

    /// Model inputs
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Numerical options
    pub fn options(&self) -> SolverOptions {
        self.options
    }

    /// Grid of the run, available before solving
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Current lifecycle state
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Whether [`simulate`](Self::simulate) has completed since the last reset
    pub fn is_solved(&self) -> bool {
        matches!(self.state, SimulationState::Solved(_))
    }

    /// Run the simulation and reduce its drying curve
    ///
    /// # Errors
    ///
    /// [`DryingError::InvalidState`] if the model is already solved (call
    /// [`reset`](Self::reset) first), or any solver error. A curve that
    /// cannot be validated does not fail the run; the error is returned by
    /// [`validate_model`](Self::validate_model) instead.
    pub fn simulate(&mut self) -> DryingResult<&Simulation> {
        if self.is_solved() {
            return Err(DryingError::already_solved("simulate"));
        }

        let simulation = CrankNicolsonSolver::new(self.options).solve(&self.config)?;
        self.state = SimulationState::Solved(Box::new(SolvedRun::new(simulation)?));
        self.simulation("simulate")
    }

    /// Discard results and return to the unsolved state
    pub fn reset(&mut self) {
        self.state = SimulationState::Unsolved;
    }

    /// Full moisture history
    pub fn history(&self) -> DryingResult<&MoistureHistory> {
        self.simulation("history").map(Simulation::history)
    }

    /// Moisture time series at `fraction · L`
    pub fn cut_at(&self, fraction: f64) -> DryingResult<Array1<f64>> {
        self.history()?.cut_at(fraction)
    }

    /// Moisture time series at several fractions of `L`
    pub fn cuts(&self, fractions: &[f64]) -> DryingResult<Vec<Array1<f64>>> {
        self.simulation("cuts")?.history().cuts(fractions)
    }

    /// Average-moisture drying curve
    pub fn drying_curve(&self) -> DryingResult<&DryingCurve> {
        self.solved("drying_curve").map(SolvedRun::curve)
    }

    /// Tail regression of `ln MR`
    pub fn validate_model(&self) -> DryingResult<&ValidationResult> {
        self.solved("validate_model")?
            .validation()
            .map_err(Clone::clone)
    }

    /// Effective diffusivity recovered from the validated tail
    pub fn effective_diffusivity(&self) -> DryingResult<f64> {
        self.solved("effective_diffusivity")?
            .diffusivity()
            .map_err(Clone::clone)
    }

    fn simulation(&self, operation: &'static str) -> DryingResult<&Simulation> {
        self.solved(operation).map(SolvedRun::simulation)
    }

    fn solved(&self, operation: &'static str) -> DryingResult<&SolvedRun> {
        match &self.state {
            SimulationState::Solved(run) => Ok(run.as_ref()),
            SimulationState::Unsolved => Err(DryingError::unsolved(operation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> DryingModel {
        let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 11, 40, 1e-7).unwrap();
        DryingModel::new(config, SolverOptions::default()).unwrap()
    }

    fn assert_unsolved<T: std::fmt::Debug>(result: DryingResult<T>) {
        match result {
            Err(DryingError::InvalidState { required: "solved", .. }) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }
    }

    #[test]
    fn test_queries_before_simulate() {
        let model = model();

        assert!(!model.is_solved());
        assert_unsolved(model.history());
        assert_unsolved(model.cut_at(0.5));
        assert_unsolved(model.cuts(&[0.0, 1.0]));
        assert_unsolved(model.drying_curve());
        assert_unsolved(model.validate_model());
        assert_unsolved(model.effective_diffusivity());
    }

    #[test]
    fn test_grid_available_before_simulate() {
        let model = model();
        assert_eq!(model.grid().spatial_points(), 11);
        assert_eq!(model.grid().time_points(), 41);
    }

    #[test]
    fn test_simulate_then_query() {
        let mut model = model();
        model.simulate().unwrap();

        assert!(model.is_solved());
        assert_eq!(model.history().unwrap().time_points(), 41);
        assert_eq!(model.cuts(&[0.0, 0.5, 1.0]).unwrap().len(), 3);
        assert_eq!(model.drying_curve().unwrap().len(), 41);
    }

    #[test]
    fn test_queries_borrow_stored_results() {
        let mut model = model();
        model.simulate().unwrap();

        let first = model.drying_curve().unwrap();
        let second = model.drying_curve().unwrap();
        assert!(std::ptr::eq(first, second));

        let validation = model.validate_model().unwrap();
        assert!(std::ptr::eq(validation, model.validate_model().unwrap()));

        let SimulationState::Solved(run) = model.state() else {
            panic!("model should be solved");
        };
        assert!(std::ptr::eq(run.curve(), first));
        assert_eq!(model.effective_diffusivity(), run.diffusivity().map_err(Clone::clone));
    }

    #[test]
    fn test_unvalidated_run_keeps_its_error() {
        // No driving force: nothing survives the moisture-ratio mask
        let config = SimulationConfig::new(0.05, 0.05, 1e-10, 0.01, 11, 40, 1e-7).unwrap();
        let mut model = DryingModel::new(config, SolverOptions::default()).unwrap();
        model.simulate().unwrap();

        assert_eq!(model.drying_curve().unwrap().len(), 41);
        for _ in 0..2 {
            assert!(matches!(
                model.validate_model(),
                Err(DryingError::InsufficientData { .. })
            ));
            assert!(matches!(
                model.effective_diffusivity(),
                Err(DryingError::InsufficientData { .. })
            ));
        }
    }

    #[test]
    fn test_simulate_twice_requires_reset() {
        let mut model = model();
        model.simulate().unwrap();

        match model.simulate() {
            Err(DryingError::InvalidState { required: "unsolved", .. }) => {}
            other => panic!("expected InvalidState, got {other:?}"),
        }

        model.reset();
        assert!(!model.is_solved());
        assert_eq!(model.state(), &SimulationState::Unsolved);
        assert!(model.simulate().is_ok());
    }

    #[test]
    fn test_out_of_bounds_cut_after_simulate() {
        let mut model = model();
        model.simulate().unwrap();

        assert!(matches!(model.cut_at(1.5), Err(DryingError::OutOfBounds { .. })));
        assert!(matches!(model.cuts(&[0.2, -0.5]), Err(DryingError::OutOfBounds { .. })));
    }
}
