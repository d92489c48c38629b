//! Drying-curve analysis
//!
//! Reduces a solved [`MoistureHistory`](crate::solver::MoistureHistory) to
//! the quantities used in drying kinetics:
//!
//! - [`curve`]: trapezoidal average moisture, moisture ratio and `ln MR`
//! - [`regression`]: ordinary least squares
//! - [`validation`]: log-linear fit of the curve tail and the effective
//!   diffusivity it implies
//!
//! # Example
//!
//! ```rust
//! use drying_rs::analysis::analyze;
//! use drying_rs::physics::SimulationConfig;
//! use drying_rs::solver::{simulate, SolverOptions};
//!
//! let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7).unwrap();
//! let simulation = simulate(&config, SolverOptions::default()).unwrap();
//!
//! let analysis = analyze(&simulation).unwrap();
//! assert!(analysis.validation.slope() < 0.0);
//! ```

pub mod curve;
pub mod regression;
pub mod validation;

pub use curve::{DryingCurve, MR_THRESHOLD, trapezoid_average};
pub use regression::LinearFit;
pub use validation::{
    ValidationResult, diffusivity_from_slope, estimate_diffusivity, first_eigenvalue, validate,
};

use crate::error::DryingResult;
use crate::solver::Simulation;

/// Drying curve together with its tail validation
#[derive(Debug, Clone, PartialEq)]
pub struct DryingAnalysis {
    /// Average-moisture curve
    pub curve: DryingCurve,
    /// Log-linear fit of the tail
    pub validation: ValidationResult,
}

impl DryingAnalysis {
    /// Effective diffusivity recovered from the tail slope
    ///
    /// Uses the thickness and mass-transfer coefficient of `simulation`.
    pub fn effective_diffusivity(&self, simulation: &Simulation) -> DryingResult<f64> {
        let config = simulation.config();
        estimate_diffusivity(&self.validation, config.half_thickness(), config.mass_transfer())
    }
}

/// Build the drying curve of a simulation and validate its tail
pub fn analyze(simulation: &Simulation) -> DryingResult<DryingAnalysis> {
    let curve = DryingCurve::from_simulation(simulation)?;
    let validation = validate(&curve)?;
    Ok(DryingAnalysis { curve, validation })
}
