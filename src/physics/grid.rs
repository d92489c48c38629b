//! Grid and discretization parameters
//!
//! # Time-step policy
//!
//! The time step is not chosen by the caller. It is pinned by
//!
//! ```text
//! dt = FOURIER_NUMBER · dx² / D      with FOURIER_NUMBER = 10
//! ```
//!
//! so the Crank-Nicolson stencil always runs at `alpha = D·dt/dx² = 10`.
//! The consequence is easy to miss: the simulated duration `N_t · dt`
//! depends on the grid resolution and the diffusivity, not only on `N_t`.
//! Refining the grid from 21 to 41 points divides `dt` by four, and the same
//! number of steps then covers a quarter of the physical time.
//!
//! A diffusion number of 10 is far beyond the range where Crank-Nicolson
//! damps its highest grid mode, so coarse grids ring. With `h = 1e-7` m/s
//! on a 1 cm slab, `N_x = 3` drives the average below `M_eq` (with a
//! negative field minimum) before it climbs back, and `N_x = 5` to `11`
//! rise slightly near equilibrium. From `N_x = 21` up the average decays
//! monotonically.
//!
//! ```rust
//! use drying_rs::physics::{Grid, SimulationConfig};
//!
//! let coarse = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7).unwrap();
//! let fine = coarse.with_spatial_points(41).unwrap();
//!
//! let t_coarse = Grid::new(&coarse).unwrap().total_time();
//! let t_fine = Grid::new(&fine).unwrap().total_time();
//! assert!((t_coarse / t_fine - 4.0).abs() < 1e-9);
//! ```

use ndarray::Array1;

use crate::error::{DryingError, DryingResult};
use crate::physics::SimulationConfig;

/// Dimensionless diffusion number the time step is derived from
pub const FOURIER_NUMBER: f64 = 10.0;

/// Seconds per hour, for the hour-based time axis
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// =================================================================================================
// Grid
// =================================================================================================

/// Spatial and temporal grid of a simulation
///
/// Computed once from a [`SimulationConfig`] and immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    dx: f64,
    dt: f64,
    positions: Array1<f64>,
    times: Array1<f64>,
}

impl Grid {
    /// Derive the grid from a configuration
    ///
    /// # Errors
    ///
    /// [`DryingError::Configuration`] if the configuration has fewer than two
    /// points (the spatial step would be undefined).
    pub fn new(config: &SimulationConfig) -> DryingResult<Self> {
        let n_x = config.spatial_points();
        if n_x < 2 {
            return Err(DryingError::config(
                "spatial_points",
                n_x as f64,
                "the spatial step needs at least two points",
            ));
        }

        let length = config.half_thickness();
        let dx = length / (n_x - 1) as f64;
        let dt = FOURIER_NUMBER * dx * dx / config.diffusivity();

        let positions = Array1::from_iter((0..n_x).map(|i| i as f64 * dx));
        // Index-based times, not accumulated, so t_N = N·dt to machine precision
        let times = Array1::from_iter((0..=config.time_steps()).map(|n| n as f64 * dt));

        Ok(Self { dx, dt, positions, times })
    }

    /// Spatial step `dx = L/(N_x-1)` \[m\]
    pub fn spatial_step(&self) -> f64 {
        self.dx
    }

    /// Time step \[s\]
    ///
    /// Fixed by the policy `dt = 10·dx²/D` (see the module documentation).
    /// Changing `N_x` changes `dt`, and with it the simulated duration.
    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Spatial coordinates, `N_x` values from 0 to L
    pub fn positions(&self) -> &Array1<f64> {
        &self.positions
    }

    /// Temporal coordinates in seconds, `N_t + 1` values from 0 to `N_t·dt`
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// Temporal coordinates in hours
    pub fn time_hours(&self) -> Array1<f64> {
        self.times.mapv(|t| t / SECONDS_PER_HOUR)
    }

    /// Number of spatial points
    pub fn spatial_points(&self) -> usize {
        self.positions.len()
    }

    /// Number of recorded instants (`N_t + 1`)
    pub fn time_points(&self) -> usize {
        self.times.len()
    }

    /// Simulated physical duration `N_t·dt` \[s\]
    pub fn total_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

// =================================================================================================
// Discretization state
// =================================================================================================

/// Constants of the discretized problem
///
/// Derived once immediately before the matrices are built, and constant
/// over every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscretizationState {
    /// Diffusion number `alpha = D·dt/dx²` (stencil coefficient)
    pub alpha: f64,
    /// Robin forcing constant `beta = 2·dx·h·M_eq/D`
    pub beta: f64,
    /// Robin surface coefficient `2·dx·h/D`
    pub robin: f64,
}

impl DiscretizationState {
    /// Derive the stencil constants from a configuration and its grid
    pub fn new(config: &SimulationConfig, grid: &Grid) -> Self {
        let d = config.diffusivity();
        let dx = grid.spatial_step();

        let alpha = d * grid.time_step() / (dx * dx);
        debug_assert!(
            (alpha - FOURIER_NUMBER).abs() <= 1e-9 * FOURIER_NUMBER,
            "alpha drifted from the fixed Fourier number: {alpha}"
        );

        let robin = 2.0 * dx * config.mass_transfer() / d;
        let beta = robin * config.equilibrium_moisture();

        log::debug!("discretization: dx={dx:e} dt={:e} alpha={alpha} beta={beta:e}", grid.time_step());

        Self { alpha, beta, robin }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
