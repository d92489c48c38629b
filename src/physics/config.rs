//! Simulation inputs
//!
//! [`SimulationConfig`] gathers the seven scalars that fully describe a
//! drying run. It is validated on construction and immutable afterwards, so
//! every downstream stage can rely on its invariants without re-checking.

use crate::error::{DryingError, DryingResult};

/// Minimum number of spatial points
///
/// Each boundary row uses a three-point one-sided stencil, so anything
/// below three points cannot carry both boundary conditions.
pub const MIN_SPATIAL_POINTS: usize = 3;

/// Physical and numerical inputs of a drying simulation
///
/// # Fields
///
/// | Symbol | Accessor                   | Unit    | Constraint |
/// |--------|----------------------------|---------|------------|
/// | `M_0`  | [`initial_moisture`]       | kg/kg   | finite     |
/// | `M_eq` | [`equilibrium_moisture`]   | kg/kg   | finite     |
/// | `D`    | [`diffusivity`]            | m²/s    | `> 0`      |
/// | `L`    | [`half_thickness`]         | m       | `> 0`      |
/// | `N_x`  | [`spatial_points`]         | -       | `>= 3`     |
/// | `N_t`  | [`time_steps`]             | -       | `>= 1`     |
/// | `h`    | [`mass_transfer`]          | m/s     | `>= 0`     |
///
/// The time step is NOT an input: it is derived from the grid, see
/// [`Grid::time_step`](crate::physics::Grid::time_step).
///
/// [`initial_moisture`]: SimulationConfig::initial_moisture
/// [`equilibrium_moisture`]: SimulationConfig::equilibrium_moisture
/// [`diffusivity`]: SimulationConfig::diffusivity
/// [`half_thickness`]: SimulationConfig::half_thickness
/// [`spatial_points`]: SimulationConfig::spatial_points
/// [`time_steps`]: SimulationConfig::time_steps
/// [`mass_transfer`]: SimulationConfig::mass_transfer
///
/// # Example
///
/// ```rust
/// use drying_rs::physics::SimulationConfig;
///
/// let config = SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 21, 500, 1e-7).unwrap();
/// assert_eq!(config.spatial_points(), 21);
///
/// // Invalid grids are rejected up front
/// assert!(SimulationConfig::new(0.4, 0.05, 1e-10, 0.01, 2, 500, 1e-7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Initial moisture content M_0 (uniform over the slab)
    initial_moisture: f64,
    /// Equilibrium moisture content M_eq of the surrounding air
    equilibrium_moisture: f64,
    /// Effective diffusivity D \[m²/s\]
    diffusivity: f64,
    /// Half-thickness L of the slab \[m\]
    half_thickness: f64,
    /// Number of spatial points N_x
    spatial_points: usize,
    /// Number of time steps N_t
    time_steps: usize,
    /// Convective mass-transfer coefficient h \[m/s\]
    mass_transfer: f64,
}

impl SimulationConfig {
    /// Create a validated configuration
    ///
    /// # Arguments
    ///
    /// * `initial_moisture` - Initial moisture M_0
    /// * `equilibrium_moisture` - Equilibrium moisture M_eq
    /// * `diffusivity` - Effective diffusivity D \[m²/s\]
    /// * `half_thickness` - Half-thickness L \[m\] (half of the full slab)
    /// * `spatial_points` - Number of grid points N_x
    /// * `time_steps` - Number of time steps N_t
    /// * `mass_transfer` - Mass-transfer coefficient h \[m/s\]
    ///
    /// # Errors
    ///
    /// Returns [`DryingError::Configuration`] when any constraint listed on
    /// the type is violated.
    pub fn new(
        initial_moisture: f64,
        equilibrium_moisture: f64,
        diffusivity: f64,
        half_thickness: f64,
        spatial_points: usize,
        time_steps: usize,
        mass_transfer: f64,
    ) -> DryingResult<Self> {
        let config = Self {
            initial_moisture,
            equilibrium_moisture,
            diffusivity,
            half_thickness,
            spatial_points,
            time_steps,
            mass_transfer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant of the configuration
    pub fn validate(&self) -> DryingResult<()> {
        for (name, value) in [
            ("initial_moisture", self.initial_moisture),
            ("equilibrium_moisture", self.equilibrium_moisture),
            ("diffusivity", self.diffusivity),
            ("half_thickness", self.half_thickness),
            ("mass_transfer", self.mass_transfer),
        ] {
            if !value.is_finite() {
                return Err(DryingError::config(name, value, "must be finite"));
            }
        }

        if self.diffusivity <= 0.0 {
            return Err(DryingError::config(
                "diffusivity",
                self.diffusivity,
                "must be positive",
            ));
        }
        if self.half_thickness <= 0.0 {
            return Err(DryingError::config(
                "half_thickness",
                self.half_thickness,
                "must be positive",
            ));
        }
        if self.mass_transfer < 0.0 {
            return Err(DryingError::config(
                "mass_transfer",
                self.mass_transfer,
                "must be non-negative",
            ));
        }
        if self.spatial_points < MIN_SPATIAL_POINTS {
            return Err(DryingError::config(
                "spatial_points",
                self.spatial_points as f64,
                format!("at least {MIN_SPATIAL_POINTS} points are required by the boundary stencils"),
            ));
        }
        if self.time_steps == 0 {
            return Err(DryingError::config(
                "time_steps",
                0.0,
                "at least one time step is required",
            ));
        }

        Ok(())
    }

    // ====================================== Modifiers ============================================

    /// Copy of this configuration with another grid resolution
    pub fn with_spatial_points(self, spatial_points: usize) -> DryingResult<Self> {
        Self { spatial_points, ..self }.validated()
    }

    /// Copy of this configuration with another number of time steps
    pub fn with_time_steps(self, time_steps: usize) -> DryingResult<Self> {
        Self { time_steps, ..self }.validated()
    }

    /// Copy of this configuration with another mass-transfer coefficient
    pub fn with_mass_transfer(self, mass_transfer: f64) -> DryingResult<Self> {
        Self { mass_transfer, ..self }.validated()
    }

    /// Copy of this configuration with another diffusivity
    pub fn with_diffusivity(self, diffusivity: f64) -> DryingResult<Self> {
        Self { diffusivity, ..self }.validated()
    }

    fn validated(self) -> DryingResult<Self> {
        self.validate()?;
        Ok(self)
    }

    // ====================================== Accessors ============================================

    /// Initial moisture M_0
    pub fn initial_moisture(&self) -> f64 {
        self.initial_moisture
    }

    /// Equilibrium moisture M_eq
    pub fn equilibrium_moisture(&self) -> f64 {
        self.equilibrium_moisture
    }

    /// Effective diffusivity D \[m²/s\]
    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    /// Half-thickness L \[m\]
    pub fn half_thickness(&self) -> f64 {
        self.half_thickness
    }

    /// Number of spatial points N_x
    pub fn spatial_points(&self) -> usize {
        self.spatial_points
    }

    /// Number of time steps N_t
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    /// Mass-transfer coefficient h \[m/s\]
    pub fn mass_transfer(&self) -> f64 {
        self.mass_transfer
    }

    /// Mass-transfer Biot number `Bi = h·L/D`
    pub fn biot_number(&self) -> f64 {
        self.mass_transfer * self.half_thickness / self.diffusivity
    }

    /// Drying driving force `M_0 - M_eq`
    pub fn driving_force(&self) -> f64 {
        self.initial_moisture - self.equilibrium_moisture
    }
}

// =================================================================================================
// Tests
// =================================================================================================
