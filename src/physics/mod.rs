//! Physical problem definition
//!
//! This module describes WHAT is simulated: a slab of half-thickness `L`
//! drying by diffusion towards a surface that exchanges moisture with the
//! surrounding air.
//!
//! ```text
//!   x = 0                                   x = L
//!   ┃ symmetry plane                  surface ┃  air at M_eq
//!   ┃ ∂M/∂x = 0      ∂M/∂t = D ∂²M/∂x²         ┃  -D ∂M/∂x = h (M - M_eq)
//!   ┃                                          ┃
//! ```
//!
//! - [`SimulationConfig`]: the seven validated scalar inputs
//! - [`Grid`]: spatial and temporal coordinates derived from the inputs
//! - [`DiscretizationState`]: stencil constants (`alpha`, `beta`)
//!
//! The numerical method lives in [`crate::solver`].

pub mod config;
pub mod grid;

pub use config::{MIN_SPATIAL_POINTS, SimulationConfig};
pub use grid::{DiscretizationState, FOURIER_NUMBER, Grid, SECONDS_PER_HOUR};
