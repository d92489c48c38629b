//! Error types for the drying simulation pipeline
//!
//! Every fallible operation in the crate returns [`DryingResult`]. The
//! pipeline is deterministic, so none of these errors is transient: each one
//! points at a configuration or usage mistake and is surfaced immediately.
//!
//! # Example
//!
//! ```rust
//! use drying_rs::error::{DryingError, DryingResult};
//!
//! fn check_points(n_x: usize) -> DryingResult<()> {
//!     if n_x < 3 {
//!         return Err(DryingError::config("n_x", n_x as f64, "at least 3 points are required"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_points(2).is_err());
//! ```

use thiserror::Error;

/// Result alias used throughout the crate
pub type DryingResult<T> = Result<T, DryingError>;

/// Errors raised by the drying simulation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DryingError {
    // =============================================================================================
    // Configuration
    // =============================================================================================

    /// A physical or grid parameter is invalid
    #[error("invalid configuration: {parameter}={value} ({reason})")]
    Configuration {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Value that was supplied
        value: f64,
        /// Why the value was rejected
        reason: String,
    },

    // =============================================================================================
    // Usage order
    // =============================================================================================

    /// An operation was requested in the wrong simulation state
    #[error("invalid state: {operation} requires a {required} simulation")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the operation needs ("solved" or "unsolved")
        required: &'static str,
    },

    /// A spatial sampling position lies outside the slab
    #[error("sampling position {fraction} L is out of bounds (expected 0 <= x <= 1)")]
    OutOfBounds {
        /// Requested position as a fraction of the half-thickness
        fraction: f64,
    },

    // =============================================================================================
    // Numerics
    // =============================================================================================

    /// The linear system could not be solved
    #[error("singular system: {reason}")]
    SingularSystem {
        /// Diagnostic message (pivot index, non-finite value, ...)
        reason: String,
    },

    /// Not enough valid samples survived the mask and tail selection
    #[error("insufficient data: {what} needs at least {required} points, got {available}")]
    InsufficientData {
        /// Stage that ran out of data
        what: &'static str,
        /// Minimum number of points
        required: usize,
        /// Points actually available
        available: usize,
    },
}

impl DryingError {
    /// Build a configuration error
    pub fn config(parameter: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::Configuration {
            parameter,
            value,
            reason: reason.into(),
        }
    }

    /// Build an error for an operation that needs a solved simulation
    pub fn unsolved(operation: &'static str) -> Self {
        Self::InvalidState {
            operation,
            required: "solved",
        }
    }

    /// Build an error for an operation that needs a fresh simulation
    pub fn already_solved(operation: &'static str) -> Self {
        Self::InvalidState {
            operation,
            required: "unsolved",
        }
    }

    /// Build a singular-system error
    pub fn singular(reason: impl Into<String>) -> Self {
        Self::SingularSystem {
            reason: reason.into(),
        }
    }

    /// Build an insufficient-data error
    pub fn insufficient(what: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            what,
            required,
            available,
        }
    }
}

// =================================================================================================
// Tests
// =================================================================================================
