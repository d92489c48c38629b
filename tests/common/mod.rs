//! Common utilities for integration tests

pub mod scenarios;
pub mod test_helpers;

// Re-export commonly used items
pub use scenarios::{equilibrium_config, fine_config, reference_config, sealed_config};
pub use test_helpers::{
    assert_histories_close,
    assert_strictly_decreasing,
    relative_error,
    symmetry_residuals,
};
