//! Helper functions for integration tests

use drying_rs::solver::{MoistureHistory, SYMMETRY_STENCIL};
use ndarray::Array1;

/// Assert that two histories agree point by point (within tolerance)
pub fn assert_histories_close(
    a: &MoistureHistory,
    b: &MoistureHistory,
    tolerance: f64,
    message: &str,
) {
    assert_eq!(a.values().dim(), b.values().dim(), "{}: Dimension mismatch", message);

    for ((index, &va), &vb) in a.values().indexed_iter().zip(b.values().iter()) {
        let diff = (va - vb).abs();
        assert!(
            diff < tolerance,
            "{}: Element {:?} differs by {} (tolerance {})",
            message, index, diff, tolerance
        );
    }
}

/// Assert that every sample is strictly smaller than the previous one
pub fn assert_strictly_decreasing(series: &Array1<f64>, message: &str) {
    for (i, pair) in series.to_vec().windows(2).enumerate() {
        assert!(
            pair[1] < pair[0],
            "{}: sample {} ({}) does not decrease from {}",
            message, i + 1, pair[1], pair[0]
        );
    }
}

/// One-sided derivative stencil at x = 0 applied to every recorded field
pub fn symmetry_residuals(history: &MoistureHistory) -> Vec<f64> {
    history
        .fields()
        .map(|field| {
            SYMMETRY_STENCIL
                .iter()
                .zip(field.iter())
                .map(|(c, m)| c * m)
                .sum()
        })
        .collect()
}

/// Relative error |a - b| / |b|
pub fn relative_error(a: f64, b: f64) -> f64 {
    (a - b).abs() / b.abs()
}
