//! Average-moisture drying curve
//!
//! ```text
//! M_av(t) = (Σ row - ½·row[0] - ½·row[N-1]) / (N - 1)      trapezoid rule
//! MR(t)   = (M_av(t) - M_eq) / (M_0 - M_eq)                moisture ratio
//! ```
//!
//! `ln MR` is only taken where `MR > MR_THRESHOLD`. Points below the
//! threshold are dropped individually, so the kept series need not be
//! contiguous.

use ndarray::{Array1, ArrayView1};

use crate::error::{DryingError, DryingResult};
use crate::physics::SECONDS_PER_HOUR;
use crate::solver::{MoistureHistory, Simulation};

/// Smallest moisture ratio whose logarithm enters the analysis
pub const MR_THRESHOLD: f64 = 0.001;

/// Trapezoidal spatial average of one field on a uniform grid
///
/// Returns `NaN` for fewer than two points.
pub fn trapezoid_average(field: ArrayView1<'_, f64>) -> f64 {
    let n = field.len();
    if n < 2 {
        return f64::NAN;
    }
    (field.sum() - 0.5 * field[0] - 0.5 * field[n - 1]) / (n - 1) as f64
}

/// Drying curve of one simulation
#[derive(Debug, Clone, PartialEq)]
pub struct DryingCurve {
    times: Array1<f64>,
    average: Array1<f64>,
    moisture_ratio: Array1<f64>,
    valid: Vec<usize>,
    valid_times: Array1<f64>,
    ln_moisture_ratio: Array1<f64>,
}

impl DryingCurve {
    /// Curve of a completed simulation
    pub fn from_simulation(simulation: &Simulation) -> DryingResult<Self> {
        let config = simulation.config();
        Self::from_history(
            simulation.history(),
            simulation.grid().times(),
            config.initial_moisture(),
            config.equilibrium_moisture(),
        )
    }

    /// Curve of a recorded history sampled at `times`
    ///
    /// # Errors
    ///
    /// [`DryingError::Configuration`] when `times` does not match the
    /// number of recorded instants.
    pub fn from_history(
        history: &MoistureHistory,
        times: &Array1<f64>,
        initial_moisture: f64,
        equilibrium_moisture: f64,
    ) -> DryingResult<Self> {
        let average = Array1::from_iter(history.fields().map(trapezoid_average));
        Self::from_average(times.clone(), average, initial_moisture, equilibrium_moisture)
    }

    /// Curve of an already averaged series
    ///
    /// # Errors
    ///
    /// [`DryingError::Configuration`] when `times` and `average` differ in
    /// length.
    pub fn from_average(
        times: Array1<f64>,
        average: Array1<f64>,
        initial_moisture: f64,
        equilibrium_moisture: f64,
    ) -> DryingResult<Self> {
        if times.len() != average.len() {
            return Err(DryingError::config(
                "time_points",
                times.len() as f64,
                format!("expected one time per averaged field ({})", average.len()),
            ));
        }

        let driving_force = initial_moisture - equilibrium_moisture;
        let moisture_ratio = if driving_force == 0.0 {
            // Already at equilibrium
            Array1::zeros(average.len())
        } else {
            average.mapv(|m| (m - equilibrium_moisture) / driving_force)
        };

        let valid: Vec<usize> = moisture_ratio
            .iter()
            .enumerate()
            .filter(|&(_, &mr)| mr > MR_THRESHOLD)
            .map(|(i, _)| i)
            .collect();

        let valid_times = valid.iter().map(|&i| times[i]).collect();
        let ln_moisture_ratio = valid.iter().map(|&i| moisture_ratio[i].ln()).collect();

        Ok(Self {
            times,
            average,
            moisture_ratio,
            valid,
            valid_times,
            ln_moisture_ratio,
        })
    }

    /// All sample times \[s\]
    pub fn times(&self) -> &Array1<f64> {
        &self.times
    }

    /// All sample times \[h\]
    pub fn time_hours(&self) -> Array1<f64> {
        self.times.mapv(|t| t / SECONDS_PER_HOUR)
    }

    /// Spatially averaged moisture at every sample
    pub fn average_moisture(&self) -> &Array1<f64> {
        &self.average
    }

    /// Moisture ratio at every sample
    pub fn moisture_ratio(&self) -> &Array1<f64> {
        &self.moisture_ratio
    }

    /// Indices of the samples above [`MR_THRESHOLD`]
    pub fn valid_indices(&self) -> &[usize] {
        &self.valid
    }

    /// Times of the valid samples \[s\]
    pub fn valid_times(&self) -> &Array1<f64> {
        &self.valid_times
    }

    /// Times of the valid samples \[h\]
    pub fn valid_time_hours(&self) -> Array1<f64> {
        self.valid_times.mapv(|t| t / SECONDS_PER_HOUR)
    }

    /// `ln MR` of the valid samples
    pub fn ln_moisture_ratio(&self) -> &Array1<f64> {
        &self.ln_moisture_ratio
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the curve has no sample
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_trapezoid_average() {
        assert_relative_eq!(trapezoid_average(array![1.0, 1.0, 1.0].view()), 1.0);
        // Linear profile: exact
        assert_relative_eq!(trapezoid_average(array![0.0, 1.0, 2.0, 3.0].view()), 1.5);
        // Endpoints weigh half
        assert_relative_eq!(trapezoid_average(array![0.0, 1.0, 0.0].view()), 0.5);
        assert!(trapezoid_average(array![1.0].view()).is_nan());
    }

    #[test]
    fn test_moisture_ratio() {
        let curve =
            DryingCurve::from_average(array![0.0, 1.0, 2.0], array![0.4, 0.225, 0.05], 0.4, 0.05)
                .unwrap();

        assert_relative_eq!(curve.moisture_ratio()[0], 1.0);
        assert_relative_eq!(curve.moisture_ratio()[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(curve.moisture_ratio()[2], 0.0);
        // Equilibrium sample is masked out
        assert_eq!(curve.valid_indices(), &[0, 1]);
        assert_relative_eq!(curve.ln_moisture_ratio()[1], 0.5_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn test_mask_is_not_contiguous() {
        let curve = DryingCurve::from_average(
            array![0.0, 1.0, 2.0, 3.0],
            array![1.0, 0.0, 0.5, 0.0005],
            1.0,
            0.0,
        )
        .unwrap();

        assert_eq!(curve.valid_indices(), &[0, 2]);
        assert_eq!(curve.valid_times().to_vec(), vec![0.0, 2.0]);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let curve =
            DryingCurve::from_average(array![0.0, 1.0], array![1.0, MR_THRESHOLD], 1.0, 0.0)
                .unwrap();
        assert_eq!(curve.valid_indices(), &[0]);
    }

    #[test]
    fn test_zero_driving_force() {
        let curve =
            DryingCurve::from_average(array![0.0, 1.0], array![0.05, 0.05], 0.05, 0.05).unwrap();

        assert!(curve.moisture_ratio().iter().all(|&mr| mr == 0.0));
        assert!(curve.valid_indices().is_empty());
        assert!(curve.ln_moisture_ratio().is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let result = DryingCurve::from_average(array![0.0, 1.0], array![0.4], 0.4, 0.05);
        assert!(matches!(result, Err(DryingError::Configuration { .. })));
    }

    #[test]
    fn test_hours() {
        let curve =
            DryingCurve::from_average(array![0.0, 7200.0], array![0.4, 0.3], 0.4, 0.05).unwrap();
        assert_eq!(curve.time_hours().to_vec(), vec![0.0, 2.0]);
        assert_eq!(curve.valid_time_hours().to_vec(), vec![0.0, 2.0]);
        assert_eq!(curve.len(), 2);
        assert!(!curve.is_empty());
    }
}
