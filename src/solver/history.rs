//! Recorded moisture fields
//!
//! A [`MoistureHistory`] is a `(N_t + 1) × N_x` array: row 0 is the initial
//! condition and row `n + 1` the field after step `n`. It is filled once,
//! row by row, by the engine and is read-only afterwards.

use nalgebra::DVector;
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::error::{DryingError, DryingResult};

/// Time × space record of a simulation
#[derive(Debug, Clone, PartialEq)]
pub struct MoistureHistory {
    values: Array2<f64>,
}

impl MoistureHistory {
    /// Wrap a complete `time × space` array
    ///
    /// # Errors
    ///
    /// [`DryingError::InsufficientData`] when the array has no row or fewer
    /// than two columns.
    pub fn from_array(values: Array2<f64>) -> DryingResult<Self> {
        let (rows, cols) = values.dim();
        if rows == 0 {
            return Err(DryingError::insufficient("moisture history", 1, 0));
        }
        if cols < 2 {
            return Err(DryingError::insufficient("spatial average", 2, cols));
        }
        Ok(Self { values })
    }

    /// Full array, rows are instants and columns grid points
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Number of recorded instants (`N_t + 1`)
    pub fn time_points(&self) -> usize {
        self.values.nrows()
    }

    /// Number of grid points (`N_x`)
    pub fn spatial_points(&self) -> usize {
        self.values.ncols()
    }

    /// Field at recorded instant `n`, if it exists
    pub fn field(&self, n: usize) -> Option<ArrayView1<'_, f64>> {
        (n < self.time_points()).then(|| self.values.row(n))
    }

    /// Initial field (row 0)
    pub fn initial_field(&self) -> ArrayView1<'_, f64> {
        self.values.row(0)
    }

    /// Last recorded field
    pub fn final_field(&self) -> ArrayView1<'_, f64> {
        self.values.row(self.time_points() - 1)
    }

    /// Iterate over the recorded fields in time order
    pub fn fields(&self) -> impl Iterator<Item = ArrayView1<'_, f64>> {
        self.values.axis_iter(Axis(0))
    }

    /// Grid index closest to `fraction · L`
    ///
    /// Uses `round(fraction · (N_x - 1))` clamped to the grid.
    ///
    /// # Errors
    ///
    /// [`DryingError::OutOfBounds`] when `fraction` is outside `[0, 1]`
    /// (NaN included).
    pub fn index_for_fraction(&self, fraction: f64) -> DryingResult<usize> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(DryingError::OutOfBounds { fraction });
        }
        let last = self.spatial_points() - 1;
        let index = (fraction * last as f64).round() as usize;
        Ok(index.min(last))
    }

    /// Moisture time series at position `fraction · L`
    ///
    /// # Example
    ///
    /// ```rust
    /// use drying_rs::solver::MoistureHistory;
    /// use ndarray::array;
    ///
    /// let history = MoistureHistory::from_array(array![[0.4, 0.4, 0.4], [0.35, 0.3, 0.2]]).unwrap();
    ///
    /// assert_eq!(history.cut_at(1.0).unwrap().to_vec(), vec![0.4, 0.2]);
    /// assert!(history.cut_at(1.5).is_err());
    /// ```
    pub fn cut_at(&self, fraction: f64) -> DryingResult<Array1<f64>> {
        let index = self.index_for_fraction(fraction)?;
        Ok(self.values.column(index).to_owned())
    }

    /// Time series at several positions, failing on the first invalid one
    pub fn cuts(&self, fractions: &[f64]) -> DryingResult<Vec<Array1<f64>>> {
        fractions.iter().map(|&fraction| self.cut_at(fraction)).collect()
    }

    /// Smallest and largest recorded moisture
    pub fn bounds(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| (lo.min(m), hi.max(m)))
    }
}

// =================================================================================================
// Recorder
// =================================================================================================

/// Append-only writer used by the engine while stepping
#[derive(Debug)]
pub(crate) struct HistoryRecorder {
    values: Array2<f64>,
    filled: usize,
}

impl HistoryRecorder {
    /// Preallocate `rows × cols`
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            values: Array2::zeros((rows, cols)),
            filled: 0,
        }
    }

    /// Record the next field
    pub(crate) fn push(&mut self, field: &DVector<f64>) {
        debug_assert!(self.filled < self.values.nrows(), "history is already full");
        debug_assert_eq!(field.len(), self.values.ncols());

        self.values
            .row_mut(self.filled)
            .iter_mut()
            .zip(field.iter())
            .for_each(|(slot, &m)| *slot = m);
        self.filled += 1;
    }

    /// Number of rows recorded so far
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.filled
    }

    /// Seal the record
    pub(crate) fn finish(self) -> DryingResult<MoistureHistory> {
        if self.filled != self.values.nrows() {
            return Err(DryingError::insufficient(
                "moisture history",
                self.values.nrows(),
                self.filled,
            ));
        }
        MoistureHistory::from_array(self.values)
    }
}

// =================================================================================================
// Tests
// =================================================================================================
