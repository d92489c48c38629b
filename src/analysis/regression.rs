//! Ordinary least-squares line fit

use crate::error::{DryingError, DryingResult};

/// Straight line `y = slope·x + intercept` fitted by least squares
///
/// Standard errors use `n - 2` degrees of freedom and are zero for a
/// two-point fit. When either sample variance is zero the correlation is
/// reported as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Slope of the fitted line
    pub slope: f64,
    /// Intercept at `x = 0`
    pub intercept: f64,
    /// Pearson correlation coefficient
    pub r_value: f64,
    /// Standard error of the slope
    pub slope_stderr: f64,
    /// Standard error of the intercept
    pub intercept_stderr: f64,
    /// Number of points fitted
    pub n: usize,
}

impl LinearFit {
    /// Fit `y` against `x`
    ///
    /// # Errors
    ///
    /// [`DryingError::InsufficientData`] with fewer than two points or when
    /// every `x` is the same, [`DryingError::Configuration`] when the slices
    /// differ in length.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drying_rs::analysis::LinearFit;
    ///
    /// let fit = LinearFit::fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
    /// assert!((fit.slope - 2.0).abs() < 1e-12);
    /// assert!((fit.intercept - 1.0).abs() < 1e-12);
    /// ```
    pub fn fit(x: &[f64], y: &[f64]) -> DryingResult<Self> {
        if x.len() != y.len() {
            return Err(DryingError::config(
                "regression_samples",
                y.len() as f64,
                format!("expected one y value per x value ({})", x.len()),
            ));
        }
        let n = x.len();
        if n < 2 {
            return Err(DryingError::insufficient("regression points", 2, n));
        }

        let count = n as f64;
        let x_mean = x.iter().sum::<f64>() / count;
        let y_mean = y.iter().sum::<f64>() / count;

        // Population (1/n) moments
        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (&xi, &yi) in x.iter().zip(y) {
            let (dx, dy) = (xi - x_mean, yi - y_mean);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        sxx /= count;
        syy /= count;
        sxy /= count;

        if sxx == 0.0 {
            return Err(DryingError::insufficient("distinct regression abscissae", 2, 1));
        }

        let slope = sxy / sxx;
        let intercept = y_mean - slope * x_mean;

        let r_value = if syy == 0.0 {
            0.0
        } else {
            (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
        };

        let (slope_stderr, intercept_stderr) = if n > 2 {
            let df = (n - 2) as f64;
            let slope_stderr = ((1.0 - r_value * r_value).max(0.0) * syy / sxx / df).sqrt();
            (slope_stderr, slope_stderr * (sxx + x_mean * x_mean).sqrt())
        } else {
            (0.0, 0.0)
        };

        Ok(Self {
            slope,
            intercept,
            r_value,
            slope_stderr,
            intercept_stderr,
            n,
        })
    }

    /// Coefficient of determination `r²`
    pub fn r_squared(&self) -> f64 {
        self.r_value * self.r_value
    }

    /// Value of the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
