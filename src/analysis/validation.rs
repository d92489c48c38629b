//! Tail regression and diffusivity recovery
//!
//! # Model
//!
//! Far enough into drying, the first term of the series solution for a
//! slab dominates:
//!
//! ```text
//! ln MR ≈ const - λ₁²·D·t / L²        λ₁·tan(λ₁) = Bi,   Bi = h·L/D
//! ```
//!
//! so `ln MR` is linear in `t` on the tail of the curve. The tail is the
//! second half (by index) of the valid samples.

use std::f64::consts::FRAC_PI_2;

use ndarray::{Array1, s};

use crate::analysis::curve::DryingCurve;
use crate::analysis::regression::LinearFit;
use crate::error::{DryingError, DryingResult};

/// `r²` below which a validation is logged as a poor log-linear fit
pub const LOW_R_SQUARED: f64 = 0.99;

/// Relative change at which the diffusivity fixed point stops
pub const DIFFUSIVITY_TOLERANCE: f64 = 1e-10;

/// Iteration cap of the diffusivity fixed point
pub const MAX_DIFFUSIVITY_ITERATIONS: usize = 100;

/// First index of the regression tail in a series of `len` valid samples
pub fn tail_start(len: usize) -> usize {
    len / 2
}

// =================================================================================================
// Validation result
// =================================================================================================

/// Log-linear fit of the drying-curve tail
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    fit: LinearFit,
    tail_times: Array1<f64>,
    tail_ln_moisture_ratio: Array1<f64>,
}

impl ValidationResult {
    /// Slope of `ln MR` against time \[1/s\]
    pub fn slope(&self) -> f64 {
        self.fit.slope
    }

    /// Intercept of `ln MR` at `t = 0`
    pub fn intercept(&self) -> f64 {
        self.fit.intercept
    }

    /// Coefficient of determination of the tail fit
    pub fn r_squared(&self) -> f64 {
        self.fit.r_squared()
    }

    /// Full regression statistics
    pub fn fit(&self) -> &LinearFit {
        &self.fit
    }

    /// Times of the fitted tail \[s\]
    pub fn tail_times(&self) -> &Array1<f64> {
        &self.tail_times
    }

    /// `ln MR` of the fitted tail
    pub fn tail_ln_moisture_ratio(&self) -> &Array1<f64> {
        &self.tail_ln_moisture_ratio
    }
}

/// Regress the tail of a drying curve
///
/// # Errors
///
/// [`DryingError::InsufficientData`] when fewer than two valid samples
/// remain in the tail.
pub fn validate(curve: &DryingCurve) -> DryingResult<ValidationResult> {
    let valid = curve.valid_times().len();
    let start = tail_start(valid);
    let available = valid - start;
    if available < 2 {
        return Err(DryingError::insufficient("regression tail points", 2, available));
    }

    let tail_times = curve.valid_times().slice(s![start..]).to_owned();
    let tail_ln_moisture_ratio = curve.ln_moisture_ratio().slice(s![start..]).to_owned();

    let fit = LinearFit::fit(&tail_times.to_vec(), &tail_ln_moisture_ratio.to_vec())?;

    log::debug!(
        "tail regression on {} of {valid} valid points: slope={:e} intercept={:.4} r²={:.6}",
        fit.n,
        fit.slope,
        fit.intercept,
        fit.r_squared()
    );
    if fit.r_squared() < LOW_R_SQUARED {
        log::warn!(
            "drying tail is not log-linear (r² = {:.4} < {LOW_R_SQUARED})",
            fit.r_squared()
        );
    }

    Ok(ValidationResult {
        fit,
        tail_times,
        tail_ln_moisture_ratio,
    })
}

// =================================================================================================
// Diffusivity recovery
// =================================================================================================

/// First positive root of `λ·tan(λ) = biot`
///
/// The root lies in `(0, π/2)` and is found by bisection. An infinite Biot
/// number gives `π/2`.
///
/// # Errors
///
/// [`DryingError::Configuration`] when `biot` is not positive.
pub fn first_eigenvalue(biot: f64) -> DryingResult<f64> {
    if biot.is_nan() || biot <= 0.0 {
        return Err(DryingError::config("biot", biot, "must be positive"));
    }
    if biot.is_infinite() {
        return Ok(FRAC_PI_2);
    }

    let (mut lo, mut hi) = (0.0_f64, FRAC_PI_2);
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if mid * mid.tan() < biot {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= f64::EPSILON * hi {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Diffusivity implied by a tail slope for a known Biot number
///
/// ```text
/// D = -slope · L² / λ₁²
/// ```
///
/// # Errors
///
/// [`DryingError::InsufficientData`] when the slope does not describe a
/// decay, [`DryingError::Configuration`] for a non-positive thickness or
/// Biot number.
pub fn diffusivity_from_slope(slope: f64, half_thickness: f64, biot: f64) -> DryingResult<f64> {
    if !(slope.is_finite() && slope < 0.0) {
        return Err(DryingError::insufficient("decaying tail slope", 1, 0));
    }
    if !(half_thickness.is_finite() && half_thickness > 0.0) {
        return Err(DryingError::config("half_thickness", half_thickness, "must be positive"));
    }

    let lambda = first_eigenvalue(biot)?;
    Ok(-slope * half_thickness * half_thickness / (lambda * lambda))
}

/// Effective diffusivity from a validation when only `h` is known
///
/// `Bi = h·L/D` depends on the unknown `D`, so the estimate is refined by
/// fixed-point iteration, starting from the infinite-Biot value.
///
/// # Errors
///
/// [`DryingError::Configuration`] for a non-positive `mass_transfer` (a
/// sealed surface leaves no Biot number to refine), otherwise the errors of
/// [`diffusivity_from_slope`].
///
/// # Example
///
/// ```rust
/// use drying_rs::analysis::validation::{diffusivity_from_slope, first_eigenvalue};
///
/// let lambda = first_eigenvalue(1.0).unwrap();
/// assert!((lambda * lambda.tan() - 1.0).abs() < 1e-12);
///
/// let d = diffusivity_from_slope(-lambda * lambda * 1e-10 / 1e-4, 0.01, 1.0).unwrap();
/// assert!((d - 1e-10).abs() < 1e-20);
/// ```
pub fn estimate_diffusivity(
    validation: &ValidationResult,
    half_thickness: f64,
    mass_transfer: f64,
) -> DryingResult<f64> {
    if !(mass_transfer.is_finite() && mass_transfer > 0.0) {
        return Err(DryingError::config(
            "mass_transfer",
            mass_transfer,
            "diffusivity refinement needs a positive mass-transfer coefficient",
        ));
    }

    let slope = validation.slope();
    let mut diffusivity = diffusivity_from_slope(slope, half_thickness, f64::INFINITY)?;

    for iteration in 1..=MAX_DIFFUSIVITY_ITERATIONS {
        let biot = mass_transfer * half_thickness / diffusivity;
        let next = diffusivity_from_slope(slope, half_thickness, biot)?;
        let change = (next - diffusivity).abs() / next;
        diffusivity = next;

        if change < DIFFUSIVITY_TOLERANCE {
            log::debug!(
                "diffusivity {diffusivity:e} m²/s after {iteration} iterations (Bi={biot:.4})"
            );
            return Ok(diffusivity);
        }
    }

    log::warn!(
        "diffusivity estimate did not settle within {MAX_DIFFUSIVITY_ITERATIONS} iterations, \
         returning {diffusivity:e}"
    );
    Ok(diffusivity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn synthetic_curve(k: f64, samples: usize, spacing: f64) -> DryingCurve {
        let (m0, meq) = (0.4, 0.05);
        let times = Array1::from_iter((0..samples).map(|i| i as f64 * spacing));
        let average = times.mapv(|t| meq + (m0 - meq) * (k * t).exp());
        DryingCurve::from_average(times, average, m0, meq).unwrap()
    }

    #[test]
    fn test_recovers_exponential_rate() {
        let k = -2.0e-6;
        let curve = synthetic_curve(k, 400, 10_000.0);

        let validation = validate(&curve).unwrap();

        assert_relative_eq!(validation.slope(), k, max_relative = 1e-8);
        assert_relative_eq!(validation.intercept(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(validation.r_squared(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_tail_is_second_half_of_valid_points() {
        // MR drops below the threshold after t = ln(1000)/|k| ≈ 3.45e6 s
        let curve = synthetic_curve(-2.0e-6, 400, 10_000.0);
        let valid = curve.valid_times().len();
        assert!(valid < 400);

        let validation = validate(&curve).unwrap();

        assert_eq!(validation.fit().n, valid - valid / 2);
        assert_eq!(validation.tail_times()[0], curve.valid_times()[valid / 2]);
        assert_eq!(validation.tail_ln_moisture_ratio().len(), validation.fit().n);
    }

    #[test]
    fn test_tail_start() {
        assert_eq!(tail_start(0), 0);
        assert_eq!(tail_start(3), 1);
        assert_eq!(tail_start(134), 67);
    }

    #[test]
    fn test_too_few_tail_points() {
        // Three valid samples: tail of two is enough, two samples leave one
        assert!(validate(&synthetic_curve(-1e-3, 3, 1.0)).is_ok());
        assert!(matches!(
            validate(&synthetic_curve(-1e-3, 2, 1.0)),
            Err(DryingError::InsufficientData { available: 1, .. })
        ));
    }

    #[test]
    fn test_eigenvalue_limits() {
        assert_relative_eq!(first_eigenvalue(f64::INFINITY).unwrap(), FRAC_PI_2);
        // Small Biot: λ² ≈ Bi
        let small = first_eigenvalue(1e-6).unwrap();
        assert_relative_eq!(small * small, 1e-6, max_relative = 1e-5);
        // Large Biot approaches π/2 from below
        let large = first_eigenvalue(1e6).unwrap();
        assert!(large < FRAC_PI_2 && FRAC_PI_2 - large < 1e-5);

        for biot in [0.0, -1.0, f64::NAN] {
            assert!(first_eigenvalue(biot).is_err());
        }
    }

    #[test]
    fn test_eigenvalue_solves_characteristic_equation() {
        for biot in [0.1, 1.0, 10.0, 100.0] {
            let lambda = first_eigenvalue(biot).unwrap();
            assert_relative_eq!(lambda * lambda.tan(), biot, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_diffusivity_needs_decay() {
        assert!(matches!(
            diffusivity_from_slope(0.0, 0.01, 1.0),
            Err(DryingError::InsufficientData { .. })
        ));
        assert!(diffusivity_from_slope(1e-6, 0.01, 1.0).is_err());
        assert!(diffusivity_from_slope(-1e-6, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_infinite_biot_is_crank_relation() {
        let d = diffusivity_from_slope(-1e-6, 0.01, f64::INFINITY).unwrap();
        let crank = 1e-6 * 4.0 * 1e-4 / std::f64::consts::PI.powi(2);
        assert_relative_eq!(d, crank, max_relative = 1e-12);
    }

    #[test]
    fn test_fixed_point_recovers_consistent_diffusivity() {
        // Build a tail slope from a known D and h, then recover D from h alone
        let (d, l, h) = (1e-10, 0.01, 1e-7);
        let lambda = first_eigenvalue(h * l / d).unwrap();
        let k = -lambda * lambda * d / (l * l);

        let validation = validate(&synthetic_curve(k, 400, 10_000.0)).unwrap();
        let estimate = estimate_diffusivity(&validation, l, h).unwrap();

        assert_relative_eq!(estimate, d, max_relative = 1e-6);
    }

    #[test]
    fn test_sealed_surface_has_no_biot_refinement() {
        // A sealed slab's round-off slope can still pass the decay check
        let validation = validate(&synthetic_curve(-1e-6, 400, 10_000.0)).unwrap();

        for h in [0.0, -1e-7, f64::NAN] {
            match estimate_diffusivity(&validation, 0.01, h) {
                Err(DryingError::Configuration { parameter, .. }) => {
                    assert_eq!(parameter, "mass_transfer")
                }
                other => panic!("h = {h}: expected Configuration, got {other:?}"),
            }
        }
    }
}
