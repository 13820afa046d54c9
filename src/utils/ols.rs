//! Ordinary least squares line fitting.
//!
//! Used by the empirical confidence interval to model how forecast error
//! spread grows with the horizon.

use crate::error::{ForecastError, Result};

/// Fitted line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearFit {
    /// Evaluate the line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = intercept + slope * x` by least squares.
///
/// A single point (or constant `x`) yields a flat line through the mean of `y`.
pub fn ols_fit(x: &[f64], y: &[f64]) -> Result<LinearFit> {
    if x.len() != y.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: x.len(),
            got: y.len(),
        });
    }
    if x.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }

    let n = x.len() as f64;
    let x_mean = x.iter().sum::<f64>() / n;
    let y_mean = y.iter().sum::<f64>() / n;

    let sxx: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    let sxy: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - x_mean) * (yi - y_mean))
        .sum();

    if sxx.abs() < f64::EPSILON {
        return Ok(LinearFit {
            intercept: y_mean,
            slope: 0.0,
        });
    }

    let slope = sxy / sxx;
    Ok(LinearFit {
        intercept: y_mean - slope * x_mean,
        slope,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_line() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 0.5 + 2.0 * v).collect();

        let fit = ols_fit(&x, &y).unwrap();
        assert_relative_eq!(fit.intercept, 0.5, epsilon = 1e-12);
        assert_relative_eq!(fit.slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(fit.predict(10.0), 20.5, epsilon = 1e-12);
    }

    #[test]
    fn single_point_is_flat() {
        let fit = ols_fit(&[1.0], &[3.0]).unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 3.0);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            ols_fit(&[1.0, 2.0], &[1.0]),
            Err(ForecastError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            ols_fit(&[], &[]),
            Err(ForecastError::InsufficientData { .. })
        ));
    }
}
