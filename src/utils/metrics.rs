//! Error metrics for backtest evaluation.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error metric computed on each backtest fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMetric {
    /// Mean Absolute Error
    Mae,
    /// Mean Squared Error
    Mse,
    /// Root Mean Squared Error
    Rmse,
    /// Mean Absolute Percentage Error
    Mape,
    /// Symmetric Mean Absolute Percentage Error
    Smape,
    /// Mean Absolute Scaled Error, scaled by the in-sample naive forecast
    Mase,
}

impl ErrorMetric {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorMetric::Mae => "mae",
            ErrorMetric::Mse => "mse",
            ErrorMetric::Rmse => "rmse",
            ErrorMetric::Mape => "mape",
            ErrorMetric::Smape => "smape",
            ErrorMetric::Mase => "mase",
        }
    }

    /// Evaluate this metric. `training` is only consulted by MASE.
    pub fn compute(&self, actual: &[f64], predicted: &[f64], training: &[f64]) -> Result<f64> {
        if actual.is_empty() || predicted.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if actual.len() != predicted.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: actual.len(),
                got: predicted.len(),
            });
        }

        Ok(match self {
            ErrorMetric::Mae => mae(actual, predicted),
            ErrorMetric::Mse => mse(actual, predicted),
            ErrorMetric::Rmse => mse(actual, predicted).sqrt(),
            ErrorMetric::Mape => mape(actual, predicted),
            ErrorMetric::Smape => smape(actual, predicted),
            ErrorMetric::Mase => mase(actual, predicted, training),
        })
    }
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorMetric {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mae" => Ok(ErrorMetric::Mae),
            "mse" => Ok(ErrorMetric::Mse),
            "rmse" => Ok(ErrorMetric::Rmse),
            "mape" => Ok(ErrorMetric::Mape),
            "smape" => Ok(ErrorMetric::Smape),
            "mase" => Ok(ErrorMetric::Mase),
            other => Err(ForecastError::InvalidParameter(format!(
                "unsupported error metric: {}",
                other
            ))),
        }
    }
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n
}

/// Calculate MSE between two slices.
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n
}

/// MAPE as a fraction; infinite when an actual value is zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .sum::<f64>()
        / n
}

/// SMAPE as a fraction in `[0, 2]`.
pub fn smape(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len() as f64;
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| {
            let denom = a.abs() + p.abs();
            if denom == 0.0 {
                0.0
            } else {
                2.0 * (a - p).abs() / denom
            }
        })
        .sum::<f64>()
        / n
}

/// MAE scaled by the mean absolute one-step change of `training`.
pub fn mase(actual: &[f64], predicted: &[f64], training: &[f64]) -> f64 {
    if training.len() < 2 {
        return f64::NAN;
    }
    let naive = training
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .sum::<f64>()
        / (training.len() - 1) as f64;
    mae(actual, predicted) / naive
}
