//! # holtwinters-forecast
//!
//! Holt-Winters (triple exponential smoothing) forecasting for univariate
//! time series.
//!
//! Provides the [`models::HoltWintersModel`] orchestrator with a bundled
//! exponential smoothing solver, empirical confidence intervals estimated
//! from rolling-window backtests, calendar-aware frequencies for forecast
//! dates, and a default hyperparameter search space for tuners.

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod plotting;
pub mod tuning;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{ForecastResult, ForecastTable, Frequency, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{ForecastModel, HoltWintersModel, HoltWintersParams, PredictOptions};
    pub use crate::utils::ErrorMetric;
}
