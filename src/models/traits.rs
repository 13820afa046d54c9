//! Interfaces shared by forecasting models and the smoothing solvers behind them.

use crate::core::{ForecastResult, TimeSeries};
use crate::error::Result;
use crate::models::holt_winters::HoltWintersParams;
use crate::models::options::PredictOptions;

/// A model that is constructed from data and parameters, fitted, and then
/// asked for forecasts.
///
/// The backtester and the empirical confidence interval only talk to models
/// through this trait. They clone an unfitted model's configuration onto each
/// training window with [`ForecastModel::with_data`].
pub trait ForecastModel: Sized {
    /// Parameter object the model is configured with.
    type Params: Clone + std::fmt::Debug;

    /// Create an unfitted model over `data`.
    fn new(data: TimeSeries, params: Self::Params) -> Result<Self>;

    /// An unfitted model configured like `self`, over `data`.
    fn with_data(&self, data: TimeSeries) -> Result<Self>;

    /// Fit the model to its data.
    fn fit(&mut self) -> Result<()>;

    /// Forecast `steps` periods past the end of the data.
    fn predict(&self, steps: usize, options: &PredictOptions) -> Result<ForecastResult>;

    /// Whether [`ForecastModel::fit`] has succeeded.
    fn is_fitted(&self) -> bool;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Fits a smoothing model to a univariate series.
pub trait SmoothingSolver {
    /// Handle produced by a successful fit.
    type Fitted: FittedSmoother;

    /// Estimate a model with the structure described by `params`.
    fn fit(&self, values: &[f64], params: &HoltWintersParams) -> Result<Self::Fitted>;
}

/// A fitted smoothing model.
pub trait FittedSmoother {
    /// Point forecasts for the `steps` periods after the sample.
    fn forecast(&self, steps: usize) -> Vec<f64>;

    /// Predictions for positions `start..=end`, counted from the first
    /// observation. Positions inside the sample are one-step-ahead fitted
    /// values; positions past it continue into forecasts.
    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>>;

    /// One-step-ahead in-sample predictions.
    fn fitted_values(&self) -> &[f64];

    /// Observed minus fitted values.
    fn residuals(&self) -> &[f64];
}
