//! Holt-Winters forecasting model.
//!
//! Wraps a [`SmoothingSolver`] with the validation, date handling and output
//! assembly a forecasting workflow needs:
//!
//! - the input must be a univariate [`TimeSeries`]
//! - forecasts are timestamped with the series frequency, given or inferred
//! - setting `alpha` adds empirical confidence bounds from a rolling backtest
//! - `include_history` prepends the in-sample predictions

use crate::core::{ForecastResult, ForecastTable, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::exponential::ExponentialSmoothing;
use crate::models::holt_winters::HoltWintersParams;
use crate::models::options::PredictOptions;
use crate::models::traits::{FittedSmoother, ForecastModel, SmoothingSolver};
use crate::plotting::{ChartRenderer, ForecastChart};
use crate::tuning::{holtwinters_search_space, SearchParameter};
use crate::utils::emp_confidence_int::{EciConfig, EmpConfidenceInt};
use std::fmt;
use tracing::{debug, error, info};

const MODEL_NAME: &str = "HoltWinters";

/// Holt-Winters (triple exponential smoothing) forecasting model.
///
/// # Example
/// ```
/// use holtwinters_forecast::core::TimeSeries;
/// use holtwinters_forecast::models::{HoltWintersModel, HoltWintersParams, PredictOptions};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..28).map(|i| base + Duration::days(i)).collect();
/// let values: Vec<f64> = (0..28)
///     .map(|i| 100.0 + i as f64 + [5.0, 2.0, 0.0, -1.0, -2.0, -3.0, -1.0][i % 7])
///     .collect();
/// let ts = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let params = HoltWintersParams::new(Some("add"), false, Some("add"), Some(7)).unwrap();
/// let mut model = HoltWintersModel::new(ts, params).unwrap();
/// model.fit().unwrap();
///
/// let result = model.predict(7, &PredictOptions::default()).unwrap();
/// assert_eq!(result.table.len(), 7);
/// assert_eq!(result.table.time()[0], base + Duration::days(28));
/// ```
pub struct HoltWintersModel<S: SmoothingSolver = ExponentialSmoothing> {
    data: TimeSeries,
    params: HoltWintersParams,
    solver: S,
    fitted: Option<S::Fitted>,
}

impl HoltWintersModel<ExponentialSmoothing> {
    /// Create an unfitted model using the bundled solver.
    pub fn new(data: TimeSeries, params: HoltWintersParams) -> Result<Self> {
        Self::with_solver(data, params, ExponentialSmoothing::new())
    }

    /// Default hyperparameter search space.
    pub fn parameter_search_space() -> Vec<SearchParameter> {
        holtwinters_search_space()
    }
}

impl<S: SmoothingSolver + Clone + Default> HoltWintersModel<S> {
    /// Create an unfitted model that fits with `solver`.
    ///
    /// Confidence interval backtests re-fit with a clone of `solver`.
    pub fn with_solver(data: TimeSeries, params: HoltWintersParams, solver: S) -> Result<Self> {
        if data.dimensions() != 1 {
            let err = ForecastError::UnivariateRequired {
                dimensions: data.dimensions(),
            };
            error!(error = %err, "cannot build Holt-Winters model");
            return Err(err);
        }

        Ok(Self {
            data,
            params,
            solver,
            fitted: None,
        })
    }

    /// Estimate the smoothing parameters, replacing any earlier fit.
    pub fn fit(&mut self) -> Result<()> {
        debug!(params = ?self.params, n = self.data.len(), "fitting Holt-Winters model");
        self.fitted = None;
        let fitted = self.solver.fit(self.data.primary_values(), &self.params)?;
        self.fitted = Some(fitted);
        info!(n = self.data.len(), "fitted Holt-Winters model");
        Ok(())
    }

    /// Forecast `steps` periods after the last observation.
    pub fn predict(&self, steps: usize, options: &PredictOptions) -> Result<ForecastResult> {
        let fitted = self.fitted.as_ref().ok_or(ForecastError::FitRequired)?;
        if steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "steps must be positive".to_string(),
            ));
        }

        let freq = match options.freq {
            Some(freq) => freq,
            None => self.data.infer_frequency()?,
        };
        let last = self.data.last_timestamp().ok_or(ForecastError::EmptyData)?;
        let dates = freq.future_dates(last, steps)?;

        let table = match options.alpha {
            None => {
                debug!(steps, %freq, "forecasting without confidence interval");
                ForecastTable::new(dates.clone(), fitted.forecast(steps))?
            }
            Some(alpha) => {
                let config = EciConfig {
                    error_methods: options.error_methods.clone(),
                    train_percentage: options.train_percentage,
                    test_percentage: options.test_percentage,
                    sliding_steps: options.sliding_steps_for(self.data.len()),
                    confidence_level: 1.0 - alpha,
                    multi: false,
                    freq: Some(freq),
                };
                debug!(
                    steps,
                    %freq,
                    alpha,
                    sliding_steps = config.sliding_steps,
                    "forecasting with empirical confidence interval"
                );
                let template = self.with_data(self.data.clone())?;
                EmpConfidenceInt::from_template(config, self.data.clone(), template)?
                    .get_eci(steps)?
            }
        };

        let table = if options.include_history {
            let n = self.data.len();
            let history =
                ForecastTable::new(self.data.timestamps().to_vec(), fitted.predict(0, n - 1)?)?;
            history.concat(table)
        } else {
            table
        };

        info!(
            steps,
            rows = table.len(),
            include_history = options.include_history,
            "generated forecast"
        );

        Ok(ForecastResult {
            table,
            dates,
            freq,
            alpha: options.alpha,
            include_history: options.include_history,
        })
    }

    /// Render `result` against the observed data.
    pub fn plot<R: ChartRenderer>(&self, result: &ForecastResult, renderer: &mut R) -> Result<()> {
        let chart = ForecastChart::new(MODEL_NAME, &self.data, result);
        debug!(
            points = chart.forecast.len(),
            band = chart.has_band(),
            "plotting forecast"
        );
        renderer.render(&chart)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn data(&self) -> &TimeSeries {
        &self.data
    }

    pub fn params(&self) -> &HoltWintersParams {
        &self.params
    }

    /// The fitted solver result, if [`HoltWintersModel::fit`] has succeeded.
    pub fn fitted_params(&self) -> Option<&S::Fitted> {
        self.fitted.as_ref()
    }

    pub fn fitted_values(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.fitted_values())
    }

    pub fn residuals(&self) -> Option<&[f64]> {
        self.fitted.as_ref().map(|f| f.residuals())
    }
}

impl<S: SmoothingSolver + Clone + Default> ForecastModel for HoltWintersModel<S> {
    type Params = HoltWintersParams;

    fn new(data: TimeSeries, params: HoltWintersParams) -> Result<Self> {
        Self::with_solver(data, params, S::default())
    }

    fn with_data(&self, data: TimeSeries) -> Result<Self> {
        Self::with_solver(data, self.params.clone(), self.solver.clone())
    }

    fn fit(&mut self) -> Result<()> {
        HoltWintersModel::fit(self)
    }

    fn predict(&self, steps: usize, options: &PredictOptions) -> Result<ForecastResult> {
        HoltWintersModel::predict(self, steps, options)
    }

    fn is_fitted(&self) -> bool {
        HoltWintersModel::is_fitted(self)
    }

    fn name(&self) -> &str {
        MODEL_NAME
    }
}

impl<S: SmoothingSolver> fmt::Display for HoltWintersModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MODEL_NAME)
    }
}

impl<S: SmoothingSolver> fmt::Debug for HoltWintersModel<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoltWintersModel")
            .field("params", &self.params)
            .field("n", &self.data.len())
            .field("fitted", &self.fitted.is_some())
            .finish()
    }
}
