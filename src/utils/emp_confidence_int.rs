//! Empirical confidence intervals from backtested forecast errors.
//!
//! A rolling-window backtest measures how the spread of forecast errors
//! grows with the horizon. A straight line fitted to the per-horizon
//! standard deviations is then extrapolated over the requested forecast
//! and scaled by a normal quantile.

use crate::core::{ForecastTable, Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PredictOptions};
use crate::utils::backtest::{BacktestConfig, BacktestResults, BacktesterRollingWindow};
use crate::utils::metrics::ErrorMetric;
use crate::utils::ols::{ols_fit, LinearFit};
use crate::utils::stats::{std_dev, z_score};
use tracing::{debug, info};

/// Configuration for [`EmpConfidenceInt`].
#[derive(Debug, Clone, PartialEq)]
pub struct EciConfig {
    pub error_methods: Vec<ErrorMetric>,
    pub train_percentage: f64,
    pub test_percentage: f64,
    pub sliding_steps: usize,
    /// Coverage of the interval, in `(0, 1)`.
    pub confidence_level: f64,
    /// Accepted for compatibility; folds always run sequentially.
    pub multi: bool,
    /// Frequency of the forecast dates; inferred from the data when unset.
    pub freq: Option<Frequency>,
}

impl Default for EciConfig {
    fn default() -> Self {
        Self {
            error_methods: vec![ErrorMetric::Mape],
            train_percentage: 70.0,
            test_percentage: 10.0,
            sliding_steps: 1,
            confidence_level: 0.8,
            multi: false,
            freq: None,
        }
    }
}

impl EciConfig {
    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.confidence_level = level;
        self
    }

    pub fn with_sliding_steps(mut self, steps: usize) -> Self {
        self.sliding_steps = steps;
        self
    }

    pub fn with_percentages(mut self, train: f64, test: f64) -> Self {
        self.train_percentage = train;
        self.test_percentage = test;
        self
    }

    pub fn with_error_methods(mut self, methods: Vec<ErrorMetric>) -> Self {
        self.error_methods = methods;
        self
    }

    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    fn backtest_config(&self) -> BacktestConfig {
        BacktestConfig {
            error_methods: self.error_methods.clone(),
            train_percentage: self.train_percentage,
            test_percentage: self.test_percentage,
            sliding_steps: self.sliding_steps,
            freq: self.freq,
        }
    }
}

/// Empirical confidence interval estimator for a re-fittable model.
///
/// # Example
/// ```
/// use holtwinters_forecast::core::TimeSeries;
/// use holtwinters_forecast::models::{HoltWintersModel, HoltWintersParams};
/// use holtwinters_forecast::utils::emp_confidence_int::{EciConfig, EmpConfidenceInt};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..60).map(|i| base + Duration::days(i)).collect();
/// let values: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
/// let ts = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let config = EciConfig::default().with_sliding_steps(6).with_confidence_level(0.95);
/// let eci = EmpConfidenceInt::<HoltWintersModel>::new(config, ts, HoltWintersParams::default())
///     .unwrap();
/// let table = eci.get_eci(5).unwrap();
///
/// assert_eq!(table.len(), 5);
/// let (lower, upper) = (table.fcst_lower().unwrap(), table.fcst_upper().unwrap());
/// assert!(lower.iter().zip(upper).all(|(l, u)| l <= u));
/// ```
#[derive(Debug, Clone)]
pub struct EmpConfidenceInt<M: ForecastModel> {
    config: EciConfig,
    backtester: BacktesterRollingWindow<M>,
    data: TimeSeries,
}

impl<M: ForecastModel> EmpConfidenceInt<M> {
    pub fn new(config: EciConfig, data: TimeSeries, params: M::Params) -> Result<Self> {
        let template = M::new(data.clone(), params)?;
        Self::from_template(config, data, template)
    }

    /// Backtest and final forecast both use `template`'s configuration.
    pub fn from_template(config: EciConfig, data: TimeSeries, template: M) -> Result<Self> {
        // Validates the level up front rather than after the backtest.
        z_score(config.confidence_level)?;
        let backtester = BacktesterRollingWindow::from_template(
            config.backtest_config(),
            data.clone(),
            template,
        )?;
        if config.multi {
            debug!("parallel backtesting is not available, folds run sequentially");
        }
        Ok(Self {
            config,
            backtester,
            data,
        })
    }

    pub fn config(&self) -> &EciConfig {
        &self.config
    }

    /// Run the rolling-window backtest.
    pub fn run_cv(&self) -> Result<BacktestResults> {
        self.backtester.run()
    }

    /// Sample standard deviation of the errors at each horizon step, across folds.
    pub fn horizon_std(results: &BacktestResults) -> Result<Vec<f64>> {
        if results.n_folds() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: results.n_folds(),
            });
        }
        let raw = results.raw_errors();
        let horizon = raw[0].len();
        Ok((0..horizon)
            .map(|h| {
                let at_h: Vec<f64> = raw.iter().map(|fold| fold[h]).collect();
                std_dev(&at_h)
            })
            .collect())
    }

    /// Backtest, then fit `std = intercept + slope * horizon` with horizons from 1.
    pub fn error_trend(&self) -> Result<LinearFit> {
        let results = self.run_cv()?;
        let stds = Self::horizon_std(&results)?;
        let horizons: Vec<f64> = (1..=stds.len()).map(|h| h as f64).collect();
        let fit = ols_fit(&horizons, &stds)?;
        debug!(
            folds = results.n_folds(),
            intercept = fit.intercept,
            slope = fit.slope,
            "fitted error spread against horizon"
        );
        Ok(fit)
    }

    /// Forecast `steps` periods with lower and upper bounds.
    pub fn get_eci(&self, steps: usize) -> Result<ForecastTable> {
        let trend = self.error_trend()?;
        let z = z_score(self.config.confidence_level)?;

        let mut model = self.backtester.template().with_data(self.data.clone())?;
        model.fit()?;
        let mut options = PredictOptions::default();
        if let Some(freq) = self.config.freq {
            options = options.with_freq(freq);
        }
        let forecast = model.predict(steps, &options)?.table;

        let spread: Vec<f64> = (1..=steps)
            .map(|h| z * trend.predict(h as f64).max(0.0))
            .collect();
        let lower = forecast.fcst().iter().zip(&spread).map(|(f, s)| f - s).collect();
        let upper = forecast.fcst().iter().zip(&spread).map(|(f, s)| f + s).collect();

        info!(
            steps,
            confidence_level = self.config.confidence_level,
            "computed empirical confidence interval"
        );
        ForecastTable::with_intervals(
            forecast.time().to_vec(),
            forecast.fcst().to_vec(),
            lower,
            upper,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoltWintersModel, HoltWintersParams};
    use crate::utils::backtest::{FoldResult, FoldSplit};
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn noisy_series(n: usize) -> TimeSeries {
        let values = (0..n)
            .map(|i| 100.0 + 0.3 * i as f64 + 4.0 * ((i * 7 % 11) as f64 - 5.0) / 5.0)
            .collect();
        TimeSeries::univariate(make_timestamps(n), values).unwrap()
    }

    fn fold(actual: Vec<f64>, predicted: Vec<f64>) -> FoldResult {
        FoldResult {
            split: FoldSplit {
                train_start: 0,
                train_end: 0,
                test_end: actual.len(),
            },
            actual,
            predicted,
            metrics: vec![],
        }
    }

    #[test]
    fn horizon_std_is_taken_across_folds() {
        let results = BacktestResults {
            folds: vec![
                fold(vec![1.0, 2.0], vec![0.0, 0.0]),
                fold(vec![3.0, 6.0], vec![0.0, 0.0]),
            ],
            errors: vec![],
        };
        let stds = EmpConfidenceInt::<HoltWintersModel>::horizon_std(&results).unwrap();
        assert_relative_eq!(stds[0], 2.0f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(stds[1], 8.0f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn horizon_std_needs_two_folds() {
        let results = BacktestResults {
            folds: vec![fold(vec![1.0], vec![0.0])],
            errors: vec![],
        };
        assert!(matches!(
            EmpConfidenceInt::<HoltWintersModel>::horizon_std(&results),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn bounds_are_symmetric_around_forecast() {
        let config = EciConfig::default()
            .with_sliding_steps(8)
            .with_confidence_level(0.9);
        let eci = EmpConfidenceInt::<HoltWintersModel>::new(
            config,
            noisy_series(60),
            HoltWintersParams::default(),
        )
        .unwrap();
        let table = eci.get_eci(7).unwrap();

        assert_eq!(table.len(), 7);
        let lower = table.fcst_lower().unwrap();
        let upper = table.fcst_upper().unwrap();
        for i in 0..7 {
            let f = table.fcst()[i];
            assert_relative_eq!(f - lower[i], upper[i] - f, epsilon = 1e-9);
            assert!(lower[i] <= f && f <= upper[i]);
        }
    }

    #[test]
    fn forecast_matches_model_fitted_on_all_data() {
        let ts = noisy_series(60);
        let config = EciConfig::default().with_sliding_steps(5);
        let eci = EmpConfidenceInt::<HoltWintersModel>::new(
            config,
            ts.clone(),
            HoltWintersParams::default(),
        )
        .unwrap();
        let table = eci.get_eci(4).unwrap();

        let mut model = HoltWintersModel::new(ts, HoltWintersParams::default()).unwrap();
        model.fit().unwrap();
        let plain = model.predict(4, &PredictOptions::default()).unwrap();

        assert_eq!(table.time(), plain.table.time());
        assert_eq!(table.fcst(), plain.table.fcst());
    }

    #[test]
    fn wider_confidence_gives_wider_bounds() {
        let width = |level: f64| {
            let config = EciConfig::default()
                .with_sliding_steps(6)
                .with_confidence_level(level);
            let eci = EmpConfidenceInt::<HoltWintersModel>::new(
                config,
                noisy_series(60),
                HoltWintersParams::default(),
            )
            .unwrap();
            let table = eci.get_eci(3).unwrap();
            table.fcst_upper().unwrap()[2] - table.fcst_lower().unwrap()[2]
        };
        assert!(width(0.95) >= width(0.5));
    }

    #[test]
    fn rejects_invalid_confidence_level() {
        for level in [0.0, 1.0, 1.5] {
            let config = EciConfig::default().with_confidence_level(level);
            assert!(EmpConfidenceInt::<HoltWintersModel>::new(
                config,
                noisy_series(60),
                HoltWintersParams::default()
            )
            .is_err());
        }
    }
}
