//! Rolling-window backtesting for forecasting models.

use crate::core::{Frequency, TimeSeries};
use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, PredictOptions};
use crate::utils::metrics::ErrorMetric;
use tracing::debug;

/// Configuration for a rolling-window backtest.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Metrics evaluated on every fold.
    pub error_methods: Vec<ErrorMetric>,
    /// Training window size as a percentage of the series length.
    pub train_percentage: f64,
    /// Test window size as a percentage of the series length.
    pub test_percentage: f64,
    /// Number of folds; fold `i` starts `i` observations into the series.
    pub sliding_steps: usize,
    /// Frequency passed to each fold's forecast.
    pub freq: Option<Frequency>,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            error_methods: vec![ErrorMetric::Mape],
            train_percentage: 70.0,
            test_percentage: 10.0,
            sliding_steps: 1,
            freq: None,
        }
    }
}

impl BacktestConfig {
    pub fn with_error_methods(mut self, methods: Vec<ErrorMetric>) -> Self {
        self.error_methods = methods;
        self
    }

    pub fn with_percentages(mut self, train: f64, test: f64) -> Self {
        self.train_percentage = train;
        self.test_percentage = test;
        self
    }

    pub fn with_sliding_steps(mut self, steps: usize) -> Self {
        self.sliding_steps = steps;
        self
    }

    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.train_percentage > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "training percentage must be positive, got {}",
                self.train_percentage
            )));
        }
        if !(self.test_percentage > 0.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "testing percentage must be positive, got {}",
                self.test_percentage
            )));
        }
        if self.train_percentage + self.test_percentage > 100.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "training and testing percentages exceed 100: {} + {}",
                self.train_percentage, self.test_percentage
            )));
        }
        if self.sliding_steps == 0 {
            return Err(ForecastError::InvalidParameter(
                "sliding_steps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Index ranges of one fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldSplit {
    pub train_start: usize,
    pub train_end: usize,
    pub test_end: usize,
}

/// Outcome of a single fold.
#[derive(Debug, Clone)]
pub struct FoldResult {
    pub split: FoldSplit,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    /// Metric values in the configured order.
    pub metrics: Vec<(ErrorMetric, f64)>,
}

impl FoldResult {
    /// Actual minus predicted, one entry per horizon step.
    pub fn raw_errors(&self) -> Vec<f64> {
        self.actual
            .iter()
            .zip(&self.predicted)
            .map(|(a, p)| a - p)
            .collect()
    }
}

/// Results of a rolling-window backtest.
#[derive(Debug, Clone)]
pub struct BacktestResults {
    pub folds: Vec<FoldResult>,
    /// Each metric averaged over folds, in the configured order.
    pub errors: Vec<(ErrorMetric, f64)>,
}

impl BacktestResults {
    pub fn n_folds(&self) -> usize {
        self.folds.len()
    }

    /// Raw errors indexed as `[fold][horizon step]`.
    pub fn raw_errors(&self) -> Vec<Vec<f64>> {
        self.folds.iter().map(FoldResult::raw_errors).collect()
    }

    /// Mean value of `metric`, if it was evaluated.
    pub fn error(&self, metric: ErrorMetric) -> Option<f64> {
        self.errors
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, v)| *v)
    }
}

/// Backtests a model by re-fitting its configuration on sliding training
/// windows.
///
/// # Example
/// ```
/// use holtwinters_forecast::core::TimeSeries;
/// use holtwinters_forecast::models::{HoltWintersModel, HoltWintersParams};
/// use holtwinters_forecast::utils::backtest::{BacktestConfig, BacktesterRollingWindow};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamps: Vec<_> = (0..40).map(|i| base + Duration::days(i)).collect();
/// let values: Vec<f64> = (0..40).map(|i| 20.0 + i as f64).collect();
/// let ts = TimeSeries::univariate(timestamps, values).unwrap();
///
/// let config = BacktestConfig::default().with_sliding_steps(4);
/// let backtester =
///     BacktesterRollingWindow::<HoltWintersModel>::new(config, ts, HoltWintersParams::default())
///         .unwrap();
/// let results = backtester.run().unwrap();
///
/// assert_eq!(results.n_folds(), 4);
/// assert_eq!(results.raw_errors()[0].len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct BacktesterRollingWindow<M: ForecastModel> {
    config: BacktestConfig,
    data: TimeSeries,
    template: M,
}

impl<M: ForecastModel> BacktesterRollingWindow<M> {
    pub fn new(config: BacktestConfig, data: TimeSeries, params: M::Params) -> Result<Self> {
        let template = M::new(data.clone(), params)?;
        Self::from_template(config, data, template)
    }

    /// Backtest folds are built with `template.with_data`, so they share its
    /// configuration (a custom solver, for instance).
    pub fn from_template(config: BacktestConfig, data: TimeSeries, template: M) -> Result<Self> {
        config.validate()?;
        if config.error_methods.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "at least one error method is required".to_string(),
            ));
        }
        Ok(Self {
            config,
            data,
            template,
        })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// The unfitted model every fold is configured from.
    pub fn template(&self) -> &M {
        &self.template
    }

    /// Training and test sizes for the stored series.
    pub fn window_sizes(&self) -> (usize, usize) {
        let n = self.data.len() as f64;
        let train = (n * self.config.train_percentage / 100.0).floor() as usize;
        let test = (n * self.config.test_percentage / 100.0).floor() as usize;
        (train, test)
    }

    /// Index ranges of every fold.
    pub fn splits(&self) -> Result<Vec<FoldSplit>> {
        let (train, test) = self.window_sizes();
        if train == 0 || test == 0 {
            return Err(ForecastError::InsufficientData {
                needed: self.minimum_length(),
                got: self.data.len(),
            });
        }

        let limit = self.data.len() - train - test;
        if self.config.sliding_steps > limit + 1 {
            return Err(ForecastError::InvalidParameter(format!(
                "too many sliding steps: {} folds of {} + {} points need {} observations, got {}",
                self.config.sliding_steps,
                train,
                test,
                train + test + self.config.sliding_steps - 1,
                self.data.len()
            )));
        }

        Ok((0..self.config.sliding_steps)
            .map(|i| FoldSplit {
                train_start: i,
                train_end: i + train,
                test_end: i + train + test,
            })
            .collect())
    }

    /// Fit and score every fold in order.
    pub fn run(&self) -> Result<BacktestResults> {
        let splits = self.splits()?;
        let values = self.data.primary_values();
        let mut options = PredictOptions::default();
        if let Some(freq) = self.config.freq {
            options = options.with_freq(freq);
        }

        let mut folds = Vec::with_capacity(splits.len());
        for split in splits {
            let train = self.data.slice(split.train_start, split.train_end)?;
            let mut model = self.template.with_data(train)?;
            model.fit()?;

            let horizon = split.test_end - split.train_end;
            let forecast = model.predict(horizon, &options)?;
            let predicted = forecast.table.fcst().to_vec();
            let actual = values[split.train_end..split.test_end].to_vec();
            let training = &values[split.train_start..split.train_end];

            let metrics = self
                .config
                .error_methods
                .iter()
                .map(|m| Ok((*m, m.compute(&actual, &predicted, training)?)))
                .collect::<Result<Vec<_>>>()?;

            folds.push(FoldResult {
                split,
                actual,
                predicted,
                metrics,
            });
        }

        let n_folds = folds.len() as f64;
        let errors = self
            .config
            .error_methods
            .iter()
            .enumerate()
            .map(|(i, m)| (*m, folds.iter().map(|f| f.metrics[i].1).sum::<f64>() / n_folds))
            .collect::<Vec<_>>();

        debug!(
            model = std::any::type_name::<M>(),
            folds = folds.len(),
            errors = ?errors,
            "completed rolling-window backtest"
        );

        Ok(BacktestResults { folds, errors })
    }

    fn minimum_length(&self) -> usize {
        let share = self.config.train_percentage.min(self.config.test_percentage);
        (100.0 / share).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoltWintersModel, HoltWintersParams};
    use approx::assert_relative_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    fn linear_series(n: usize) -> TimeSeries {
        let values = (0..n).map(|i| 10.0 + 2.0 * i as f64).collect();
        TimeSeries::univariate(make_timestamps(n), values).unwrap()
    }

    fn backtester(
        config: BacktestConfig,
        n: usize,
    ) -> Result<BacktesterRollingWindow<HoltWintersModel>> {
        BacktesterRollingWindow::new(config, linear_series(n), HoltWintersParams::default())
    }

    #[test]
    fn splits_slide_by_one_observation() {
        let bt = backtester(BacktestConfig::default().with_sliding_steps(3), 50).unwrap();
        assert_eq!(bt.window_sizes(), (35, 5));

        let splits = bt.splits().unwrap();
        assert_eq!(splits.len(), 3);
        assert_eq!(
            splits[2],
            FoldSplit {
                train_start: 2,
                train_end: 37,
                test_end: 42
            }
        );
    }

    #[test]
    fn linear_trend_backtests_without_error() {
        let config = BacktestConfig::default()
            .with_sliding_steps(5)
            .with_error_methods(vec![ErrorMetric::Mae, ErrorMetric::Mape]);
        let results = backtester(config, 50).unwrap().run().unwrap();

        assert_eq!(results.n_folds(), 5);
        for row in results.raw_errors() {
            assert_eq!(row.len(), 5);
            for e in row {
                assert_relative_eq!(e, 0.0, epsilon = 1e-6);
            }
        }
        assert_relative_eq!(results.error(ErrorMetric::Mae).unwrap(), 0.0, epsilon = 1e-6);
        assert!(results.error(ErrorMetric::Rmse).is_none());
    }

    #[test]
    fn folds_reuse_the_template_solver() {
        use crate::models::exponential::{ExponentialSmoothing, SmoothingParams};
        use crate::models::{FittedSmoother, SmoothingSolver};

        let solver = ExponentialSmoothing::with_fixed_params(SmoothingParams {
            alpha: 0.3,
            beta: Some(0.05),
            gamma: None,
            phi: None,
        });
        let params = HoltWintersParams::default();
        let data = linear_series(50);
        let template =
            HoltWintersModel::with_solver(data.clone(), params.clone(), solver.clone()).unwrap();
        let bt = BacktesterRollingWindow::from_template(
            BacktestConfig::default().with_sliding_steps(2),
            data.clone(),
            template,
        )
        .unwrap();
        let results = bt.run().unwrap();

        for fold in &results.folds {
            let train = &data.primary_values()[fold.split.train_start..fold.split.train_end];
            let expected = solver.fit(train, &params).unwrap().forecast(fold.predicted.len());
            assert_eq!(fold.predicted, expected);
        }
    }

    #[test]
    fn rejects_invalid_percentages() {
        assert!(backtester(BacktestConfig::default().with_percentages(0.0, 10.0), 50).is_err());
        assert!(backtester(BacktestConfig::default().with_percentages(70.0, 0.0), 50).is_err());
        assert!(backtester(BacktestConfig::default().with_percentages(80.0, 30.0), 50).is_err());
        assert!(backtester(BacktestConfig::default().with_sliding_steps(0), 50).is_err());
        assert!(backtester(BacktestConfig::default().with_error_methods(vec![]), 50).is_err());
    }

    #[test]
    fn too_many_sliding_steps() {
        // 50 points: 35 train + 5 test leaves room for 11 folds.
        assert!(backtester(BacktestConfig::default().with_sliding_steps(11), 50)
            .unwrap()
            .splits()
            .is_ok());
        let err = backtester(BacktestConfig::default().with_sliding_steps(12), 50)
            .unwrap()
            .splits()
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidParameter(_)));
    }

    #[test]
    fn empty_test_window_is_insufficient_data() {
        let err = backtester(BacktestConfig::default(), 9)
            .unwrap()
            .run()
            .unwrap_err();
        assert!(matches!(err, ForecastError::InsufficientData { .. }));
    }
}
