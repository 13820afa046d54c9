//! Options accepted by [`crate::models::ForecastModel::predict`].

use crate::core::Frequency;
use crate::utils::metrics::ErrorMetric;
use serde::{Deserialize, Serialize};

/// Options for a forecast request.
///
/// Setting `alpha` switches on the empirical confidence interval; the
/// backtest fields only matter on that path.
///
/// # Example
/// ```
/// use holtwinters_forecast::models::PredictOptions;
/// use holtwinters_forecast::core::Frequency;
///
/// let options = PredictOptions::default()
///     .with_freq(Frequency::daily())
///     .with_alpha(0.05)
///     .with_include_history(true);
/// assert_eq!(options.train_percentage, 70.0);
/// assert_eq!(options.sliding_steps_for(100), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictOptions {
    /// Prepend in-sample predictions for the observed timestamps.
    pub include_history: bool,
    /// Frequency of the forecast dates; inferred from the data when unset.
    pub freq: Option<Frequency>,
    /// Significance level of the confidence interval.
    pub alpha: Option<f64>,
    /// Metrics the interval backtest evaluates.
    pub error_methods: Vec<ErrorMetric>,
    /// Share of the series in each training window, in percent.
    pub train_percentage: f64,
    /// Share of the series in each test window, in percent.
    pub test_percentage: f64,
    /// Number of backtest folds; one fifth of the series length when unset.
    pub sliding_steps: Option<usize>,
    /// Accepted for compatibility. Interval backtests always run sequentially.
    pub multi: bool,
}

impl Default for PredictOptions {
    fn default() -> Self {
        Self {
            include_history: false,
            freq: None,
            alpha: None,
            error_methods: vec![ErrorMetric::Mape],
            train_percentage: 70.0,
            test_percentage: 10.0,
            sliding_steps: None,
            multi: true,
        }
    }
}

impl PredictOptions {
    pub fn with_include_history(mut self, include_history: bool) -> Self {
        self.include_history = include_history;
        self
    }

    pub fn with_freq(mut self, freq: Frequency) -> Self {
        self.freq = Some(freq);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_error_methods(mut self, methods: Vec<ErrorMetric>) -> Self {
        self.error_methods = methods;
        self
    }

    pub fn with_train_percentage(mut self, percentage: f64) -> Self {
        self.train_percentage = percentage;
        self
    }

    pub fn with_test_percentage(mut self, percentage: f64) -> Self {
        self.test_percentage = percentage;
        self
    }

    pub fn with_sliding_steps(mut self, steps: usize) -> Self {
        self.sliding_steps = Some(steps);
        self
    }

    pub fn with_multi(mut self, multi: bool) -> Self {
        self.multi = multi;
        self
    }

    /// Fold count for a series of length `n`.
    pub fn sliding_steps_for(&self, n: usize) -> usize {
        self.sliding_steps.unwrap_or(n / 5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = PredictOptions::default();
        assert!(!options.include_history);
        assert!(options.freq.is_none());
        assert!(options.alpha.is_none());
        assert_eq!(options.error_methods, vec![ErrorMetric::Mape]);
        assert_eq!(options.test_percentage, 10.0);
        assert!(options.multi);
    }

    #[test]
    fn sliding_steps_default_to_a_fifth_of_length() {
        let options = PredictOptions::default();
        assert_eq!(options.sliding_steps_for(30), 6);
        assert_eq!(options.sliding_steps_for(34), 6);
        assert_eq!(options.sliding_steps_for(4), 0);
        assert_eq!(options.with_sliding_steps(3).sliding_steps_for(30), 3);
    }

    #[test]
    fn deserializes_partial_options() {
        let json = r#"{"alpha": 0.1, "freq": "D", "error_methods": ["mae", "smape"]}"#;
        let options: PredictOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.alpha, Some(0.1));
        assert_eq!(options.freq, Some(Frequency::daily()));
        assert_eq!(options.error_methods, vec![ErrorMetric::Mae, ErrorMetric::Smape]);
        assert_eq!(options.train_percentage, 70.0);
    }
}
