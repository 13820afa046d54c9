//! Holt-Winters exponential smoothing solver.
//!
//! Covers every combination of trend (none, additive, multiplicative, each
//! optionally damped) and seasonality (none, additive, multiplicative).
//! Smoothing parameters are estimated by minimizing the in-sample one-step
//! sum of squared errors with bounded Nelder-Mead.
//!
//! State equations, with `⊕`/`⊗` the additive or multiplicative combination
//! of the configured components and `m` the season length:
//!
//! ```text
//! ŷ_t = (l_{t-1} ⊕ φ b_{t-1}) ⊗ s_{t-m}
//! l_t = α (y_t ⊘ s_{t-m}) + (1 - α) (l_{t-1} ⊕ φ b_{t-1})
//! b_t = β (l_t ⊖ l_{t-1}) + (1 - β) φ b_{t-1}
//! s_t = γ (y_t ⊘ l_t) + (1 - γ) s_{t-m}
//! ```

use crate::error::{ForecastError, Result};
use crate::models::holt_winters::{ComponentType, HoltWintersParams};
use crate::models::traits::{FittedSmoother, SmoothingSolver};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use tracing::debug;

const SMOOTHING_BOUNDS: (f64, f64) = (0.0001, 0.9999);
const PHI_BOUNDS: (f64, f64) = (0.8, 0.98);

/// Estimated (or fixed) smoothing parameters.
///
/// `beta` is present only with a trend, `gamma` only with seasonality and
/// `phi` only when the trend is damped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub phi: Option<f64>,
}

/// Solver configuration.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Optimizer settings for parameter estimation.
    pub optimizer: NelderMeadConfig,
    /// Use these parameters instead of estimating them.
    pub fixed: Option<SmoothingParams>,
}

/// The bundled Holt-Winters solver.
///
/// # Example
/// ```
/// use holtwinters_forecast::models::exponential::ExponentialSmoothing;
/// use holtwinters_forecast::models::holt_winters::HoltWintersParams;
/// use holtwinters_forecast::models::{FittedSmoother, SmoothingSolver};
///
/// let values: Vec<f64> = (0..24)
///     .map(|i| 50.0 + i as f64 + [3.0, -1.0, -4.0, 2.0][i % 4])
///     .collect();
/// let params = HoltWintersParams::new(Some("add"), false, Some("add"), Some(4)).unwrap();
///
/// let fitted = ExponentialSmoothing::new().fit(&values, &params).unwrap();
/// assert_eq!(fitted.forecast(8).len(), 8);
/// assert_eq!(fitted.fitted_values().len(), values.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExponentialSmoothing {
    config: SolverConfig,
}

impl ExponentialSmoothing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Skip estimation and smooth with the given parameters.
    pub fn with_fixed_params(params: SmoothingParams) -> Self {
        Self {
            config: SolverConfig {
                fixed: Some(params),
                ..SolverConfig::default()
            },
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }
}

impl SmoothingSolver for ExponentialSmoothing {
    type Fitted = HoltWintersResults;

    fn fit(&self, values: &[f64], params: &HoltWintersParams) -> Result<HoltWintersResults> {
        let structure = Structure::resolve(params)?;
        structure.check_data(values)?;

        let initial = structure.initial_state(values);
        let smoothing = match self.config.fixed {
            Some(fixed) => structure.complete(fixed),
            None => structure.estimate(values, &initial, &self.config.optimizer),
        };

        let run = structure.filter(values, &initial, &smoothing);
        if !run.sse.is_finite() {
            return Err(ForecastError::ComputationError(
                "smoothing produced non-finite fitted values".to_string(),
            ));
        }

        let n = values.len();
        let residuals: Vec<f64> = values.iter().zip(&run.fitted).map(|(y, f)| y - f).collect();
        let k = (structure.n_smoothing_params() + structure.n_initial_states()) as f64;
        let log_lik_term = n as f64 * (run.sse.max(f64::MIN_POSITIVE) / n as f64).ln();

        debug!(
            n,
            alpha = smoothing.alpha,
            beta = ?smoothing.beta,
            gamma = ?smoothing.gamma,
            phi = ?smoothing.phi,
            sse = run.sse,
            "fitted exponential smoothing"
        );

        Ok(HoltWintersResults {
            structure,
            params: smoothing,
            level: run.level,
            trend: run.trend,
            seasonals: run.seasonals,
            fitted: run.fitted,
            residuals,
            sse: run.sse,
            aic: log_lik_term + 2.0 * k,
            bic: log_lik_term + k * (n as f64).ln(),
        })
    }
}

/// Result of fitting [`ExponentialSmoothing`].
#[derive(Debug, Clone)]
pub struct HoltWintersResults {
    structure: Structure,
    params: SmoothingParams,
    level: f64,
    trend: f64,
    // Indexed by seasonal phase, i.e. position modulo the season length.
    seasonals: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
    sse: f64,
    aic: f64,
    bic: f64,
}

impl HoltWintersResults {
    pub fn params(&self) -> SmoothingParams {
        self.params
    }

    /// Final level state.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Final trend state, `None` without a trend component.
    pub fn trend(&self) -> Option<f64> {
        self.structure.trend.map(|_| self.trend)
    }

    /// Final seasonal states for the last full season, oldest first.
    pub fn seasonals(&self) -> Option<Vec<f64>> {
        self.structure.seasonal?;
        let m = self.structure.period;
        let n = self.fitted.len();
        Some((0..m).map(|i| self.seasonals[(n + i) % m]).collect())
    }

    pub fn sse(&self) -> f64 {
        self.sse
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }
}

impl FittedSmoother for HoltWintersResults {
    fn forecast(&self, steps: usize) -> Vec<f64> {
        let n = self.fitted.len();
        let phi = self.params.phi.unwrap_or(1.0);
        let mut damped_sum = 0.0;
        let mut phi_power = 1.0;

        (1..=steps)
            .map(|h| {
                phi_power *= phi;
                damped_sum += phi_power;
                let base = self.structure.project(self.level, self.trend, damped_sum);
                let season = self.seasonals[(n + h - 1) % self.structure.period];
                self.structure.seasonalize(base, season)
            })
            .collect()
    }

    fn predict(&self, start: usize, end: usize) -> Result<Vec<f64>> {
        if end < start {
            return Err(ForecastError::InvalidParameter(format!(
                "prediction end {} is before start {}",
                end, start
            )));
        }

        let n = self.fitted.len();
        let mut out: Vec<f64> = if start < n {
            self.fitted[start..=end.min(n - 1)].to_vec()
        } else {
            Vec::new()
        };
        if end >= n {
            let future = self.forecast(end + 1 - n);
            let skip = start.saturating_sub(n);
            out.extend_from_slice(&future[skip..]);
        }
        Ok(out)
    }

    fn fitted_values(&self) -> &[f64] {
        &self.fitted
    }

    fn residuals(&self) -> &[f64] {
        &self.residuals
    }
}

/// Model structure validated against the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Structure {
    trend: Option<ComponentType>,
    damped: bool,
    seasonal: Option<ComponentType>,
    // 1 without seasonality, so phase arithmetic stays uniform.
    period: usize,
}

/// Pre-sample states the recursion starts from.
#[derive(Debug, Clone)]
struct InitialState {
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
}

struct FilterRun {
    fitted: Vec<f64>,
    level: f64,
    trend: f64,
    seasonals: Vec<f64>,
    sse: f64,
}

impl Structure {
    fn resolve(params: &HoltWintersParams) -> Result<Self> {
        let trend = params.trend();
        let seasonal = params.seasonal();

        if params.damped() && trend.is_none() {
            return Err(ForecastError::InvalidParameter(
                "damped requires a trend component".to_string(),
            ));
        }

        let period = match (seasonal, params.seasonal_periods()) {
            (None, _) => 1,
            (Some(_), None) => {
                return Err(ForecastError::InvalidParameter(
                    "seasonal_periods must be set when a seasonal component is used".to_string(),
                ))
            }
            (Some(_), Some(m)) if m < 2 => {
                return Err(ForecastError::InvalidParameter(format!(
                    "seasonal_periods must be at least 2, got {}",
                    m
                )))
            }
            (Some(_), Some(m)) => m,
        };

        Ok(Self {
            trend,
            damped: params.damped(),
            seasonal,
            period,
        })
    }

    fn check_data(&self, values: &[f64]) -> Result<()> {
        if values.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let needed = if self.seasonal.is_some() {
            2 * self.period
        } else {
            2
        };
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidParameter(
                "series contains missing or infinite values".to_string(),
            ));
        }

        let multiplicative = self.trend.map_or(false, |c| c.is_multiplicative())
            || self.seasonal.map_or(false, |c| c.is_multiplicative());
        if multiplicative && values.iter().any(|&v| v <= 0.0) {
            return Err(ForecastError::InvalidParameter(
                "multiplicative components require strictly positive data".to_string(),
            ));
        }
        Ok(())
    }

    fn n_smoothing_params(&self) -> usize {
        1 + usize::from(self.trend.is_some())
            + usize::from(self.seasonal.is_some())
            + usize::from(self.damped)
    }

    fn n_initial_states(&self) -> usize {
        1 + usize::from(self.trend.is_some())
            + if self.seasonal.is_some() { self.period } else { 0 }
    }

    /// Level combined with `damped_sum` periods of trend.
    fn project(&self, level: f64, trend: f64, damped_sum: f64) -> f64 {
        match self.trend {
            None => level,
            Some(ComponentType::Additive) => level + damped_sum * trend,
            Some(ComponentType::Multiplicative) => level * trend.powf(damped_sum),
        }
    }

    fn seasonalize(&self, base: f64, season: f64) -> f64 {
        match self.seasonal {
            None => base,
            Some(ComponentType::Additive) => base + season,
            Some(ComponentType::Multiplicative) => base * season,
        }
    }

    fn deseasonalize(&self, value: f64, season: f64) -> f64 {
        match self.seasonal {
            None => value,
            Some(ComponentType::Additive) => value - season,
            Some(ComponentType::Multiplicative) => value / season,
        }
    }

    fn neutral_trend(&self) -> f64 {
        match self.trend {
            Some(ComponentType::Multiplicative) => 1.0,
            _ => 0.0,
        }
    }

    fn initial_state(&self, values: &[f64]) -> InitialState {
        if self.seasonal.is_none() {
            let trend = match self.trend {
                None => self.neutral_trend(),
                Some(ComponentType::Additive) => values[1] - values[0],
                Some(ComponentType::Multiplicative) => values[1] / values[0],
            };
            // Step back one period so the first one-step prediction is y_0.
            let level = match self.trend {
                None => values[0],
                Some(ComponentType::Additive) => values[0] - trend,
                Some(ComponentType::Multiplicative) => values[0] / trend,
            };
            return InitialState {
                level,
                trend,
                seasonals: vec![self.neutral_season()],
            };
        }

        let m = self.period;
        let first = values[..m].iter().sum::<f64>() / m as f64;
        let second = values[m..2 * m].iter().sum::<f64>() / m as f64;

        let trend = match self.trend {
            None => self.neutral_trend(),
            Some(ComponentType::Additive) => (second - first) / m as f64,
            Some(ComponentType::Multiplicative) => (second / first).powf(1.0 / m as f64),
        };

        // The first-season mean sits mid-season; move it back to before t = 0.
        let offset = (m as f64 + 1.0) / 2.0;
        let level = match self.trend {
            None => first,
            Some(ComponentType::Additive) => first - trend * offset,
            Some(ComponentType::Multiplicative) => first / trend.powf(offset),
        };

        // Indices are measured against the trend line, then normalized.
        let mut seasonals: Vec<f64> = values[..m]
            .iter()
            .enumerate()
            .map(|(i, &v)| self.deseasonalize(v, self.project(level, trend, (i + 1) as f64)))
            .collect();
        let mean = seasonals.iter().sum::<f64>() / m as f64;
        match self.seasonal {
            Some(ComponentType::Multiplicative) => seasonals.iter_mut().for_each(|s| *s /= mean),
            _ => seasonals.iter_mut().for_each(|s| *s -= mean),
        }

        InitialState {
            level,
            trend,
            seasonals,
        }
    }

    fn neutral_season(&self) -> f64 {
        match self.seasonal {
            Some(ComponentType::Multiplicative) => 1.0,
            _ => 0.0,
        }
    }

    fn filter(&self, values: &[f64], init: &InitialState, p: &SmoothingParams) -> FilterRun {
        let alpha = p.alpha;
        let beta = p.beta.unwrap_or(0.0);
        let gamma = p.gamma.unwrap_or(0.0);
        let phi = p.phi.unwrap_or(1.0);
        let m = self.period;

        let mut level = init.level;
        let mut trend = init.trend;
        let mut seasonals = init.seasonals.clone();
        let mut fitted = Vec::with_capacity(values.len());
        let mut sse = 0.0;

        for (t, &y) in values.iter().enumerate() {
            let season = seasonals[t % m];
            let base = self.project(level, trend, phi);
            let prediction = self.seasonalize(base, season);
            fitted.push(prediction);
            sse += (y - prediction).powi(2);

            let new_level = alpha * self.deseasonalize(y, season) + (1.0 - alpha) * base;
            trend = match self.trend {
                None => trend,
                Some(ComponentType::Additive) => {
                    beta * (new_level - level) + (1.0 - beta) * phi * trend
                }
                Some(ComponentType::Multiplicative) => {
                    beta * (new_level / level) + (1.0 - beta) * trend.powf(phi)
                }
            };
            seasonals[t % m] = match self.seasonal {
                None => season,
                Some(ComponentType::Additive) => gamma * (y - new_level) + (1.0 - gamma) * season,
                Some(ComponentType::Multiplicative) => {
                    gamma * (y / new_level) + (1.0 - gamma) * season
                }
            };
            level = new_level;
        }

        FilterRun {
            fitted,
            level,
            trend,
            seasonals,
            sse,
        }
    }

    /// Decode an optimizer point laid out as `[alpha, beta?, gamma?, phi?]`.
    fn decode(&self, x: &[f64]) -> SmoothingParams {
        let mut iter = x.iter().copied();
        let alpha = iter.next().unwrap_or(SMOOTHING_BOUNDS.0);
        let beta = self.trend.and_then(|_| iter.next());
        let gamma = self.seasonal.and_then(|_| iter.next());
        let phi = if self.damped { iter.next() } else { None };
        SmoothingParams {
            alpha,
            beta,
            gamma,
            phi,
        }
    }

    fn search_start(&self) -> (Vec<f64>, Vec<(f64, f64)>) {
        let mut start = vec![0.3];
        let mut bounds = vec![SMOOTHING_BOUNDS];
        if self.trend.is_some() {
            start.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        if self.seasonal.is_some() {
            start.push(0.1);
            bounds.push(SMOOTHING_BOUNDS);
        }
        if self.damped {
            start.push(PHI_BOUNDS.1);
            bounds.push(PHI_BOUNDS);
        }
        (start, bounds)
    }

    fn estimate(
        &self,
        values: &[f64],
        init: &InitialState,
        optimizer: &NelderMeadConfig,
    ) -> SmoothingParams {
        let (start, bounds) = self.search_start();
        let objective = |x: &[f64]| {
            let sse = self.filter(values, init, &self.decode(x)).sse;
            if sse.is_finite() {
                sse
            } else {
                f64::MAX
            }
        };

        let result = nelder_mead(objective, &start, Some(&bounds), optimizer.clone());
        debug!(
            iterations = result.iterations,
            converged = result.converged,
            "estimated smoothing parameters"
        );
        self.decode(&result.optimal_point)
    }

    /// Fill in and clamp user-fixed parameters so they match this structure.
    fn complete(&self, fixed: SmoothingParams) -> SmoothingParams {
        let clamp = |v: f64, (lo, hi): (f64, f64)| v.clamp(lo, hi);
        SmoothingParams {
            alpha: clamp(fixed.alpha, SMOOTHING_BOUNDS),
            beta: self
                .trend
                .map(|_| clamp(fixed.beta.unwrap_or(0.1), SMOOTHING_BOUNDS)),
            gamma: self
                .seasonal
                .map(|_| clamp(fixed.gamma.unwrap_or(0.1), SMOOTHING_BOUNDS)),
            phi: if self.damped {
                Some(clamp(fixed.phi.unwrap_or(PHI_BOUNDS.1), PHI_BOUNDS))
            } else {
                None
            },
        }
    }
}
