//! Utility functions for forecasting models.

pub mod backtest;
pub mod emp_confidence_int;
pub mod metrics;
pub mod ols;
pub mod optimization;
pub mod stats;

pub use backtest::{BacktestConfig, BacktestResults, BacktesterRollingWindow, FoldResult, FoldSplit};
pub use emp_confidence_int::{EciConfig, EmpConfidenceInt};
pub use metrics::ErrorMetric;
pub use ols::{ols_fit, LinearFit};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::z_score;
