//! Exponential smoothing solvers.
//!
//! This module provides the Holt-Winters solver used by
//! [`crate::models::holt_winters::HoltWintersModel`]:
//! - level, additive or multiplicative trend, optionally damped
//! - additive or multiplicative seasonality

mod smoothing;

pub use smoothing::{ExponentialSmoothing, HoltWintersResults, SmoothingParams, SolverConfig};
