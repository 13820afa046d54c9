//! Forecasting models.

mod options;
mod traits;

pub mod exponential;
pub mod holt_winters;

pub use holt_winters::{HoltWintersModel, HoltWintersParams};
pub use options::PredictOptions;
pub use traits::{FittedSmoother, ForecastModel, SmoothingSolver};
