//! Core data structures for time series forecasting.

mod forecast;
mod frequency;
mod time_series;

pub use forecast::{ForecastResult, ForecastRow, ForecastTable};
pub use frequency::{Frequency, FrequencyUnit};
pub use time_series::{TimeSeries, TimeSeriesBuilder};
