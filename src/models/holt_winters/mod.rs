//! Holt-Winters forecasting model.

mod model;
mod params;

pub use model::HoltWintersModel;
pub use params::{ComponentType, HoltWintersParams, HoltWintersParamsBuilder};
