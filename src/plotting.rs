//! Chart data for forecast plots.
//!
//! The crate assembles what a forecast plot shows and leaves drawing to a
//! [`ChartRenderer`]. [`CsvRenderer`] writes the chart as delimited text.

use crate::core::{ForecastResult, TimeSeries};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use std::io::Write;

/// A point on the confidence band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPoint {
    pub time: DateTime<Utc>,
    pub lower: f64,
    pub upper: f64,
}

/// Everything a forecast plot displays.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastChart {
    pub title: String,
    /// Observed series.
    pub actual: Vec<(DateTime<Utc>, f64)>,
    /// Forecast line, including in-sample predictions when history was requested.
    pub forecast: Vec<(DateTime<Utc>, f64)>,
    /// Confidence band; empty without an interval.
    pub band: Vec<BandPoint>,
}

impl ForecastChart {
    /// Assemble a chart of `series` and the forecast in `result`.
    pub fn new(title: impl Into<String>, series: &TimeSeries, result: &ForecastResult) -> Self {
        let actual = series
            .timestamps()
            .iter()
            .copied()
            .zip(series.primary_values().iter().copied())
            .collect();

        let table = &result.table;
        let forecast = table
            .time()
            .iter()
            .copied()
            .zip(table.fcst().iter().copied())
            .collect();

        // Rows prepended as history carry NaN bounds and are left out.
        let band = match (table.fcst_lower(), table.fcst_upper()) {
            (Some(lower), Some(upper)) => table
                .time()
                .iter()
                .zip(lower.iter().zip(upper))
                .filter(|(_, (l, u))| l.is_finite() && u.is_finite())
                .map(|(t, (l, u))| BandPoint {
                    time: *t,
                    lower: *l,
                    upper: *u,
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            title: title.into(),
            actual,
            forecast,
            band,
        }
    }

    pub fn has_band(&self) -> bool {
        !self.band.is_empty()
    }
}

/// Draws a [`ForecastChart`].
pub trait ChartRenderer {
    fn render(&mut self, chart: &ForecastChart) -> Result<()>;
}

/// Renders a chart as `time,series,value` lines, with band rows as
/// `fcst_lower` and `fcst_upper`.
#[derive(Debug)]
pub struct CsvRenderer<W: Write> {
    writer: W,
}

impl<W: Write> CsvRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, time: &DateTime<Utc>, series: &str, value: f64) -> Result<()> {
        writeln!(self.writer, "{},{},{}", time.to_rfc3339(), series, value)
            .map_err(|e| ForecastError::ComputationError(format!("failed to write chart: {}", e)))
    }
}

impl<W: Write> ChartRenderer for CsvRenderer<W> {
    fn render(&mut self, chart: &ForecastChart) -> Result<()> {
        writeln!(self.writer, "# {}", chart.title)
            .and_then(|_| writeln!(self.writer, "time,series,value"))
            .map_err(|e| ForecastError::ComputationError(format!("failed to write chart: {}", e)))?;
        for (t, v) in &chart.actual {
            self.write_line(t, "actual", *v)?;
        }
        for (t, v) in &chart.forecast {
            self.write_line(t, "fcst", *v)?;
        }
        for p in &chart.band {
            self.write_line(&p.time, "fcst_lower", p.lower)?;
            self.write_line(&p.time, "fcst_upper", p.upper)?;
        }
        Ok(())
    }
}
