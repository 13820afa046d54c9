//! Forecast tables: timestamped point forecasts with optional bounds.

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of a [`ForecastTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastRow {
    pub time: DateTime<Utc>,
    pub fcst: f64,
    pub fcst_lower: Option<f64>,
    pub fcst_upper: Option<f64>,
}

/// Column-oriented forecast table with `time` and `fcst` columns and
/// optional `fcst_lower` / `fcst_upper` bound columns.
///
/// When history rows are combined with bounded forecast rows, the history
/// rows carry `NaN` bounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastTable {
    time: Vec<DateTime<Utc>>,
    fcst: Vec<f64>,
    fcst_lower: Option<Vec<f64>>,
    fcst_upper: Option<Vec<f64>>,
}

impl ForecastTable {
    /// Create a table of point forecasts.
    pub fn new(time: Vec<DateTime<Utc>>, fcst: Vec<f64>) -> Result<Self> {
        if time.len() != fcst.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: time.len(),
                got: fcst.len(),
            });
        }
        Ok(Self {
            time,
            fcst,
            fcst_lower: None,
            fcst_upper: None,
        })
    }

    /// Create a table of point forecasts with lower and upper bounds.
    pub fn with_intervals(
        time: Vec<DateTime<Utc>>,
        fcst: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
    ) -> Result<Self> {
        let mut table = Self::new(time, fcst)?;
        for bound in [&lower, &upper] {
            if bound.len() != table.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: table.len(),
                    got: bound.len(),
                });
            }
        }
        table.fcst_lower = Some(lower);
        table.fcst_upper = Some(upper);
        Ok(table)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[DateTime<Utc>] {
        &self.time
    }

    pub fn fcst(&self) -> &[f64] {
        &self.fcst
    }

    pub fn fcst_lower(&self) -> Option<&[f64]> {
        self.fcst_lower.as_deref()
    }

    pub fn fcst_upper(&self) -> Option<&[f64]> {
        self.fcst_upper.as_deref()
    }

    /// Check if the table carries confidence bounds.
    pub fn has_intervals(&self) -> bool {
        self.fcst_lower.is_some() && self.fcst_upper.is_some()
    }

    /// Row at `index`.
    pub fn row(&self, index: usize) -> Result<ForecastRow> {
        if index >= self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index,
                size: self.len(),
            });
        }
        Ok(self.row_unchecked(index))
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl Iterator<Item = ForecastRow> + '_ {
        (0..self.len()).map(move |i| self.row_unchecked(i))
    }

    fn row_unchecked(&self, i: usize) -> ForecastRow {
        ForecastRow {
            time: self.time[i],
            fcst: self.fcst[i],
            fcst_lower: self.fcst_lower.as_ref().map(|l| l[i]),
            fcst_upper: self.fcst_upper.as_ref().map(|u| u[i]),
        }
    }

    /// Append `other`'s rows after this table's rows.
    ///
    /// A bound column present on only one side is filled with `NaN` on the
    /// other.
    pub fn concat(mut self, other: ForecastTable) -> ForecastTable {
        let (n_self, n_other) = (self.len(), other.len());
        self.fcst_lower = merge_bound(self.fcst_lower, n_self, other.fcst_lower, n_other);
        self.fcst_upper = merge_bound(self.fcst_upper, n_self, other.fcst_upper, n_other);
        self.time.extend(other.time);
        self.fcst.extend(other.fcst);
        self
    }
}

fn merge_bound(
    head: Option<Vec<f64>>,
    head_len: usize,
    tail: Option<Vec<f64>>,
    tail_len: usize,
) -> Option<Vec<f64>> {
    match (head, tail) {
        (None, None) => None,
        (head, tail) => {
            let mut merged = head.unwrap_or_else(|| vec![f64::NAN; head_len]);
            merged.extend(tail.unwrap_or_else(|| vec![f64::NAN; tail_len]));
            Some(merged)
        }
    }
}

/// Everything a `predict` call produced.
///
/// Returned to the caller instead of being cached on the model, and passed
/// back explicitly to plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecast rows, history first when requested.
    pub table: ForecastTable,
    /// The out-of-sample timestamps.
    pub dates: Vec<DateTime<Utc>>,
    /// Frequency used to build `dates`.
    pub freq: Frequency,
    /// Significance level of the confidence interval, if one was requested.
    pub alpha: Option<f64>,
    /// Whether `table` starts with in-sample rows.
    pub include_history: bool,
}

impl ForecastResult {
    /// Rows covering only the forecast horizon.
    pub fn future_rows(&self) -> impl Iterator<Item = ForecastRow> + '_ {
        let skip = self.table.len().saturating_sub(self.dates.len());
        self.table.rows().skip(skip)
    }
}
