//! TimeSeries data structure for representing temporal data.

use crate::core::Frequency;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// A time series with timestamps and one or more value columns.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    /// Values stored in column-major format: values[column][observation]
    values: Vec<Vec<f64>>,
    frequency: Option<Frequency>,
}

/// Builder for constructing TimeSeries.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Vec<f64>>,
    frequency: Option<Frequency>,
}

impl TimeSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set univariate values.
    pub fn values(mut self, values: Vec<f64>) -> Self {
        self.values = vec![values];
        self
    }

    /// Set value columns.
    pub fn columns(mut self, columns: Vec<Vec<f64>>) -> Self {
        self.values = columns;
        self
    }

    /// Declare the sampling frequency instead of inferring it.
    pub fn frequency(mut self, freq: Frequency) -> Self {
        self.frequency = Some(freq);
        self
    }

    pub fn build(self) -> Result<TimeSeries> {
        let mut series = TimeSeries::new(self.timestamps, self.values)?;
        series.frequency = self.frequency;
        Ok(series)
    }
}

impl TimeSeries {
    /// Create a new TimeSeries from timestamps and value columns.
    pub fn new(timestamps: Vec<DateTime<Utc>>, columns: Vec<Vec<f64>>) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        for column in &columns {
            if column.len() != timestamps.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: timestamps.len(),
                    got: column.len(),
                });
            }
        }

        Ok(Self {
            timestamps,
            values: columns,
            frequency: None,
        })
    }

    /// Create a simple univariate time series.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, vec![values])
    }

    /// Create a multivariate time series from value columns.
    pub fn multivariate(timestamps: Vec<DateTime<Utc>>, columns: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(timestamps, columns)
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get the number of value columns (1 for univariate).
    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Check if the series is multivariate.
    pub fn is_multivariate(&self) -> bool {
        self.values.len() > 1
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Latest observed timestamp.
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Get values for a specific column.
    pub fn values(&self, dimension: usize) -> Result<&[f64]> {
        self.values
            .get(dimension)
            .map(|v| v.as_slice())
            .ok_or(ForecastError::IndexOutOfBounds {
                index: dimension,
                size: self.values.len(),
            })
    }

    /// Get primary (first column) values.
    pub fn primary_values(&self) -> &[f64] {
        self.values.first().map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Declared frequency, if any.
    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Declared frequency, or the one inferred from the timestamps.
    pub fn infer_frequency(&self) -> Result<Frequency> {
        match self.frequency {
            Some(freq) => Ok(freq),
            None => Frequency::infer(&self.timestamps),
        }
    }

    /// Extract observations `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> Result<TimeSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }

        Ok(TimeSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self
                .values
                .iter()
                .map(|column| column[start..end].to_vec())
                .collect(),
            frequency: self.frequency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn make_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        (0..n)
            .map(|i| Utc.with_ymd_and_hms(2024, 1, 1, i as u32, 0, 0).unwrap())
            .collect()
    }

    fn make_daily_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::days(i as i64)).collect()
    }

    #[test]
    fn time_series_constructs_univariate_data() {
        let timestamps = make_timestamps(5);
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];

        let ts = TimeSeries::univariate(timestamps.clone(), values.clone()).unwrap();

        assert_eq!(ts.len(), 5);
        assert!(!ts.is_empty());
        assert_eq!(ts.dimensions(), 1);
        assert!(!ts.is_multivariate());
        assert_eq!(ts.primary_values(), &values);
        assert_eq!(ts.timestamps(), &timestamps);
        assert_eq!(ts.last_timestamp(), Some(timestamps[4]));
    }

    #[test]
    fn time_series_handles_multivariate_columns() {
        let ts = TimeSeries::multivariate(
            make_timestamps(3),
            vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]],
        )
        .unwrap();

        assert_eq!(ts.dimensions(), 2);
        assert!(ts.is_multivariate());
        assert_eq!(ts.values(1).unwrap(), &[4.0, 5.0, 6.0]);
        assert!(matches!(
            ts.values(2),
            Err(ForecastError::IndexOutOfBounds { index: 2, size: 2 })
        ));
    }

    #[test]
    fn time_series_rejects_unordered_timestamps() {
        let mut timestamps = make_timestamps(3);
        timestamps.swap(0, 1);
        let result = TimeSeries::univariate(timestamps, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(ForecastError::TimestampError(_))));
    }

    #[test]
    fn time_series_rejects_length_mismatch() {
        let result = TimeSeries::univariate(make_timestamps(3), vec![1.0, 2.0]);
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        ));

        let result = TimeSeriesBuilder::new()
            .timestamps(make_timestamps(3))
            .columns(vec![vec![1.0, 2.0, 3.0], vec![4.0]])
            .build();
        assert!(matches!(
            result,
            Err(ForecastError::DimensionMismatch { expected: 3, got: 1 })
        ));
    }

    #[test]
    fn time_series_slice_keeps_order() {
        let ts = TimeSeries::univariate(make_timestamps(6), (0..6).map(|i| i as f64).collect())
            .unwrap();
        let slice = ts.slice(2, 5).unwrap();
        assert_eq!(slice.primary_values(), &[2.0, 3.0, 4.0]);
        assert_eq!(slice.timestamps(), &ts.timestamps()[2..5]);

        assert!(ts.slice(4, 2).is_err());
        assert!(matches!(
            ts.slice(0, 7),
            Err(ForecastError::IndexOutOfBounds { index: 7, size: 6 })
        ));
    }

    #[test]
    fn declared_frequency_wins_over_inference() {
        let ts = TimeSeries::univariate(make_daily_timestamps(5), vec![1.0; 5]).unwrap();
        assert_eq!(ts.infer_frequency().unwrap(), Frequency::daily());
        assert!(ts.frequency().is_none());

        let ts = TimeSeriesBuilder::new()
            .timestamps(make_daily_timestamps(5))
            .values(vec![1.0; 5])
            .frequency(Frequency::business_daily())
            .build()
            .unwrap();
        assert_eq!(ts.infer_frequency().unwrap(), Frequency::business_daily());
        assert_eq!(ts.slice(1, 3).unwrap().frequency(), Some(Frequency::business_daily()));
    }
}
