//! Holt-Winters model parameters.

use crate::error::{ForecastError, Result};
use crate::tuning::ParamValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, error};

/// Form of a trend or seasonal component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    /// `"add"` or `"additive"`
    Additive,
    /// `"mul"` or `"multiplicative"`
    Multiplicative,
}

impl ComponentType {
    pub fn is_multiplicative(&self) -> bool {
        matches!(self, ComponentType::Multiplicative)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::Additive => f.write_str("additive"),
            ComponentType::Multiplicative => f.write_str("multiplicative"),
        }
    }
}

impl FromStr for ComponentType {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s {
            "add" | "additive" => Ok(ComponentType::Additive),
            "mul" | "multiplicative" => Ok(ComponentType::Multiplicative),
            _ => Err(()),
        }
    }
}

/// Parameters of the Holt-Winters model.
///
/// * `trend` - form of the trend component, `None` for no trend.
/// * `damped` - whether the trend is damped.
/// * `seasonal` - form of the seasonal component, `None` for no seasonality.
/// * `seasonal_periods` - length of a season, e.g. 4 for quarterly data or 7
///   for weekly seasonality of daily data. Needed whenever `seasonal` is set;
///   that requirement is enforced when fitting.
///
/// The defaults are an additive, undamped trend and no seasonality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParams")]
pub struct HoltWintersParams {
    trend: Option<ComponentType>,
    damped: bool,
    seasonal: Option<ComponentType>,
    seasonal_periods: Option<usize>,
}

impl Default for HoltWintersParams {
    fn default() -> Self {
        Self {
            trend: Some(ComponentType::Additive),
            damped: false,
            seasonal: None,
            seasonal_periods: None,
        }
    }
}

impl HoltWintersParams {
    /// Create parameters from their string forms.
    ///
    /// `trend` and `seasonal` accept `"add"`, `"mul"`, `"additive"`,
    /// `"multiplicative"` or `None`; anything else is a configuration error.
    ///
    /// # Example
    /// ```
    /// use holtwinters_forecast::models::holt_winters::HoltWintersParams;
    ///
    /// let params = HoltWintersParams::new(Some("add"), true, Some("mul"), Some(7)).unwrap();
    /// assert!(params.damped());
    ///
    /// assert!(HoltWintersParams::new(Some("linear"), false, None, None).is_err());
    /// ```
    pub fn new(
        trend: Option<&str>,
        damped: bool,
        seasonal: Option<&str>,
        seasonal_periods: Option<usize>,
    ) -> Result<Self> {
        let trend = parse_component("trend", trend)?;
        let seasonal = parse_component("seasonal", seasonal)?;
        Self::validated(trend, damped, seasonal, seasonal_periods)
    }

    /// Start building parameters from typed components.
    pub fn builder() -> HoltWintersParamsBuilder {
        HoltWintersParamsBuilder::default()
    }

    /// Build parameters from a tuning assignment of `(name, value)` pairs.
    ///
    /// Names follow [`crate::tuning::holtwinters_search_space`]; fields not
    /// mentioned keep their defaults.
    pub fn from_search_point(point: &[(&str, ParamValue)]) -> Result<Self> {
        let defaults = Self::default();
        let mut trend = defaults.trend.map(|c| c.to_string());
        let mut damped = defaults.damped;
        let mut seasonal = defaults.seasonal.map(|c| c.to_string());
        let mut seasonal_periods = defaults.seasonal_periods;

        for (name, value) in point {
            match (*name, value) {
                ("trend", ParamValue::Str(s)) => trend = Some(s.clone()),
                ("trend", ParamValue::Null) => trend = None,
                ("damped", ParamValue::Bool(b)) => damped = *b,
                ("seasonal", ParamValue::Str(s)) => seasonal = Some(s.clone()),
                ("seasonal", ParamValue::Null) => seasonal = None,
                ("seasonal_periods", ParamValue::Int(p)) => {
                    let p = usize::try_from(*p).map_err(|_| invalid("seasonal_periods", p))?;
                    seasonal_periods = Some(p);
                }
                ("seasonal_periods", ParamValue::Null) => seasonal_periods = None,
                ("trend", other) => return Err(invalid("trend", other)),
                ("damped", other) => return Err(invalid("damped", other)),
                ("seasonal", other) => return Err(invalid("seasonal", other)),
                ("seasonal_periods", other) => return Err(invalid("seasonal_periods", other)),
                (other, _) => {
                    return Err(ForecastError::InvalidParameter(format!(
                        "unknown Holt-Winters parameter: {}",
                        other
                    )));
                }
            }
        }

        Self::new(trend.as_deref(), damped, seasonal.as_deref(), seasonal_periods)
    }

    fn validated(
        trend: Option<ComponentType>,
        damped: bool,
        seasonal: Option<ComponentType>,
        seasonal_periods: Option<usize>,
    ) -> Result<Self> {
        if seasonal_periods == Some(0) {
            let err = invalid("seasonal_periods", 0);
            error!(error = %err, "invalid Holt-Winters parameters");
            return Err(err);
        }

        let params = Self {
            trend,
            damped,
            seasonal,
            seasonal_periods,
        };
        debug!(
            trend = ?params.trend,
            damped = params.damped,
            seasonal = ?params.seasonal,
            seasonal_periods = ?params.seasonal_periods,
            "initialized HoltWintersParams"
        );
        Ok(params)
    }

    pub fn trend(&self) -> Option<ComponentType> {
        self.trend
    }

    pub fn damped(&self) -> bool {
        self.damped
    }

    pub fn seasonal(&self) -> Option<ComponentType> {
        self.seasonal
    }

    pub fn seasonal_periods(&self) -> Option<usize> {
        self.seasonal_periods
    }
}

/// Typed builder for [`HoltWintersParams`].
#[derive(Debug, Clone)]
pub struct HoltWintersParamsBuilder {
    params: HoltWintersParams,
}

impl Default for HoltWintersParamsBuilder {
    fn default() -> Self {
        Self {
            params: HoltWintersParams::default(),
        }
    }
}

impl HoltWintersParamsBuilder {
    pub fn trend(mut self, trend: Option<ComponentType>) -> Self {
        self.params.trend = trend;
        self
    }

    pub fn damped(mut self, damped: bool) -> Self {
        self.params.damped = damped;
        self
    }

    pub fn seasonal(mut self, seasonal: Option<ComponentType>) -> Self {
        self.params.seasonal = seasonal;
        self
    }

    pub fn seasonal_periods(mut self, periods: usize) -> Self {
        self.params.seasonal_periods = Some(periods);
        self
    }

    pub fn build(self) -> Result<HoltWintersParams> {
        let p = self.params;
        HoltWintersParams::validated(p.trend, p.damped, p.seasonal, p.seasonal_periods)
    }
}

/// Wire form of [`HoltWintersParams`]; validated on conversion.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawParams {
    trend: Option<String>,
    damped: bool,
    seasonal: Option<String>,
    seasonal_periods: Option<usize>,
}

impl Default for RawParams {
    fn default() -> Self {
        Self {
            trend: Some("add".to_string()),
            damped: false,
            seasonal: None,
            seasonal_periods: None,
        }
    }
}

impl TryFrom<RawParams> for HoltWintersParams {
    type Error = ForecastError;

    fn try_from(raw: RawParams) -> Result<Self> {
        HoltWintersParams::new(
            raw.trend.as_deref(),
            raw.damped,
            raw.seasonal.as_deref(),
            raw.seasonal_periods,
        )
    }
}

fn parse_component(field: &'static str, value: Option<&str>) -> Result<Option<ComponentType>> {
    match value {
        None => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| {
            let err = invalid(field, s);
            error!(error = %err, "invalid Holt-Winters parameters");
            err
        }),
    }
}

fn invalid(field: &'static str, value: impl fmt::Debug) -> ForecastError {
    ForecastError::InvalidConfig {
        field,
        value: format!("{:?}", value).trim_matches('"').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_additive_trend_without_seasonality() {
        let params = HoltWintersParams::default();
        assert_eq!(params.trend(), Some(ComponentType::Additive));
        assert!(!params.damped());
        assert_eq!(params.seasonal(), None);
        assert_eq!(params.seasonal_periods(), None);
    }

    #[test]
    fn accepts_all_allowed_component_values() {
        for value in [Some("add"), Some("mul"), Some("additive"), Some("multiplicative"), None] {
            assert!(HoltWintersParams::new(value, false, None, None).is_ok());
            assert!(HoltWintersParams::new(None, false, value, Some(4)).is_ok());
        }

        let short = HoltWintersParams::new(Some("mul"), false, Some("add"), Some(12)).unwrap();
        let long = HoltWintersParams::new(
            Some("multiplicative"),
            false,
            Some("additive"),
            Some(12),
        )
        .unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn rejects_invalid_trend_and_seasonal() {
        let err = HoltWintersParams::new(Some("invalid"), false, None, None).unwrap_err();
        assert_eq!(
            err,
            ForecastError::InvalidConfig {
                field: "trend",
                value: "invalid".to_string()
            }
        );

        let err = HoltWintersParams::new(Some("add"), false, Some("invalid"), Some(7)).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig { field: "seasonal", .. }));

        // Matching is exact, as with the string forms the model documents.
        assert!(HoltWintersParams::new(Some("Add"), false, None, None).is_err());
    }

    #[test]
    fn seasonal_without_period_is_deferred_to_fit() {
        let params = HoltWintersParams::new(Some("add"), false, Some("add"), None).unwrap();
        assert_eq!(params.seasonal_periods(), None);
    }

    #[test]
    fn zero_seasonal_period_is_rejected() {
        let err = HoltWintersParams::new(None, false, Some("add"), Some(0)).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InvalidConfig {
                field: "seasonal_periods",
                ..
            }
        ));
    }

    #[test]
    fn builder_produces_typed_params() {
        let params = HoltWintersParams::builder()
            .trend(Some(ComponentType::Multiplicative))
            .damped(true)
            .seasonal(Some(ComponentType::Additive))
            .seasonal_periods(4)
            .build()
            .unwrap();

        assert_eq!(params.trend(), Some(ComponentType::Multiplicative));
        assert!(params.damped());
        assert_eq!(params.seasonal_periods(), Some(4));
    }

    #[test]
    fn builds_from_search_point() {
        let params = HoltWintersParams::from_search_point(&[
            ("trend", ParamValue::Str("multiplicative".to_string())),
            ("damped", ParamValue::Bool(true)),
            ("seasonal", ParamValue::Str("additive".to_string())),
            ("seasonal_periods", ParamValue::Int(7)),
        ])
        .unwrap();
        assert_eq!(params.trend(), Some(ComponentType::Multiplicative));
        assert_eq!(params.seasonal_periods(), Some(7));

        assert!(matches!(
            HoltWintersParams::from_search_point(&[("damped", ParamValue::Int(1))]),
            Err(ForecastError::InvalidConfig { field: "damped", .. })
        ));
        assert!(matches!(
            HoltWintersParams::from_search_point(&[("phi", ParamValue::Bool(true))]),
            Err(ForecastError::InvalidParameter(_))
        ));
        let negative = [("seasonal_periods", ParamValue::Int(-3))];
        assert!(HoltWintersParams::from_search_point(&negative).is_err());
    }

    #[test]
    fn deserializes_with_validation() {
        let params: HoltWintersParams =
            serde_json::from_str(r#"{"seasonal": "mul", "seasonal_periods": 12}"#).unwrap();
        assert_eq!(params.trend(), Some(ComponentType::Additive));
        assert_eq!(params.seasonal(), Some(ComponentType::Multiplicative));

        let params: HoltWintersParams = serde_json::from_str(r#"{"trend": null}"#).unwrap();
        assert_eq!(params.trend(), None);

        assert!(serde_json::from_str::<HoltWintersParams>(r#"{"trend": "cubic"}"#).is_err());

        let json = serde_json::to_value(HoltWintersParams::default()).unwrap();
        assert_eq!(json["trend"], "additive");
        assert_eq!(json["seasonal"], serde_json::Value::Null);
    }
}
