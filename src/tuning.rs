//! Hyperparameter search spaces for external tuners.

use serde::Serialize;
use std::fmt;

/// Type of a search parameter's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Str,
    Bool,
    Int,
}

/// A candidate value for a search parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Component disabled.
    Null,
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Null => f.write_str("none"),
        }
    }
}

/// A choice parameter of a search space.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParameter {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value_type: ValueType,
    pub values: Vec<ParamValue>,
    pub is_ordered: bool,
}

impl SearchParameter {
    /// A choice among `values`.
    pub fn choice(
        name: &'static str,
        value_type: ValueType,
        values: Vec<ParamValue>,
        is_ordered: bool,
    ) -> Self {
        Self {
            name,
            kind: "choice",
            value_type,
            values,
            is_ordered,
        }
    }
}

/// Default search space of the Holt-Winters model.
pub fn holtwinters_search_space() -> Vec<SearchParameter> {
    let components = || {
        vec![
            ParamValue::Str("additive".to_string()),
            ParamValue::Str("multiplicative".to_string()),
        ]
    };

    vec![
        SearchParameter::choice("trend", ValueType::Str, components(), true),
        SearchParameter::choice(
            "damped",
            ValueType::Bool,
            vec![ParamValue::Bool(true), ParamValue::Bool(false)],
            false,
        ),
        SearchParameter::choice("seasonal", ValueType::Str, components(), true),
        SearchParameter::choice(
            "seasonal_periods",
            ValueType::Int,
            [4, 7, 10, 14, 24, 30].into_iter().map(ParamValue::Int).collect(),
            true,
        ),
    ]
}
