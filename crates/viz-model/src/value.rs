use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw attribute value extracted from an event.
///
/// Extraction is total: an attribute that is absent or cannot be computed is
/// `Empty`, never a panic. `Empty` flows through binning as the reserved
/// missing bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawValue {
    Empty,
    Str(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl RawValue {
    /// Wrap an optional string, mapping `None` and blank strings to `Empty`.
    pub fn from_opt_str(value: Option<&str>) -> Self {
        match value {
            Some(s) if !s.trim().is_empty() => RawValue::Str(s.to_string()),
            _ => RawValue::Empty,
        }
    }

    pub fn from_opt_float(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => RawValue::Float(v),
            _ => RawValue::Empty,
        }
    }

    pub fn from_opt_int(value: Option<i64>) -> Self {
        value.map_or(RawValue::Empty, RawValue::Int)
    }

    pub fn from_opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(RawValue::Empty, RawValue::Date)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RawValue::Empty)
    }

    /// Numeric view of the value, when one exists.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Int(v) => Some(*v as f64),
            RawValue::Float(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RawValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Display form used for categorical keys and details tables.
    /// `Empty` renders as an empty string; dates render as ISO dates.
    pub fn display(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Str(s) => s.clone(),
            RawValue::Int(v) => v.to_string(),
            RawValue::Float(v) => format_number(*v),
            RawValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Format a float without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
