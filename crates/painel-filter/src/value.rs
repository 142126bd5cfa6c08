//! Operand values shared by the registry and the evaluator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::registry::ValueType;

/// Field value or user-supplied comparison value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// Text operand.
    String(String),
    /// Numeric operand.
    Number(f64),
    /// Timestamp operand.
    Date(DateTime<Utc>),
    /// Flag operand.
    Boolean(bool),
    /// Absent operand; evaluation is indeterminate.
    #[default]
    Null,
}

impl FilterValue {
    /// Value type carried by this operand, `None` for [`FilterValue::Null`].
    #[must_use]
    pub const fn value_type(&self) -> Option<ValueType> {
        match self {
            Self::String(_) => Some(ValueType::String),
            Self::Number(_) => Some(ValueType::Number),
            Self::Date(_) => Some(ValueType::Date),
            Self::Boolean(_) => Some(ValueType::Boolean),
            Self::Null => None,
        }
    }

    /// Whether the operand is absent.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert an application JSON value, using `hint` to recognise dates.
    ///
    /// Strings only become dates when the hint asks for one and the text parses;
    /// otherwise the value keeps its JSON type so mismatches stay visible to the
    /// evaluator. Arrays and objects have no operand form and map to `Null`.
    #[must_use]
    pub fn from_json(value: &Value, hint: ValueType) -> Self {
        match value {
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Null,
            Value::Bool(flag) => Self::Boolean(*flag),
            Value::Number(number) => number.as_f64().map_or(Self::Null, Self::Number),
            Value::String(text) => match hint {
                ValueType::Date => {
                    parse_date(text).map_or_else(|| Self::String(text.clone()), Self::Date)
                }
                ValueType::String | ValueType::Number | ValueType::Boolean => {
                    Self::String(text.clone())
                }
            },
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|stamp| stamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
