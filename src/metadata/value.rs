use chrono::{DateTime, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use super::ValueRejected;
use crate::service::ValueKind;

/// Datetime layouts accepted for `DateTime` attributes, after RFC 3339
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%d/%m/%Y %H:%M:%S"];

/// Cell spellings treated as an explicit null in CSV tables
const NULL_CELLS: [&str; 5] = ["NA", "N/A", "NaN", "nan", "null"];

/// A metadata value in its native source type
#[derive(Debug, Clone, PartialEq)]
pub enum SourceValue {
    /// Explicit null (`null` in PICO JSON, `NA` in CSV tables)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
    /// Free text
    Text(String),
    /// Sequence, e.g. calibration coefficients
    List(Vec<SourceValue>),
}

impl SourceValue {
    /// Human-readable name of the value's type, used in warnings
    pub fn type_name(&self) -> &'static str {
        match self {
            SourceValue::Null => "null",
            SourceValue::Bool(_) => "boolean",
            SourceValue::Integer(_) => "integer",
            SourceValue::Float(_) => "float",
            SourceValue::Text(_) => "text",
            SourceValue::List(_) => "list",
        }
    }

    /// True for [`SourceValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, SourceValue::Null)
    }

    /// Parse a CSV cell, inferring integer, float and boolean values.
    ///
    /// Returns `None` for an empty cell so that the field counts as absent.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        if NULL_CELLS.contains(&cell) {
            return Some(SourceValue::Null);
        }
        if let Ok(v) = cell.parse::<i64>() {
            return Some(SourceValue::Integer(v));
        }
        if let Ok(v) = cell.parse::<f64>() {
            return Some(SourceValue::Float(v));
        }
        if cell.eq_ignore_ascii_case("true") {
            return Some(SourceValue::Bool(true));
        }
        if cell.eq_ignore_ascii_case("false") {
            return Some(SourceValue::Bool(false));
        }
        Some(SourceValue::Text(cell.to_string()))
    }
}

impl From<serde_json::Value> for SourceValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => SourceValue::Null,
            Value::Bool(b) => SourceValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SourceValue::Integer(i),
                None => SourceValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => SourceValue::Text(s),
            Value::Array(items) => SourceValue::List(items.into_iter().map(Self::from).collect()),
            // Nested objects have no attribute counterpart; keep them as JSON text
            Value::Object(map) => SourceValue::Text(Value::Object(map).to_string()),
        }
    }
}

/// String form used for the text fallback. Lists become comma-separated.
impl fmt::Display for SourceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceValue::Null => f.write_str("null"),
            SourceValue::Bool(b) => write!(f, "{}", b),
            SourceValue::Integer(i) => write!(f, "{}", i),
            SourceValue::Float(v) => write!(f, "{}", v),
            SourceValue::Text(s) => f.write_str(s),
            SourceValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// A typed value as stored by the service
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetadataValue {
    /// Integer attribute value
    Integer(i64),
    /// Double attribute value
    Double(f64),
    /// Text attribute value
    Text(String),
    /// Datetime attribute value
    DateTime(NaiveDateTime),
}

impl MetadataValue {
    /// The value kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            MetadataValue::Integer(_) => ValueKind::Integer,
            MetadataValue::Double(_) => ValueKind::Double,
            MetadataValue::Text(_) => ValueKind::Text,
            MetadataValue::DateTime(_) => ValueKind::DateTime,
        }
    }

    /// Store `value` as `kind` for `attribute`, without any string fallback.
    pub fn coerce(
        attribute: &str,
        kind: ValueKind,
        value: &SourceValue,
    ) -> Result<Self, ValueRejected> {
        let coerced = match (kind, value) {
            (_, SourceValue::Null) => {
                return Err(ValueRejected::Null {
                    attribute: attribute.to_string(),
                })
            }
            (ValueKind::Integer, SourceValue::Integer(i)) => Some(MetadataValue::Integer(*i)),
            (ValueKind::Double, SourceValue::Integer(i)) => Some(MetadataValue::Double(*i as f64)),
            (ValueKind::Double, SourceValue::Float(v)) => Some(MetadataValue::Double(*v)),
            (ValueKind::Text, SourceValue::Text(s)) => Some(MetadataValue::Text(s.clone())),
            (ValueKind::DateTime, SourceValue::Text(s)) => parse_datetime(s).map(MetadataValue::DateTime),
            _ => None,
        };

        coerced.ok_or_else(|| ValueRejected::TypeMismatch {
            attribute: attribute.to_string(),
            expected: kind,
            found: value.type_name(),
        })
    }
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}
