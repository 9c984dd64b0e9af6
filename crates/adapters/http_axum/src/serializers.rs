//! Mapping between stored rows and their JSON representations.
//!
//! Every resource is described by a static table of [`Field`]s. The table
//! order is the key order of the rendered object. Fields without a parser
//! are read-only and silently ignored on input, as are unknown keys.

pub mod event;
pub mod user;

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Timelike};
use serde_json::{Map, Value};

use eventdesk_domain::error::{ValidationError, ValidationErrors};
use eventdesk_domain::time::{self, Timestamp};

use crate::links::Links;

/// Produce the JSON value of one field of `T`.
pub type Render<T> = fn(&T, &Links) -> Value;

/// Parse one field of a payload into the change set `C`.
pub type Parse<C> = fn(&Value, &Links, &mut C) -> Result<(), ValidationError>;

/// One row of a resource's field table.
pub struct Field<T, C> {
    pub name: &'static str,
    pub render: Render<T>,
    pub parse: Option<Parse<C>>,
}

/// Render `row` as an object with one key per field, in table order.
pub fn render<T, C>(fields: &[Field<T, C>], row: &T, links: &Links) -> Value {
    let object: Map<String, Value> = fields
        .iter()
        .map(|field| (field.name.to_string(), (field.render)(row, links)))
        .collect();
    Value::Object(object)
}

/// Parse every writable field present in `payload`.
///
/// # Errors
///
/// Returns all field errors at once, or a single `non_field_errors` entry
/// when `payload` is not an object.
pub fn parse<T, C: Default>(
    fields: &[Field<T, C>],
    payload: &Value,
    links: &Links,
) -> Result<C, ValidationErrors> {
    let Value::Object(object) = payload else {
        return Err(ValidationError::NotAnObject {
            received: json_type(payload),
        }
        .into());
    };

    let mut changes = C::default();
    let mut errors = ValidationErrors::new();
    for field in fields {
        let (Some(parse), Some(value)) = (field.parse, object.get(field.name)) else {
            continue;
        };
        if let Err(err) = parse(value, links, &mut changes) {
            errors.push(err);
        }
    }
    errors.into_result()?;
    Ok(changes)
}

/// Name of a JSON value's type, as reported in error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// Read a text field: strings and numbers are accepted, surrounding
/// whitespace is trimmed.
pub(crate) fn text(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Err(ValidationError::Null { field }),
        _ => Err(ValidationError::NotAString { field }),
    }
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Years a stored timestamp can hold once converted to UTC.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Read a timestamp: RFC 3339, or a naive date-time taken as UTC.
pub(crate) fn timestamp(field: &'static str, value: &Value) -> Result<Timestamp, ValidationError> {
    let raw = match value {
        Value::String(s) => s.trim(),
        Value::Null => return Err(ValidationError::Null { field }),
        _ => return Err(ValidationError::InvalidTimestamp { field }),
    };

    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.to_utc())
        .ok()
        .or_else(|| {
            NAIVE_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|naive| naive.and_utc())
        })
        .filter(|utc| YEARS.contains(&utc.year()))
        .map(time::truncate)
        .ok_or(ValidationError::InvalidTimestamp { field })
}

/// ISO 8601 in UTC with a `Z` suffix. A non-zero sub-second part is written
/// as six digits.
pub(crate) fn render_time(ts: &Timestamp) -> Value {
    let precision = if ts.nanosecond() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    Value::String(ts.to_rfc3339_opts(precision, true))
}
