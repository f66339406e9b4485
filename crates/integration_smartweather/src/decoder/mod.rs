//! Payload decoders
//!
//! Decoders turn a raw JSON payload into domain values. They are pure and
//! synchronous. Every numeric field is coerced explicitly: a string where a
//! number is expected (even `"12.5"`) is a decode failure, and a present
//! `null` on an optional key decodes as `None`.

pub mod forecast;
pub mod observation;
pub mod station;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::SmartWeatherError;

pub use forecast::{DayAggregate, aggregate_day, decode_current_conditions, decode_forecast};
pub use observation::decode_observation;
pub use station::{decode_devices, decode_station_info};

type Object = Map<String, Value>;

pub(crate) fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, SmartWeatherError> {
    value
        .as_object()
        .ok_or_else(|| SmartWeatherError::MalformedResult(format!("{what} is not an object")))
}

pub(crate) fn required_array<'a>(
    obj: &'a Object,
    key: &str,
) -> Result<&'a Vec<Value>, SmartWeatherError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(SmartWeatherError::missing(key)),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(type_error(key, "an array", other)),
    }
}

pub(crate) fn required_str<'a>(obj: &'a Object, key: &str) -> Result<&'a str, SmartWeatherError> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(SmartWeatherError::missing(key)),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(type_error(key, "a string", other)),
    }
}

pub(crate) fn optional_str<'a>(
    obj: &'a Object,
    key: &str,
) -> Result<Option<&'a str>, SmartWeatherError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(type_error(key, "a string", other)),
    }
}

pub(crate) fn required_f64(obj: &Object, key: &str) -> Result<f64, SmartWeatherError> {
    optional_f64(obj, key)?.ok_or_else(|| SmartWeatherError::missing(key))
}

pub(crate) fn optional_f64(obj: &Object, key: &str) -> Result<Option<f64>, SmartWeatherError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| SmartWeatherError::MalformedResult(format!("'{key}' is out of range"))),
        Some(other) => Err(type_error(key, "a number", other)),
    }
}

pub(crate) fn required_u64(obj: &Object, key: &str) -> Result<u64, SmartWeatherError> {
    optional_u64(obj, key)?.ok_or_else(|| SmartWeatherError::missing(key))
}

/// Integer fields accept floats and truncate them
pub(crate) fn optional_u64(obj: &Object, key: &str) -> Result<Option<u64>, SmartWeatherError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                return Ok(Some(v));
            }
            let v = n.as_f64().unwrap_or(-1.0);
            if !v.is_finite() || v < 0.0 {
                return Err(SmartWeatherError::MalformedResult(format!(
                    "'{key}' must be a non-negative number, got {n}"
                )));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let truncated = v.trunc() as u64;
            Ok(Some(truncated))
        },
        Some(other) => Err(type_error(key, "a number", other)),
    }
}

pub(crate) fn optional_u32(obj: &Object, key: &str) -> Result<Option<u32>, SmartWeatherError> {
    optional_u64(obj, key)?
        .map(|v| {
            u32::try_from(v).map_err(|_| {
                SmartWeatherError::MalformedResult(format!("'{key}' is out of range: {v}"))
            })
        })
        .transpose()
}

pub(crate) fn required_timestamp(
    obj: &Object,
    key: &str,
) -> Result<DateTime<Utc>, SmartWeatherError> {
    optional_timestamp(obj, key)?.ok_or_else(|| SmartWeatherError::missing(key))
}

/// Unix seconds to UTC
pub(crate) fn optional_timestamp(
    obj: &Object,
    key: &str,
) -> Result<Option<DateTime<Utc>>, SmartWeatherError> {
    let Some(secs) = optional_u64(obj, key)? else {
        return Ok(None);
    };
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(Some)
        .ok_or_else(|| SmartWeatherError::MalformedResult(format!("'{key}' is not a valid time")))
}

fn type_error(key: &str, expected: &str, got: &Value) -> SmartWeatherError {
    let kind = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    SmartWeatherError::MalformedResult(format!("'{key}' must be {expected}, got {kind}"))
}
