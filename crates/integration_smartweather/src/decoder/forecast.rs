//! Forecast decoder
//!
//! Decodes the `better_forecast` payload:
//!
//! ```json
//! { "current_conditions": { ... }, "forecast": { "daily": [ ... ], "hourly": [ ... ] } }
//! ```
//!
//! Daily buckets carry no precipitation amount or wind, so those are
//! aggregated from the hourly entries whose `local_day` matches the bucket's
//! `day_num`. Aggregation runs on canonical values; conversion happens last.

use domain::value_objects::map_condition;
use domain::{
    Condition, CurrentConditions, DisplayUnits, Forecast, ForecastEntry, ForecastKind,
    ForecastTemperature,
};
use serde_json::{Map, Value};
use tracing::debug;

use super::{
    as_object, optional_str, required_array, required_f64, required_str, required_timestamp,
    required_u64,
};
use crate::error::SmartWeatherError;

/// Hourly values aggregated over one forecast day, in canonical units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayAggregate {
    /// Number of hourly entries that matched the day
    pub hours: usize,
    /// Summed precipitation in mm
    pub precipitation: Option<f64>,
    /// Mean wind speed in m/s
    pub wind_avg: Option<f64>,
    /// Mean wind bearing in degrees
    pub wind_bearing: Option<u16>,
}

/// Decode a forecast payload into a series of the requested kind
///
/// The series includes the current bucket; use [`Forecast::future_days`] to
/// skip it.
///
/// # Errors
///
/// Returns [`SmartWeatherError::MalformedResult`] when `forecast`, the
/// `daily`/`hourly` array or a required per-entry key is missing or mistyped.
pub fn decode_forecast(
    payload: &Value,
    kind: ForecastKind,
    units: DisplayUnits,
) -> Result<Forecast, SmartWeatherError> {
    let root = as_object(payload, "forecast payload")?;
    let forecast = root
        .get("forecast")
        .ok_or_else(|| SmartWeatherError::missing("forecast"))?;
    let forecast = as_object(forecast, "'forecast'")?;

    let entries = match kind {
        ForecastKind::Daily => decode_daily(forecast, units)?,
        ForecastKind::Hourly => decode_hourly(forecast, units)?,
    };

    let current = decode_current_conditions(root)?;

    debug!(
        kind = %kind,
        entries = entries.len(),
        current = current.is_some(),
        "Decoded forecast"
    );

    Ok(Forecast {
        kind,
        units,
        current,
        entries,
    })
}

/// Decode the optional `current_conditions` block of a forecast payload
///
/// The condition is resolved from the `conditions` text first and the icon
/// second. A missing or `null` block decodes as `None`.
///
/// # Errors
///
/// Returns [`SmartWeatherError::MalformedResult`] when the block is not an
/// object, has no `icon`, or a text field has the wrong type.
pub fn decode_current_conditions(
    root: &Map<String, Value>,
) -> Result<Option<CurrentConditions>, SmartWeatherError> {
    let Some(block) = root.get("current_conditions").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let block = as_object(block, "'current_conditions'")?;

    let icon = required_str(block, "icon")?;
    let conditions = optional_str(block, "conditions")?;
    let condition = conditions.and_then(map_condition).or_else(|| map_condition(icon));
    if condition.is_none() {
        debug!(icon = %icon, conditions = ?conditions, "Unmapped current condition");
    }

    Ok(Some(CurrentConditions {
        icon: icon.to_string(),
        conditions: conditions.map(str::to_string),
        condition,
        pressure_trend: optional_str(block, "pressure_trend")?.map(str::to_string),
        wind_direction_cardinal: optional_str(block, "wind_direction_cardinal")?
            .map(str::to_string),
    }))
}

fn decode_daily(
    forecast: &Map<String, Value>,
    units: DisplayUnits,
) -> Result<Vec<ForecastEntry>, SmartWeatherError> {
    let daily = required_array(forecast, "daily")?;
    let hourly = required_array(forecast, "hourly")?;

    daily
        .iter()
        .map(|day| {
            let day = as_object(day, "daily entry")?;
            let day_num = required_u64(day, "day_num")?;
            let aggregate = aggregate_day(hourly, day_num)?;
            let (condition_code, condition) = condition_of(day)?;

            Ok(ForecastEntry {
                time: required_timestamp(day, "day_start_local")?,
                kind: ForecastKind::Daily,
                condition_code,
                condition,
                temperature: ForecastTemperature::Range {
                    high: units.temperature(required_f64(day, "air_temp_high")?),
                    low: units.temperature(required_f64(day, "air_temp_low")?),
                },
                precipitation: aggregate.precipitation.map(|p| units.volume(p)),
                precipitation_probability: probability(day)?,
                wind_speed: aggregate.wind_avg.map(|w| units.wind_speed(w)),
                wind_bearing: aggregate.wind_bearing,
            })
        })
        .collect()
}

fn decode_hourly(
    forecast: &Map<String, Value>,
    units: DisplayUnits,
) -> Result<Vec<ForecastEntry>, SmartWeatherError> {
    required_array(forecast, "hourly")?
        .iter()
        .map(|hour| {
            let hour = as_object(hour, "hourly entry")?;
            let (condition_code, condition) = condition_of(hour)?;

            Ok(ForecastEntry {
                time: required_timestamp(hour, "time")?,
                kind: ForecastKind::Hourly,
                condition_code,
                condition,
                temperature: ForecastTemperature::Single(
                    units.temperature(required_f64(hour, "air_temperature")?),
                ),
                precipitation: Some(units.volume(required_f64(hour, "precip")?)),
                precipitation_probability: probability(hour)?,
                wind_speed: Some(units.wind_speed(required_f64(hour, "wind_avg")?)),
                wind_bearing: Some(whole_degrees(required_f64(hour, "wind_direction")?)),
            })
        })
        .collect()
}

/// Aggregate the hourly entries that belong to `day_num`
///
/// With no matching hours every aggregate is `None`, so a missing amount is
/// never reported as zero.
///
/// # Errors
///
/// Returns [`SmartWeatherError::MalformedResult`] when a matching hourly entry
/// lacks `precip`, `wind_avg` or `wind_direction`.
pub fn aggregate_day(hourly: &[Value], day_num: u64) -> Result<DayAggregate, SmartWeatherError> {
    let mut hours = 0usize;
    let mut precip = 0.0;
    let mut wind = 0.0;
    let mut bearing = 0.0;

    for hour in hourly {
        let hour = as_object(hour, "hourly entry")?;
        if required_u64(hour, "local_day")? != day_num {
            continue;
        }
        hours += 1;
        precip += required_f64(hour, "precip")?;
        wind += required_f64(hour, "wind_avg")?;
        bearing += required_f64(hour, "wind_direction")?;
    }

    if hours == 0 {
        return Ok(DayAggregate::default());
    }

    #[allow(clippy::cast_precision_loss)]
    let n = hours as f64;
    Ok(DayAggregate {
        hours,
        precipitation: Some(precip),
        wind_avg: Some(wind / n),
        wind_bearing: Some(whole_degrees(bearing / n)),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_degrees(degrees: f64) -> u16 {
    degrees.round().rem_euclid(360.0) as u16
}

fn probability(entry: &Map<String, Value>) -> Result<u8, SmartWeatherError> {
    let value = required_u64(entry, "precip_probability")?.min(100);
    Ok(u8::try_from(value).unwrap_or(100))
}

/// Upstream icon plus its canonical condition, falling back to the
/// `conditions` text when the icon is not recognized
fn condition_of(
    entry: &Map<String, Value>,
) -> Result<(String, Option<Condition>), SmartWeatherError> {
    let icon = required_str(entry, "icon")?;
    let condition = match map_condition(icon) {
        Some(condition) => Some(condition),
        None => optional_str(entry, "conditions")?.and_then(map_condition),
    };
    if condition.is_none() {
        debug!(icon = %icon, "Unmapped forecast condition");
    }
    Ok((icon.to_string(), condition))
}
