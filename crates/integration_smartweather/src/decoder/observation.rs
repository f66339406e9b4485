//! Observation decoder
//!
//! Turns an `observations/station/{id}` payload into a [`CurrentObservation`]
//! built from the newest sample in `obs`, whatever order upstream sends.
//! `raining` and `freezing` are derived from the canonical values before any
//! unit conversion is applied.

use chrono::{DateTime, Utc};
use domain::value_objects::wind_direction;
use domain::{Alert, CurrentObservation, DisplayUnits};
use serde_json::{Map, Value};
use tracing::debug;

use super::{
    as_object, optional_f64, optional_timestamp, optional_u32, required_array, required_f64,
    required_str, required_timestamp, required_u64,
};
use crate::error::SmartWeatherError;
use crate::schema::ObservationSchema;

/// Decode the most recent observation of a station payload
///
/// # Errors
///
/// Returns [`SmartWeatherError::MalformedResult`] when `obs` is missing or
/// empty, when a required key is missing, or when any key has the wrong type.
pub fn decode_observation(
    payload: &Value,
    units: DisplayUnits,
    schema: ObservationSchema,
) -> Result<CurrentObservation, SmartWeatherError> {
    let keys = schema.keys();
    let root = as_object(payload, "observation payload")?;

    let (timestamp, obs) = latest_sample(required_array(root, "obs")?)?;

    let station_name = required_str(root, "station_name")?.to_string();
    let latitude = required_f64(root, "latitude")?;
    let longitude = required_f64(root, "longitude")?;

    let air_temperature = required_f64(obs, "air_temperature")?;
    let humidity = u8::try_from(required_u64(obs, "relative_humidity")?.min(100)).unwrap_or(100);
    let wind_avg = required_f64(obs, keys.wind_average)?;
    let wind_gust = required_f64(obs, "wind_gust")?;
    let bearing = required_f64(obs, "wind_direction")?;
    let precip = required_f64(obs, "precip")?;
    let precip_today = required_f64(obs, keys.precipitation_today)?;
    let pressure = required_f64(obs, keys.pressure)?;

    let alerts = decode_alerts(root)?;

    debug!(
        station = %station_name,
        %timestamp,
        schema = %schema,
        alerts = alerts.len(),
        "Decoded observation"
    );

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let wind_bearing = bearing.rem_euclid(360.0).trunc() as u16 % 360;

    Ok(CurrentObservation {
        station_name,
        timestamp,
        latitude,
        longitude,
        temperature: units.temperature(air_temperature),
        feels_like_temperature: optional_f64(obs, "feels_like")?.map(|t| units.temperature(t)),
        heat_index: optional_f64(obs, "heat_index")?.map(|t| units.temperature(t)),
        wind_chill: optional_f64(obs, "wind_chill")?.map(|t| units.temperature(t)),
        dew_point: optional_f64(obs, "dew_point")?.map(|t| units.temperature(t)),
        humidity,
        wind_speed: units.wind_speed(wind_avg),
        wind_gust: units.wind_speed(wind_gust),
        wind_lull: optional_f64(obs, "wind_lull")?.map(|s| units.wind_speed(s)),
        wind_bearing,
        wind_direction: wind_direction(bearing),
        precipitation: units.volume(precip_today),
        precipitation_last_1hr: optional_f64(obs, "precip_accum_last_1hr")?
            .map(|v| units.volume(v)),
        precipitation_last_24hr: optional_f64(obs, "precip_accum_last_24hr")?
            .map(|v| units.volume(v)),
        precipitation_yesterday: optional_f64(obs, "precip_accum_local_yesterday")?
            .map(|v| units.volume(v)),
        precipitation_rate: units.rate(precip),
        precipitation_minutes_today: optional_u32(obs, "precip_minutes_local_day")?,
        precipitation_minutes_yesterday: optional_u32(obs, "precip_minutes_local_yesterday")?,
        pressure: units.pressure(pressure),
        station_pressure: optional_f64(obs, "station_pressure")?.map(|p| units.pressure(p)),
        sea_level_pressure: optional_f64(obs, "sea_level_pressure")?.map(|p| units.pressure(p)),
        uv: optional_f64(obs, "uv")?,
        solar_radiation: optional_u32(obs, "solar_radiation")?,
        illuminance: optional_u32(obs, "brightness")?,
        lightning_strike_count: optional_u32(obs, "lightning_strike_count")?,
        lightning_strike_count_last_1hr: optional_u32(obs, "lightning_strike_count_last_1hr")?,
        lightning_strike_count_last_3hr: optional_u32(obs, "lightning_strike_count_last_3hr")?,
        lightning_strike_last_time: optional_timestamp(obs, "lightning_strike_last_epoch")?,
        lightning_strike_last_distance: optional_f64(obs, "lightning_strike_last_distance")?
            .map(|d| units.distance(d)),
        raining: precip > 0.0,
        freezing: air_temperature < 0.0,
        alerts,
        units,
    })
}

/// The sample with the newest `timestamp`; on a tie the later element wins
fn latest_sample(
    samples: &[Value],
) -> Result<(DateTime<Utc>, &Map<String, Value>), SmartWeatherError> {
    let mut latest: Option<(DateTime<Utc>, &Map<String, Value>)> = None;
    for sample in samples {
        let sample = as_object(sample, "observation")?;
        let timestamp = required_timestamp(sample, "timestamp")?;
        if latest.is_none_or(|(newest, _)| timestamp >= newest) {
            latest = Some((timestamp, sample));
        }
    }
    latest.ok_or_else(|| SmartWeatherError::MalformedResult("'obs' is empty".to_string()))
}

fn decode_alerts(root: &Map<String, Value>) -> Result<Vec<Alert>, SmartWeatherError> {
    let Some(raw) = root.get("alerts").filter(|v| !v.is_null()) else {
        return Ok(Vec::new());
    };
    let items = raw.as_array().ok_or_else(|| {
        SmartWeatherError::MalformedResult("'alerts' must be an array".to_string())
    })?;
    items
        .iter()
        .map(|item| match item {
            Value::Object(fields) => Ok(Alert::new(fields.clone())),
            _ => Err(SmartWeatherError::MalformedResult(
                "alert is not an object".to_string(),
            )),
        })
        .collect()
}
