//! Station metadata decoder for the `stations/{id}` payload

use domain::{DeviceInfo, StationInfo};
use serde_json::{Map, Value};

use super::{as_object, optional_f64, optional_str, required_array, required_str, required_u64};
use crate::error::SmartWeatherError;

/// Decode the devices of the first station in the payload
///
/// # Errors
///
/// Returns [`SmartWeatherError::MalformedResult`] when `stations` is missing or
/// empty, or a device lacks its id, serial number or type.
pub fn decode_devices(payload: &Value) -> Result<Vec<DeviceInfo>, SmartWeatherError> {
    let station = first_station(payload)?;
    devices_of(station)
}

/// Decode station metadata from the first station in the payload
///
/// Serial number, type and firmware are taken from the first device that is
/// not a hub, falling back to the hub.
///
/// # Errors
///
/// Returns [`SmartWeatherError::MalformedResult`] when a required key is
/// missing or mistyped.
pub fn decode_station_info(payload: &Value) -> Result<StationInfo, SmartWeatherError> {
    let station = first_station(payload)?;
    let devices = devices_of(station)?;

    let mut info = StationInfo {
        station_id: required_u64(station, "station_id")?,
        station_name: required_str(station, "name")?.to_string(),
        serial_number: None,
        device_type: None,
        firmware_revision: None,
        latitude: optional_f64(station, "latitude")?,
        longitude: optional_f64(station, "longitude")?,
        elevation: match station.get("station_meta") {
            Some(Value::Object(meta)) => optional_f64(meta, "elevation")?,
            _ => None,
        },
        timezone: optional_str(station, "timezone")?.map(str::to_string),
        devices,
    };

    if let Some(primary) = info.primary_device().cloned() {
        info.serial_number = Some(primary.serial_number);
        info.device_type = Some(primary.device_type);
        info.firmware_revision = primary.firmware_revision;
    }

    Ok(info)
}

fn first_station(payload: &Value) -> Result<&Map<String, Value>, SmartWeatherError> {
    let root = as_object(payload, "station payload")?;
    let station = required_array(root, "stations")?
        .first()
        .ok_or_else(|| SmartWeatherError::MalformedResult("'stations' is empty".to_string()))?;
    as_object(station, "station")
}

fn devices_of(station: &Map<String, Value>) -> Result<Vec<DeviceInfo>, SmartWeatherError> {
    let Some(devices) = station.get("devices").filter(|v| !v.is_null()) else {
        return Ok(Vec::new());
    };
    devices
        .as_array()
        .ok_or_else(|| SmartWeatherError::MalformedResult("'devices' must be an array".to_string()))?
        .iter()
        .map(|device| {
            let device = as_object(device, "device")?;
            Ok(DeviceInfo {
                device_id: required_u64(device, "device_id")?,
                serial_number: required_str(device, "serial_number")?.to_string(),
                device_type: required_str(device, "device_type")?.to_string(),
                hardware_revision: revision(device, "hardware_revision")?,
                firmware_revision: revision(device, "firmware_revision")?,
            })
        })
        .collect()
}

/// Revisions arrive as strings or integers depending on the device generation
fn revision(device: &Map<String, Value>, key: &str) -> Result<Option<String>, SmartWeatherError> {
    match device.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(SmartWeatherError::MalformedResult(format!(
            "'{key}' must be a string or a number"
        ))),
    }
}
