//! Station and device metadata

use std::fmt;

use serde::Serialize;

/// Hardware module attached to a station
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Upstream device id
    pub device_id: u64,
    /// Serial number
    pub serial_number: String,
    /// Device type code (`ST`, `AR`, `SK`, `HB`)
    pub device_type: String,
    /// Hardware revision
    pub hardware_revision: Option<String>,
    /// Firmware revision
    pub firmware_revision: Option<String>,
}

impl DeviceInfo {
    /// Hubs relay data but do not measure anything
    #[must_use]
    pub fn is_hub(&self) -> bool {
        self.device_type.eq_ignore_ascii_case("HB")
    }

    /// Human-readable model name for the device type
    #[must_use]
    pub fn model(&self) -> &str {
        match self.device_type.as_str() {
            "ST" => "Tempest",
            "AR" => "Air",
            "SK" => "Sky",
            "HB" => "Hub",
            other => other,
        }
    }
}

impl fmt::Display for DeviceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.model(), self.serial_number)?;
        if let Some(fw) = &self.firmware_revision {
            write!(f, " (fw {fw})")?;
        }
        Ok(())
    }
}

/// Station metadata, fetched once per session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInfo {
    /// Upstream station id
    pub station_id: u64,
    /// Station display name
    pub station_name: String,
    /// Serial number of the primary sensor module
    pub serial_number: Option<String>,
    /// Device type of the primary sensor module
    pub device_type: Option<String>,
    /// Firmware revision of the primary sensor module
    pub firmware_revision: Option<String>,
    /// Latitude
    pub latitude: Option<f64>,
    /// Longitude
    pub longitude: Option<f64>,
    /// Elevation in meters
    pub elevation: Option<f64>,
    /// IANA timezone name
    pub timezone: Option<String>,
    /// Attached devices
    pub devices: Vec<DeviceInfo>,
}

impl StationInfo {
    /// The first device that is not a hub, falling back to the hub
    #[must_use]
    pub fn primary_device(&self) -> Option<&DeviceInfo> {
        self.devices
            .iter()
            .find(|d| !d.is_hub())
            .or_else(|| self.devices.first())
    }
}
