//! SmartWeather client configuration

use std::time::Duration;

use domain::{ForecastKind, UnitSystem, WindUnit};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SmartWeatherError;
use crate::schema::ObservationSchema;

/// Configuration for one SmartWeather station
#[derive(Clone, Serialize, Deserialize)]
pub struct SmartWeatherConfig {
    /// Personal or developer API key (sensitive - uses SecretString)
    #[serde(skip_serializing)]
    pub api_key: SecretString,

    /// Station id, accepted as a string or an integer
    #[serde(deserialize_with = "deserialize_station_id")]
    pub station_id: String,

    /// Display unit system
    pub unit_system: UnitSystem,

    /// Wind speed unit (default: ms)
    #[serde(default)]
    pub wind_unit: WindUnit,

    /// Forecast bucket size (default: daily)
    #[serde(default)]
    pub forecast_type: ForecastKind,

    /// Observation poll interval in seconds (default: 60)
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    /// Forecast refresh interval in minutes (default: 5)
    #[serde(default = "default_forecast_interval_minutes")]
    pub forecast_interval_minutes: u64,

    /// Observation payload version (default: tempest)
    #[serde(default)]
    pub api_version: ObservationSchema,

    /// REST API base URL (default: <https://swd.weatherflow.com/swd/rest>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StationIdRepr {
    Number(u64),
    Text(String),
}

fn deserialize_station_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StationIdRepr::deserialize(deserializer)? {
        StationIdRepr::Number(id) => id.to_string(),
        StationIdRepr::Text(id) => id.trim().to_string(),
    })
}

fn default_base_url() -> String {
    "https://swd.weatherflow.com/swd/rest".to_string()
}

const fn default_scan_interval_secs() -> u64 {
    60
}

const fn default_forecast_interval_minutes() -> u64 {
    5
}

const fn default_timeout_secs() -> u64 {
    30
}

impl std::fmt::Debug for SmartWeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartWeatherConfig")
            .field("api_key", &"[REDACTED]")
            .field("station_id", &self.station_id)
            .field("unit_system", &self.unit_system)
            .field("wind_unit", &self.wind_unit)
            .field("forecast_type", &self.forecast_type)
            .field("scan_interval_secs", &self.scan_interval_secs)
            .field("forecast_interval_minutes", &self.forecast_interval_minutes)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl SmartWeatherConfig {
    /// Create a configuration with defaults for everything but the required fields
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        station_id: impl Into<String>,
        unit_system: UnitSystem,
    ) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            station_id: station_id.into(),
            unit_system,
            wind_unit: WindUnit::default(),
            forecast_type: ForecastKind::default(),
            scan_interval_secs: default_scan_interval_secs(),
            forecast_interval_minutes: default_forecast_interval_minutes(),
            api_version: ObservationSchema::default(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Create a configuration suitable for testing against a local server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
            ..Self::new("test-api-key", "1234", UnitSystem::Metric)
        }
    }

    /// API key as plain text, for building request URLs only
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Observation poll interval
    #[must_use]
    pub const fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }

    /// Forecast refresh interval
    #[must_use]
    pub const fn forecast_interval(&self) -> Duration {
        Duration::from_secs(self.forecast_interval_minutes * 60)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`SmartWeatherError::Configuration`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), SmartWeatherError> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(SmartWeatherError::Configuration(
                "api_key must not be empty".to_string(),
            ));
        }

        if self.station_id.trim().is_empty() {
            return Err(SmartWeatherError::Configuration(
                "station_id must not be empty".to_string(),
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(SmartWeatherError::Configuration(
                "base_url must not be empty".to_string(),
            ));
        }

        if self.scan_interval_secs == 0 {
            return Err(SmartWeatherError::Configuration(
                "scan_interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.forecast_interval_minutes == 0 {
            return Err(SmartWeatherError::Configuration(
                "forecast_interval_minutes must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(SmartWeatherError::Configuration(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
