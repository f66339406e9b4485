//! Versioned observation schemas
//!
//! The station API renamed a handful of observation keys when Tempest devices
//! were introduced. The schema is picked from configuration and resolved to a
//! key table once, before decoding starts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SmartWeatherError;

/// Observation payload version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSchema {
    /// Air/Sky era payloads
    Legacy,
    /// Tempest era payloads
    #[default]
    Tempest,
}

/// Upstream key names for the fields that differ between schema versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationKeys {
    /// Average wind speed
    pub wind_average: &'static str,
    /// Precipitation accumulated since local midnight
    pub precipitation_today: &'static str,
    /// Barometric pressure
    pub pressure: &'static str,
}

const LEGACY_KEYS: ObservationKeys = ObservationKeys {
    wind_average: "wind_speed",
    precipitation_today: "precipitation",
    pressure: "pressure",
};

const TEMPEST_KEYS: ObservationKeys = ObservationKeys {
    wind_average: "wind_avg",
    precipitation_today: "precip_accum_local_day",
    pressure: "barometric_pressure",
};

impl ObservationSchema {
    /// Key table for this schema
    #[must_use]
    pub const fn keys(self) -> ObservationKeys {
        match self {
            Self::Legacy => LEGACY_KEYS,
            Self::Tempest => TEMPEST_KEYS,
        }
    }
}

impl fmt::Display for ObservationSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Tempest => write!(f, "tempest"),
        }
    }
}

impl FromStr for ObservationSchema {
    type Err = SmartWeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "tempest" => Ok(Self::Tempest),
            _ => Err(SmartWeatherError::Configuration(format!(
                "unknown api_version '{s}', use 'legacy' or 'tempest'"
            ))),
        }
    }
}
