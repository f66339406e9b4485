//! Forecast entries
//!
//! A forecast is an ordered, chronological sequence of day or hour buckets.
//! The first daily bucket is usually "today"; skipping it is left to the
//! consumer (see [`Forecast::future_days`]).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{Condition, DisplayUnits};

/// Forecast bucket size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastKind {
    /// One bucket per day
    #[default]
    Daily,
    /// One bucket per hour
    Hourly,
}

impl fmt::Display for ForecastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Hourly => write!(f, "hourly"),
        }
    }
}

impl FromStr for ForecastKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "hourly" => Ok(Self::Hourly),
            _ => Err(DomainError::InvalidValue(format!(
                "forecast type '{s}', use 'daily' or 'hourly'"
            ))),
        }
    }
}

/// Forecast temperature: one value per hour, a high/low pair per day
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastTemperature {
    /// Hourly temperature
    Single(f64),
    /// Daily high and low
    Range { high: f64, low: f64 },
}

impl ForecastTemperature {
    /// The single value, or the daily high
    #[must_use]
    pub const fn high(self) -> f64 {
        match self {
            Self::Single(value) => value,
            Self::Range { high, .. } => high,
        }
    }

    /// The daily low, if this is a range
    #[must_use]
    pub const fn low(self) -> Option<f64> {
        match self {
            Self::Single(_) => None,
            Self::Range { low, .. } => Some(low),
        }
    }
}

/// A single forecast bucket in display units
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    /// Bucket start time
    pub time: DateTime<Utc>,
    /// Bucket size
    pub kind: ForecastKind,
    /// Upstream condition token (icon name)
    pub condition_code: String,
    /// Canonical condition, `None` when the token is not recognized
    pub condition: Option<Condition>,
    /// Temperature
    pub temperature: ForecastTemperature,
    /// Precipitation amount; `None` when it could not be derived
    pub precipitation: Option<f64>,
    /// Precipitation probability percentage (0-100)
    pub precipitation_probability: u8,
    /// Average wind speed; `None` when it could not be derived
    pub wind_speed: Option<f64>,
    /// Average wind bearing in degrees; `None` when it could not be derived
    pub wind_bearing: Option<u16>,
}

impl ForecastEntry {
    /// Bucket start as Unix seconds
    #[must_use]
    pub fn epoch(&self) -> i64 {
        self.time.timestamp()
    }
}

/// Station-level "right now" summary carried alongside a forecast
///
/// This is what a weather entity uses as its state. Every field is optional
/// upstream except the icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentConditions {
    /// Upstream icon token
    pub icon: String,
    /// Upstream condition text (e.g. `"Partly Cloudy"`)
    pub conditions: Option<String>,
    /// Canonical condition; `None` when neither text nor icon is known
    pub condition: Option<Condition>,
    /// Barometric trend (`"rising"`, `"steady"`, `"falling"`)
    pub pressure_trend: Option<String>,
    /// Cardinal wind direction as reported upstream
    pub wind_direction_cardinal: Option<String>,
}

/// A decoded forecast series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// Bucket size of every entry
    pub kind: ForecastKind,
    /// Units the entries are expressed in
    pub units: DisplayUnits,
    /// Current conditions, when the payload carries them
    pub current: Option<CurrentConditions>,
    /// Chronological entries, including the current bucket
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    /// The current bucket (today or this hour)
    #[must_use]
    pub fn today(&self) -> Option<&ForecastEntry> {
        self.entries.first()
    }

    /// High and low temperature of the current daily bucket
    ///
    /// `None` for hourly series and empty forecasts.
    #[must_use]
    pub fn today_range(&self) -> Option<(f64, f64)> {
        match self.today()?.temperature {
            ForecastTemperature::Range { high, low } => Some((high, low)),
            ForecastTemperature::Single(_) => None,
        }
    }

    /// Entries after the current bucket
    #[must_use]
    pub fn future_days(&self) -> &[ForecastEntry] {
        self.entries.get(1..).unwrap_or_default()
    }

    /// Get the first N entries
    #[must_use]
    pub fn next(&self, n: usize) -> &[ForecastEntry] {
        let end = n.min(self.entries.len());
        &self.entries[..end]
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the series is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
