//! Unit systems and unit conversion
//!
//! The station API always delivers quantities in the same canonical units:
//!
//! | Quantity | Canonical unit |
//! |---|---|
//! | temperature | °C |
//! | wind speed | m/s |
//! | precipitation volume | mm |
//! | precipitation rate | mm/h |
//! | pressure | mb (hPa) |
//! | distance | km |
//!
//! The conversion functions in this module take a canonical value and return
//! the display value, rounded to the precision defined for that quantity in the
//! selected unit system. They are only applied at the presentation boundary;
//! anything derived from a reading (freezing, raining) must be computed on the
//! canonical value.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::{UnitSystem, WindUnit, units};
//!
//! assert!((units::temperature(20.0, UnitSystem::Imperial) - 68.0).abs() < f64::EPSILON);
//! assert!(
//!     (units::wind_speed(5.0, UnitSystem::Imperial, WindUnit::KilometersPerHour) - 18.0).abs()
//!         < f64::EPSILON
//! );
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const MPS_TO_MPH: f64 = 2.236_936_292_1;
const MPS_TO_KMH: f64 = 3.6;
const MM_TO_INCH: f64 = 0.039_370_078_7;
const HPA_TO_INHG: f64 = 0.029_529_980_164_7;
const KM_TO_MILE: f64 = 0.621_371_192;

/// Display unit system for every quantity except wind speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// °C, mm, hPa, km
    Metric,
    /// °F, in, inHg, mi
    Imperial,
}

impl UnitSystem {
    /// Check if this is the imperial system
    #[must_use]
    pub const fn is_imperial(self) -> bool {
        matches!(self, Self::Imperial)
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            _ => Err(DomainError::InvalidValue(format!(
                "unit system '{s}', use 'metric' or 'imperial'"
            ))),
        }
    }
}

/// Wind speed display scale
///
/// Orthogonal to [`UnitSystem`]: `KilometersPerHour` always yields km/h, while
/// `MetersPerSecond` follows the unit system default (m/s or mph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindUnit {
    /// Meters per second (mph under the imperial system)
    #[default]
    #[serde(rename = "ms")]
    MetersPerSecond,
    /// Kilometers per hour
    #[serde(rename = "kmh")]
    KilometersPerHour,
}

impl fmt::Display for WindUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetersPerSecond => write!(f, "ms"),
            Self::KilometersPerHour => write!(f, "kmh"),
        }
    }
}

impl FromStr for WindUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ms" | "m/s" | "mps" => Ok(Self::MetersPerSecond),
            "kmh" | "km/h" | "kph" => Ok(Self::KilometersPerHour),
            _ => Err(DomainError::InvalidValue(format!(
                "wind unit '{s}', use 'ms' or 'kmh'"
            ))),
        }
    }
}

/// The pair of unit selectors a reading is rendered with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayUnits {
    /// Unit system for temperature, precipitation, pressure and distance
    pub unit_system: UnitSystem,
    /// Wind speed scale
    pub wind_unit: WindUnit,
}

impl DisplayUnits {
    /// Create a new selector pair
    #[must_use]
    pub const fn new(unit_system: UnitSystem, wind_unit: WindUnit) -> Self {
        Self {
            unit_system,
            wind_unit,
        }
    }

    /// Convert a canonical temperature
    #[must_use]
    pub fn temperature(self, celsius: f64) -> f64 {
        temperature(celsius, self.unit_system)
    }

    /// Convert a canonical wind speed
    #[must_use]
    pub fn wind_speed(self, mps: f64) -> f64 {
        wind_speed(mps, self.unit_system, self.wind_unit)
    }

    /// Convert a canonical precipitation volume
    #[must_use]
    pub fn volume(self, mm: f64) -> f64 {
        volume(mm, self.unit_system)
    }

    /// Convert a canonical precipitation rate
    #[must_use]
    pub fn rate(self, mm_per_hour: f64) -> f64 {
        rate(mm_per_hour, self.unit_system)
    }

    /// Convert a canonical pressure
    #[must_use]
    pub fn pressure(self, hpa: f64) -> f64 {
        pressure(hpa, self.unit_system)
    }

    /// Convert a canonical distance
    #[must_use]
    pub fn distance(self, km: f64) -> f64 {
        distance(km, self.unit_system)
    }

    /// Unit labels for these selectors
    #[must_use]
    pub fn labels(self) -> BTreeMap<UnitKind, &'static str> {
        get_units(self.unit_system, self.wind_unit)
    }
}

/// Physical quantity kinds that carry a unit label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Temperature,
    Wind,
    Rain,
    RainRate,
    Pressure,
    Distance,
}

impl UnitKind {
    /// All quantity kinds
    pub const ALL: [Self; 6] = [
        Self::Temperature,
        Self::Wind,
        Self::Rain,
        Self::RainRate,
        Self::Pressure,
        Self::Distance,
    ];

    /// Unit label for this quantity under the given selectors
    #[must_use]
    pub const fn label(self, unit_system: UnitSystem, wind_unit: WindUnit) -> &'static str {
        let imperial = unit_system.is_imperial();
        match self {
            Self::Temperature if imperial => "°F",
            Self::Temperature => "°C",
            Self::Wind => match (wind_unit, imperial) {
                (WindUnit::KilometersPerHour, _) => "km/h",
                (WindUnit::MetersPerSecond, true) => "mph",
                (WindUnit::MetersPerSecond, false) => "m/s",
            },
            Self::Rain if imperial => "in",
            Self::Rain => "mm",
            Self::RainRate if imperial => "in/h",
            Self::RainRate => "mm/h",
            Self::Pressure if imperial => "inHg",
            Self::Pressure => "hPa",
            Self::Distance if imperial => "mi",
            Self::Distance => "km",
        }
    }
}

/// Unit labels for every quantity kind, so presentation code can label values
/// without re-deriving the conversion rules
#[must_use]
pub fn get_units(unit_system: UnitSystem, wind_unit: WindUnit) -> BTreeMap<UnitKind, &'static str> {
    UnitKind::ALL
        .into_iter()
        .map(|kind| (kind, kind.label(unit_system, wind_unit)))
        .collect()
}

/// Round half away from zero to the given number of decimals
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Unrounded °C to °F
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Unrounded °F to °C
#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Temperature: °C or °F, one decimal
#[must_use]
pub fn temperature(celsius: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Imperial => round_to(celsius_to_fahrenheit(celsius), 1),
        UnitSystem::Metric => round_to(celsius, 1),
    }
}

/// Wind speed: km/h when requested, otherwise m/s or mph, one decimal
#[must_use]
pub fn wind_speed(mps: f64, unit_system: UnitSystem, wind_unit: WindUnit) -> f64 {
    match (wind_unit, unit_system) {
        (WindUnit::KilometersPerHour, _) => round_to(mps * MPS_TO_KMH, 1),
        (WindUnit::MetersPerSecond, UnitSystem::Imperial) => round_to(mps * MPS_TO_MPH, 1),
        (WindUnit::MetersPerSecond, UnitSystem::Metric) => round_to(mps, 1),
    }
}

/// Precipitation volume: mm (one decimal) or in (two decimals)
#[must_use]
pub fn volume(mm: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Imperial => round_to(mm * MM_TO_INCH, 2),
        UnitSystem::Metric => round_to(mm, 1),
    }
}

/// Precipitation rate: mm/h (two decimals) or in/h (three decimals)
#[must_use]
pub fn rate(mm_per_hour: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Imperial => round_to(mm_per_hour * MM_TO_INCH, 3),
        UnitSystem::Metric => round_to(mm_per_hour, 2),
    }
}

/// Pressure: hPa (one decimal) or inHg (three decimals)
#[must_use]
pub fn pressure(hpa: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Imperial => round_to(hpa * HPA_TO_INHG, 3),
        UnitSystem::Metric => round_to(hpa, 1),
    }
}

/// Distance: km (whole) or mi (one decimal)
#[must_use]
pub fn distance(km: f64, unit_system: UnitSystem) -> f64 {
    match unit_system {
        UnitSystem::Imperial => round_to(km * KM_TO_MILE, 1),
        UnitSystem::Metric => round_to(km, 0),
    }
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass direction for a bearing in degrees
///
/// Bearings outside `[0, 360)` are normalized first; 348.75 and above wrap
/// back to `"N"`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn wind_direction(bearing: f64) -> &'static str {
    let bearing = bearing.rem_euclid(360.0);
    let index = ((bearing + 11.25) / 22.5).floor() as usize % COMPASS.len();
    COMPASS[index]
}
