//! Sensor readings
//!
//! Named, typed views over a [`CurrentObservation`]. Each [`SensorKind`] has a
//! static [`SensorDescriptor`] and resolves its value through an explicit match
//! on the observation's fields.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::entities::CurrentObservation;
use crate::errors::DomainError;
use crate::value_objects::UnitKind;

/// Device class hint for consumers that group readings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Temperature,
    Humidity,
    Pressure,
    Illuminance,
}

/// Where a reading takes its unit label from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingUnit {
    /// Follows the unit selectors of the observation
    Quantity(UnitKind),
    /// Same label in every unit system
    Fixed(&'static str),
    /// Unitless
    None,
}

/// Static metadata of a sensor kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorDescriptor {
    /// Display name
    pub name: &'static str,
    /// Material Design icon name
    pub icon: &'static str,
    /// Device class, if any
    pub device_class: Option<DeviceClass>,
    /// Unit source
    pub unit: ReadingUnit,
}

/// Sensor-style readings derived from an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    FeelsLikeTemperature,
    HeatIndex,
    WindChill,
    DewPoint,
    WindSpeed,
    WindGust,
    WindLull,
    WindBearing,
    WindDirection,
    Precipitation,
    PrecipitationLast1hr,
    PrecipitationLast24hr,
    PrecipitationYesterday,
    PrecipitationRate,
    PrecipitationMinutesToday,
    PrecipitationMinutesYesterday,
    Humidity,
    Pressure,
    Uv,
    SolarRadiation,
    Illuminance,
    LightningCount,
    LightningDistance,
}

const fn temperature(name: &'static str) -> SensorDescriptor {
    SensorDescriptor {
        name,
        icon: "mdi:thermometer",
        device_class: Some(DeviceClass::Temperature),
        unit: ReadingUnit::Quantity(UnitKind::Temperature),
    }
}

const fn plain(name: &'static str, icon: &'static str, unit: ReadingUnit) -> SensorDescriptor {
    SensorDescriptor {
        name,
        icon,
        device_class: None,
        unit,
    }
}

impl SensorKind {
    /// Every sensor kind, in display order
    pub const ALL: [Self; 24] = [
        Self::Temperature,
        Self::FeelsLikeTemperature,
        Self::HeatIndex,
        Self::WindChill,
        Self::DewPoint,
        Self::WindSpeed,
        Self::WindGust,
        Self::WindLull,
        Self::WindBearing,
        Self::WindDirection,
        Self::Precipitation,
        Self::PrecipitationLast1hr,
        Self::PrecipitationLast24hr,
        Self::PrecipitationYesterday,
        Self::PrecipitationRate,
        Self::PrecipitationMinutesToday,
        Self::PrecipitationMinutesYesterday,
        Self::Humidity,
        Self::Pressure,
        Self::Uv,
        Self::SolarRadiation,
        Self::Illuminance,
        Self::LightningCount,
        Self::LightningDistance,
    ];

    /// Stable machine name
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::FeelsLikeTemperature => "feels_like_temperature",
            Self::HeatIndex => "heat_index",
            Self::WindChill => "wind_chill",
            Self::DewPoint => "dew_point",
            Self::WindSpeed => "wind_speed",
            Self::WindGust => "wind_gust",
            Self::WindLull => "wind_lull",
            Self::WindBearing => "wind_bearing",
            Self::WindDirection => "wind_direction",
            Self::Precipitation => "precipitation",
            Self::PrecipitationLast1hr => "precipitation_last_1hr",
            Self::PrecipitationLast24hr => "precipitation_last_24hr",
            Self::PrecipitationYesterday => "precipitation_yesterday",
            Self::PrecipitationRate => "precipitation_rate",
            Self::PrecipitationMinutesToday => "precipitation_minutes_today",
            Self::PrecipitationMinutesYesterday => "precipitation_minutes_yesterday",
            Self::Humidity => "humidity",
            Self::Pressure => "pressure",
            Self::Uv => "uv",
            Self::SolarRadiation => "solar_radiation",
            Self::Illuminance => "illuminance",
            Self::LightningCount => "lightning_count",
            Self::LightningDistance => "lightning_distance",
        }
    }

    /// Static metadata for this kind
    #[must_use]
    pub const fn descriptor(self) -> SensorDescriptor {
        match self {
            Self::Temperature => temperature("Temperature"),
            Self::FeelsLikeTemperature => temperature("Feels Like"),
            Self::HeatIndex => temperature("Heat Index"),
            Self::WindChill => temperature("Wind Chill"),
            Self::DewPoint => temperature("Dewpoint"),
            Self::WindSpeed => plain(
                "Wind Speed",
                "mdi:weather-windy",
                ReadingUnit::Quantity(UnitKind::Wind),
            ),
            Self::WindGust => plain(
                "Wind Gust",
                "mdi:weather-windy",
                ReadingUnit::Quantity(UnitKind::Wind),
            ),
            Self::WindLull => plain(
                "Wind Lull",
                "mdi:weather-windy",
                ReadingUnit::Quantity(UnitKind::Wind),
            ),
            Self::WindBearing => plain("Wind Bearing", "mdi:compass-outline", ReadingUnit::Fixed("°")),
            Self::WindDirection => plain("Wind Direction", "mdi:compass-outline", ReadingUnit::None),
            Self::Precipitation => plain(
                "Rain today",
                "mdi:weather-rainy",
                ReadingUnit::Quantity(UnitKind::Rain),
            ),
            Self::PrecipitationLast1hr => plain(
                "Rain last hour",
                "mdi:weather-rainy",
                ReadingUnit::Quantity(UnitKind::Rain),
            ),
            Self::PrecipitationLast24hr => plain(
                "Rain last 24 hours",
                "mdi:weather-rainy",
                ReadingUnit::Quantity(UnitKind::Rain),
            ),
            Self::PrecipitationYesterday => plain(
                "Rain yesterday",
                "mdi:weather-rainy",
                ReadingUnit::Quantity(UnitKind::Rain),
            ),
            Self::PrecipitationRate => plain(
                "Rain rate",
                "mdi:weather-pouring",
                ReadingUnit::Quantity(UnitKind::RainRate),
            ),
            Self::PrecipitationMinutesToday => {
                plain("Rain minutes today", "mdi:timer", ReadingUnit::Fixed("min"))
            },
            Self::PrecipitationMinutesYesterday => plain(
                "Rain minutes yesterday",
                "mdi:timer",
                ReadingUnit::Fixed("min"),
            ),
            Self::Humidity => SensorDescriptor {
                name: "Humidity",
                icon: "mdi:water-percent",
                device_class: Some(DeviceClass::Humidity),
                unit: ReadingUnit::Fixed("%"),
            },
            Self::Pressure => SensorDescriptor {
                name: "Pressure",
                icon: "mdi:gauge",
                device_class: Some(DeviceClass::Pressure),
                unit: ReadingUnit::Quantity(UnitKind::Pressure),
            },
            Self::Uv => plain("UV", "mdi:weather-sunny", ReadingUnit::Fixed("UV index")),
            Self::SolarRadiation => {
                plain("Solar Radiation", "mdi:solar-power", ReadingUnit::Fixed("W/m²"))
            },
            Self::Illuminance => SensorDescriptor {
                name: "Illuminance",
                icon: "mdi:brightness-5",
                device_class: Some(DeviceClass::Illuminance),
                unit: ReadingUnit::Fixed("lx"),
            },
            Self::LightningCount => {
                plain("Lightning Count", "mdi:weather-lightning", ReadingUnit::None)
            },
            Self::LightningDistance => plain(
                "Lightning Distance",
                "mdi:weather-lightning",
                ReadingUnit::Quantity(UnitKind::Distance),
            ),
        }
    }

    /// Resolve this reading from an observation
    ///
    /// Returns `None` when the observation does not carry the field.
    #[must_use]
    pub fn reading(self, obs: &CurrentObservation) -> Option<Reading> {
        let value = match self {
            Self::Temperature => ReadingValue::Number(obs.temperature),
            Self::FeelsLikeTemperature => ReadingValue::Number(obs.feels_like_temperature?),
            Self::HeatIndex => ReadingValue::Number(obs.heat_index?),
            Self::WindChill => ReadingValue::Number(obs.wind_chill?),
            Self::DewPoint => ReadingValue::Number(obs.dew_point?),
            Self::WindSpeed => ReadingValue::Number(obs.wind_speed),
            Self::WindGust => ReadingValue::Number(obs.wind_gust),
            Self::WindLull => ReadingValue::Number(obs.wind_lull?),
            Self::WindBearing => ReadingValue::Integer(i64::from(obs.wind_bearing)),
            Self::WindDirection => ReadingValue::Text(obs.wind_direction),
            Self::Precipitation => ReadingValue::Number(obs.precipitation),
            Self::PrecipitationLast1hr => ReadingValue::Number(obs.precipitation_last_1hr?),
            Self::PrecipitationLast24hr => ReadingValue::Number(obs.precipitation_last_24hr?),
            Self::PrecipitationYesterday => ReadingValue::Number(obs.precipitation_yesterday?),
            Self::PrecipitationRate => ReadingValue::Number(obs.precipitation_rate),
            Self::PrecipitationMinutesToday => {
                ReadingValue::Integer(i64::from(obs.precipitation_minutes_today?))
            },
            Self::PrecipitationMinutesYesterday => {
                ReadingValue::Integer(i64::from(obs.precipitation_minutes_yesterday?))
            },
            Self::Humidity => ReadingValue::Integer(i64::from(obs.humidity)),
            Self::Pressure => ReadingValue::Number(obs.pressure),
            Self::Uv => ReadingValue::Number(obs.uv?),
            Self::SolarRadiation => ReadingValue::Integer(i64::from(obs.solar_radiation?)),
            Self::Illuminance => ReadingValue::Integer(i64::from(obs.illuminance?)),
            Self::LightningCount => ReadingValue::Integer(i64::from(obs.lightning_strike_count?)),
            Self::LightningDistance => ReadingValue::Number(obs.lightning_strike_last_distance?),
        };

        let unit = match self.descriptor().unit {
            ReadingUnit::Quantity(kind) => Some(obs.unit_label(kind)),
            ReadingUnit::Fixed(label) => Some(label),
            ReadingUnit::None => None,
        };

        Some(Reading {
            kind: self,
            name: self.descriptor().name,
            value,
            unit,
        })
    }

    /// Resolve every available reading from an observation
    #[must_use]
    pub fn all_readings(obs: &CurrentObservation) -> Vec<Reading> {
        Self::ALL.iter().filter_map(|kind| kind.reading(obs)).collect()
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SensorKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::InvalidValue(format!("unknown sensor '{s}'")))
    }
}

/// A reading value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Integer(i64),
    Text(&'static str),
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// A resolved sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    /// Sensor kind
    pub kind: SensorKind,
    /// Display name
    pub name: &'static str,
    /// Value in the observation's display units
    pub value: ReadingValue,
    /// Unit label, if the reading has one
    pub unit: Option<&'static str>,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Some(unit) => write!(f, "{}: {} {unit}", self.name, self.value),
            None => write!(f, "{}: {}", self.name, self.value),
        }
    }
}

/// On/off readings derived from an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinarySensorKind {
    Raining,
    Freezing,
    Lightning,
}

impl BinarySensorKind {
    /// Every binary sensor kind
    pub const ALL: [Self; 3] = [Self::Raining, Self::Freezing, Self::Lightning];

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raining => "Raining",
            Self::Freezing => "Freezing",
            Self::Lightning => "Lightning",
        }
    }

    /// Current state for an observation
    #[must_use]
    pub fn is_on(self, obs: &CurrentObservation) -> bool {
        match self {
            Self::Raining => obs.raining,
            Self::Freezing => obs.freezing,
            Self::Lightning => obs.lightning_detected(),
        }
    }

    /// Icon for the given state
    #[must_use]
    pub const fn icon(self, on: bool) -> &'static str {
        match (self, on) {
            (Self::Raining, true) => "mdi:water",
            (Self::Raining, false) => "mdi:water-off",
            (Self::Freezing, true) => "mdi:fridge",
            (Self::Freezing, false) => "mdi:fridge-outline",
            (Self::Lightning, true) => "mdi:weather-lightning",
            (Self::Lightning, false) => "mdi:flash-off",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{DisplayUnits, UnitSystem, WindUnit};
    use chrono::DateTime;

    fn observation(units: DisplayUnits) -> CurrentObservation {
        CurrentObservation {
            station_name: "Backyard".to_string(),
            timestamp: DateTime::from_timestamp(1_596_733_459, 0).unwrap(),
            latitude: 55.6,
            longitude: 12.5,
            temperature: 21.3,
            feels_like_temperature: Some(21.3),
            heat_index: None,
            wind_chill: None,
            dew_point: Some(12.1),
            humidity: 56,
            wind_speed: 2.1,
            wind_gust: 3.4,
            wind_lull: None,
            wind_bearing: 270,
            wind_direction: "W",
            precipitation: 1.2,
            precipitation_last_1hr: Some(0.0),
            precipitation_last_24hr: None,
            precipitation_yesterday: None,
            precipitation_rate: 0.0,
            precipitation_minutes_today: Some(14),
            precipitation_minutes_yesterday: None,
            pressure: 1013.2,
            station_pressure: None,
            sea_level_pressure: None,
            uv: Some(3.2),
            solar_radiation: Some(450),
            illuminance: None,
            lightning_strike_count: Some(0),
            lightning_strike_count_last_1hr: None,
            lightning_strike_count_last_3hr: Some(2),
            lightning_strike_last_time: None,
            lightning_strike_last_distance: None,
            raining: false,
            freezing: false,
            alerts: Vec::new(),
            units,
        }
    }

    #[test]
    fn test_reading_uses_observation_units() {
        let metric = observation(DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond));
        let reading = SensorKind::Pressure.reading(&metric).unwrap();
        assert_eq!(reading.value, ReadingValue::Number(1013.2));
        assert_eq!(reading.unit, Some("hPa"));

        let kmh = observation(DisplayUnits::new(UnitSystem::Imperial, WindUnit::KilometersPerHour));
        assert_eq!(SensorKind::WindGust.reading(&kmh).unwrap().unit, Some("km/h"));
        assert_eq!(SensorKind::Temperature.reading(&kmh).unwrap().unit, Some("°F"));
    }

    #[test]
    fn test_missing_optional_field_has_no_reading() {
        let obs = observation(DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond));
        assert!(SensorKind::HeatIndex.reading(&obs).is_none());
        assert!(SensorKind::LightningDistance.reading(&obs).is_none());
        assert!(SensorKind::DewPoint.reading(&obs).is_some());
    }

    #[test]
    fn test_fixed_and_unitless_readings() {
        let obs = observation(DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond));
        let direction = SensorKind::WindDirection.reading(&obs).unwrap();
        assert_eq!(direction.value, ReadingValue::Text("W"));
        assert_eq!(direction.unit, None);
        assert_eq!(direction.to_string(), "Wind Direction: W");

        let humidity = SensorKind::Humidity.reading(&obs).unwrap();
        assert_eq!(humidity.to_string(), "Humidity: 56 %");
    }

    #[test]
    fn test_all_readings_skips_missing() {
        let obs = observation(DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond));
        let readings = SensorKind::all_readings(&obs);
        assert!(readings.iter().all(|r| r.kind != SensorKind::HeatIndex));
        assert!(readings.iter().any(|r| r.kind == SensorKind::SolarRadiation));
    }

    #[test]
    fn test_sensor_kind_parse() {
        for kind in SensorKind::ALL {
            assert_eq!(kind.key().parse::<SensorKind>().unwrap(), kind);
        }
        assert!("rain_gauge".parse::<SensorKind>().is_err());
    }

    #[test]
    fn test_descriptor_device_class() {
        assert_eq!(
            SensorKind::DewPoint.descriptor().device_class,
            Some(DeviceClass::Temperature)
        );
        assert_eq!(SensorKind::WindSpeed.descriptor().device_class, None);
    }

    #[test]
    fn test_binary_sensors() {
        let mut obs = observation(DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond));
        assert!(!BinarySensorKind::Raining.is_on(&obs));
        assert!(BinarySensorKind::Lightning.is_on(&obs));

        obs.lightning_strike_count_last_3hr = Some(0);
        assert!(!BinarySensorKind::Lightning.is_on(&obs));
        obs.lightning_strike_count_last_3hr = None;
        assert!(!BinarySensorKind::Lightning.is_on(&obs));

        obs.freezing = true;
        assert!(BinarySensorKind::Freezing.is_on(&obs));
        assert_eq!(BinarySensorKind::Freezing.icon(true), "mdi:fridge");
        assert_eq!(BinarySensorKind::Raining.icon(false), "mdi:water-off");
    }
}
