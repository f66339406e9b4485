//! Current station observation

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Alert;
use crate::value_objects::{DisplayUnits, UnitKind};

/// Normalized current conditions reported by a station
///
/// Built fresh on every successful poll and never mutated afterwards; the next
/// poll replaces it wholesale. Quantities are display values in
/// [`Self::units`]; `raining` and `freezing` were derived from the canonical
/// values before conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentObservation {
    /// Station display name
    pub station_name: String,
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Station latitude
    pub latitude: f64,
    /// Station longitude
    pub longitude: f64,

    /// Air temperature
    pub temperature: f64,
    /// Feels-like temperature
    pub feels_like_temperature: Option<f64>,
    /// Heat index
    pub heat_index: Option<f64>,
    /// Wind chill
    pub wind_chill: Option<f64>,
    /// Dew point
    pub dew_point: Option<f64>,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,

    /// Average wind speed
    pub wind_speed: f64,
    /// Wind gust
    pub wind_gust: f64,
    /// Wind lull
    pub wind_lull: Option<f64>,
    /// Wind bearing in degrees (0-359)
    pub wind_bearing: u16,
    /// 16-point compass direction of `wind_bearing`
    pub wind_direction: &'static str,

    /// Precipitation accumulated today
    pub precipitation: f64,
    /// Precipitation in the last hour
    pub precipitation_last_1hr: Option<f64>,
    /// Precipitation in the last 24 hours
    pub precipitation_last_24hr: Option<f64>,
    /// Precipitation accumulated yesterday
    pub precipitation_yesterday: Option<f64>,
    /// Instantaneous precipitation rate
    pub precipitation_rate: f64,
    /// Minutes with precipitation today
    pub precipitation_minutes_today: Option<u32>,
    /// Minutes with precipitation yesterday
    pub precipitation_minutes_yesterday: Option<u32>,

    /// Barometric pressure
    pub pressure: f64,
    /// Station pressure
    pub station_pressure: Option<f64>,
    /// Sea level pressure
    pub sea_level_pressure: Option<f64>,

    /// UV index
    pub uv: Option<f64>,
    /// Solar radiation in W/m²
    pub solar_radiation: Option<u32>,
    /// Brightness in lux
    pub illuminance: Option<u32>,

    /// Lightning strikes in the current observation interval
    pub lightning_strike_count: Option<u32>,
    /// Lightning strikes in the last hour
    pub lightning_strike_count_last_1hr: Option<u32>,
    /// Lightning strikes in the last 3 hours
    pub lightning_strike_count_last_3hr: Option<u32>,
    /// Time of the last detected strike
    pub lightning_strike_last_time: Option<DateTime<Utc>>,
    /// Distance to the last detected strike
    pub lightning_strike_last_distance: Option<f64>,

    /// Instantaneous precipitation is above zero
    pub raining: bool,
    /// Air temperature is below 0 °C
    pub freezing: bool,

    /// Station alerts, if any were delivered
    pub alerts: Vec<Alert>,

    /// Units the quantities above are expressed in
    pub units: DisplayUnits,
}

impl CurrentObservation {
    /// Unit label for a quantity of this observation
    #[must_use]
    pub const fn unit_label(&self, kind: UnitKind) -> &'static str {
        kind.label(self.units.unit_system, self.units.wind_unit)
    }

    /// Human-readable station position
    #[must_use]
    pub fn position(&self) -> String {
        format!("Lat: {}, Lon: {}", self.latitude, self.longitude)
    }

    /// Lightning was detected in the last 3 hours
    #[must_use]
    pub fn lightning_detected(&self) -> bool {
        self.lightning_strike_count_last_3hr.is_some_and(|count| count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{UnitSystem, WindUnit};

    fn observation() -> CurrentObservation {
        CurrentObservation {
            station_name: "Backyard".to_string(),
            timestamp: DateTime::from_timestamp(1_596_733_459, 0).unwrap(),
            latitude: 55.625,
            longitude: 12.0861,
            temperature: 70.4,
            feels_like_temperature: None,
            heat_index: None,
            wind_chill: None,
            dew_point: None,
            humidity: 56,
            wind_speed: 7.3,
            wind_gust: 9.0,
            wind_lull: None,
            wind_bearing: 90,
            wind_direction: "E",
            precipitation: 0.0,
            precipitation_last_1hr: None,
            precipitation_last_24hr: None,
            precipitation_yesterday: None,
            precipitation_rate: 0.0,
            precipitation_minutes_today: None,
            precipitation_minutes_yesterday: None,
            pressure: 29.805,
            station_pressure: None,
            sea_level_pressure: None,
            uv: None,
            solar_radiation: None,
            illuminance: None,
            lightning_strike_count: None,
            lightning_strike_count_last_1hr: None,
            lightning_strike_count_last_3hr: None,
            lightning_strike_last_time: None,
            lightning_strike_last_distance: None,
            raining: false,
            freezing: false,
            alerts: Vec::new(),
            units: DisplayUnits::new(UnitSystem::Imperial, WindUnit::MetersPerSecond),
        }
    }

    #[test]
    fn test_position() {
        assert_eq!(observation().position(), "Lat: 55.625, Lon: 12.0861");
    }

    #[test]
    fn test_unit_label_follows_observation_units() {
        let obs = observation();
        assert_eq!(obs.unit_label(UnitKind::Temperature), "°F");
        assert_eq!(obs.unit_label(UnitKind::Wind), "mph");
        assert_eq!(obs.unit_label(UnitKind::Pressure), "inHg");
    }

    #[test]
    fn test_lightning_detected() {
        let mut obs = observation();
        assert!(!obs.lightning_detected());
        obs.lightning_strike_count_last_3hr = Some(0);
        assert!(!obs.lightning_detected());
        obs.lightning_strike_count_last_3hr = Some(1);
        assert!(obs.lightning_detected());
    }
}
