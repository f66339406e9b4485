//! Per-station session
//!
//! A [`StationSession`] owns one client and the last good snapshots for one
//! station. A failed refresh never replaces a snapshot; the previous value
//! stays readable and the error is handed back to the caller.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use domain::{CurrentObservation, Forecast, ForecastKind, StationInfo};
use tracing::{debug, warn};

use crate::client::StationApi;
use crate::config::SmartWeatherConfig;
use crate::error::SmartWeatherError;

/// Snapshot cache for one station
///
/// Refreshes take `&mut self`, so at most one request per station is in
/// flight.
#[derive(Debug)]
pub struct StationSession<C: StationApi> {
    client: C,
    forecast_kind: ForecastKind,
    forecast_interval: Duration,
    current: Option<Arc<CurrentObservation>>,
    forecast: Option<Arc<Forecast>>,
    forecast_fetched_at: Option<DateTime<Utc>>,
    station: Option<Arc<StationInfo>>,
}

impl<C: StationApi> StationSession<C> {
    /// Create an empty session
    #[must_use]
    pub const fn new(client: C, forecast_kind: ForecastKind, forecast_interval: Duration) -> Self {
        Self {
            client,
            forecast_kind,
            forecast_interval,
            current: None,
            forecast: None,
            forecast_fetched_at: None,
            station: None,
        }
    }

    /// Create an empty session using the forecast settings of `config`
    #[must_use]
    pub const fn from_config(client: C, config: &SmartWeatherConfig) -> Self {
        Self::new(client, config.forecast_type, config.forecast_interval())
    }

    /// Last good observation
    #[must_use]
    pub fn current(&self) -> Option<Arc<CurrentObservation>> {
        self.current.clone()
    }

    /// Last good forecast
    #[must_use]
    pub fn forecast(&self) -> Option<Arc<Forecast>> {
        self.forecast.clone()
    }

    /// Fetch a new observation and replace the snapshot on success
    ///
    /// # Errors
    ///
    /// Returns the client error; the previous snapshot is kept.
    pub async fn refresh_current(&mut self) -> Result<Arc<CurrentObservation>, SmartWeatherError> {
        match self.client.fetch_current().await {
            Ok(observation) => {
                debug!(timestamp = %observation.timestamp, "Observation refreshed");
                let observation = Arc::new(observation);
                self.current = Some(Arc::clone(&observation));
                Ok(observation)
            },
            Err(e) => {
                warn!(
                    error = %e,
                    cached = self.current.is_some(),
                    "Observation refresh failed, keeping previous snapshot"
                );
                Err(e)
            },
        }
    }

    /// Whether the forecast refresh interval has elapsed at `now`
    #[must_use]
    pub fn forecast_due(&self, now: DateTime<Utc>) -> bool {
        let Some(fetched_at) = self.forecast_fetched_at else {
            return true;
        };
        match TimeDelta::from_std(self.forecast_interval) {
            Ok(interval) => now - fetched_at >= interval,
            Err(_) => false,
        }
    }

    /// Fetch a new forecast and replace the snapshot on success
    ///
    /// `now` is recorded as the fetch time for [`Self::forecast_due`].
    ///
    /// # Errors
    ///
    /// Returns the client error; the previous snapshot is kept.
    pub async fn refresh_forecast(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Arc<Forecast>, SmartWeatherError> {
        match self.client.fetch_forecast(self.forecast_kind).await {
            Ok(forecast) => {
                debug!(entries = forecast.len(), "Forecast refreshed");
                let forecast = Arc::new(forecast);
                self.forecast = Some(Arc::clone(&forecast));
                self.forecast_fetched_at = Some(now);
                Ok(forecast)
            },
            Err(e) => {
                warn!(
                    error = %e,
                    cached = self.forecast.is_some(),
                    "Forecast refresh failed, keeping previous snapshot"
                );
                Err(e)
            },
        }
    }

    /// Station metadata, fetched on first use and cached for the session
    ///
    /// # Errors
    ///
    /// Returns the client error when the first fetch fails.
    pub async fn station_info(&mut self) -> Result<Arc<StationInfo>, SmartWeatherError> {
        if let Some(station) = &self.station {
            return Ok(Arc::clone(station));
        }
        let station = Arc::new(self.client.fetch_station_metadata().await?);
        self.station = Some(Arc::clone(&station));
        Ok(station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockStationApi;
    use domain::{DisplayUnits, UnitSystem, WindUnit};

    fn units() -> DisplayUnits {
        DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond)
    }

    fn observation(temperature: f64) -> CurrentObservation {
        CurrentObservation {
            station_name: "Backyard".to_string(),
            timestamp: DateTime::from_timestamp(1_596_733_459, 0).unwrap(),
            latitude: 55.6,
            longitude: 12.5,
            temperature,
            feels_like_temperature: None,
            heat_index: None,
            wind_chill: None,
            dew_point: None,
            humidity: 50,
            wind_speed: 1.0,
            wind_gust: 2.0,
            wind_lull: None,
            wind_bearing: 0,
            wind_direction: "N",
            precipitation: 0.0,
            precipitation_last_1hr: None,
            precipitation_last_24hr: None,
            precipitation_yesterday: None,
            precipitation_rate: 0.0,
            precipitation_minutes_today: None,
            precipitation_minutes_yesterday: None,
            pressure: 1013.0,
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
            units: units(),
        }
    }

    fn empty_forecast() -> Forecast {
        Forecast {
            kind: ForecastKind::Daily,
            units: units(),
            current: None,
            entries: Vec::new(),
        }
    }

    fn station() -> StationInfo {
        StationInfo {
            station_id: 1234,
            station_name: "Backyard".to_string(),
            serial_number: None,
            device_type: None,
            firmware_revision: None,
            latitude: None,
            longitude: None,
            elevation: None,
            timezone: None,
            devices: Vec::new(),
        }
    }

    fn session(mock: MockStationApi) -> StationSession<MockStationApi> {
        StationSession::new(mock, ForecastKind::Daily, Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_refresh_current_stores_snapshot() {
        let mut mock = MockStationApi::new();
        mock.expect_fetch_current()
            .times(1)
            .returning(|| Ok(observation(21.3)));

        let mut session = session(mock);
        assert!(session.current().is_none());

        let obs = session.refresh_current().await.unwrap();
        assert!((obs.temperature - 21.3).abs() < f64::EPSILON);
        assert!(Arc::ptr_eq(&obs, &session.current().unwrap()));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let mut mock = MockStationApi::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_fetch_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(observation(21.3)));
        mock.expect_fetch_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(SmartWeatherError::RequestError("timeout".to_string())));
        mock.expect_fetch_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(SmartWeatherError::MalformedResult("missing 'obs'".to_string())));

        let mut session = session(mock);
        session.refresh_current().await.unwrap();

        let err = session.refresh_current().await.unwrap_err();
        assert!(err.is_retryable());
        assert!(session.refresh_current().await.is_err());

        let cached = session.current().unwrap();
        assert!((cached.temperature - 21.3).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_forecast_due_and_refresh() {
        let mut mock = MockStationApi::new();
        mock.expect_fetch_forecast()
            .withf(|kind| *kind == ForecastKind::Daily)
            .times(1)
            .returning(|_| Ok(empty_forecast()));

        let mut session = session(mock);
        let t0 = DateTime::from_timestamp(1_596_733_459, 0).unwrap();
        assert!(session.forecast_due(t0));

        session.refresh_forecast(t0).await.unwrap();
        assert!(session.forecast().is_some());
        assert!(!session.forecast_due(t0 + TimeDelta::seconds(299)));
        assert!(session.forecast_due(t0 + TimeDelta::seconds(300)));
    }

    #[tokio::test]
    async fn test_failed_forecast_keeps_due_state() {
        let mut mock = MockStationApi::new();
        mock.expect_fetch_forecast()
            .returning(|_| Err(SmartWeatherError::InvalidApiKey));

        let mut session = session(mock);
        let t0 = DateTime::from_timestamp(1_596_733_459, 0).unwrap();
        let err = session.refresh_forecast(t0).await.unwrap_err();
        assert!(err.is_fatal());
        assert!(session.forecast().is_none());
        assert!(session.forecast_due(t0));
    }

    #[tokio::test]
    async fn test_station_info_fetched_once() {
        let mut mock = MockStationApi::new();
        mock.expect_fetch_station_metadata()
            .times(1)
            .returning(|| Ok(station()));

        let mut session = session(mock);
        let first = session.station_info().await.unwrap();
        let second = session.station_info().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.station_id, 1234);
    }

    #[tokio::test]
    async fn test_from_config() {
        let mut config = SmartWeatherConfig::for_testing("http://localhost:1");
        config.forecast_type = ForecastKind::Hourly;
        config.forecast_interval_minutes = 10;

        let mut mock = MockStationApi::new();
        mock.expect_fetch_forecast()
            .withf(|kind| *kind == ForecastKind::Hourly)
            .returning(|_| Ok(empty_forecast()));

        let mut session = StationSession::from_config(mock, &config);
        let t0 = DateTime::from_timestamp(1_596_733_459, 0).unwrap();
        session.refresh_forecast(t0).await.unwrap();
        assert!(!session.forecast_due(t0 + TimeDelta::minutes(9)));
        assert!(session.forecast_due(t0 + TimeDelta::minutes(10)));
    }
}
