//! SmartWeather REST client
//!
//! HTTP client for the WeatherFlow SmartWeather REST API
//! (<https://weatherflow.github.io/Tempest/api/>).

use async_trait::async_trait;
use domain::{CurrentObservation, DeviceInfo, DisplayUnits, Forecast, ForecastKind, StationInfo};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument, warn};

#[cfg(test)]
use mockall::automock;

use crate::config::SmartWeatherConfig;
use crate::decoder;
use crate::error::SmartWeatherError;

/// Units the forecast endpoint is asked to report in, matching the
/// observation endpoint's canonical units
const FORECAST_UNITS: [(&str, &str); 5] = [
    ("units_temp", "c"),
    ("units_wind", "mps"),
    ("units_pressure", "mb"),
    ("units_precip", "mm"),
    ("units_distance", "km"),
];

/// Station API operations
///
/// Each operation performs one GET and decodes the full body. Nothing is
/// retried; the caller owns the polling schedule.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StationApi: Send + Sync {
    /// Fetch and decode the latest observation
    async fn fetch_current(&self) -> Result<CurrentObservation, SmartWeatherError>;

    /// Fetch and decode the forecast series
    async fn fetch_forecast(&self, kind: ForecastKind) -> Result<Forecast, SmartWeatherError>;

    /// Fetch the devices attached to the station
    async fn fetch_devices(&self) -> Result<Vec<DeviceInfo>, SmartWeatherError>;

    /// Fetch station metadata
    async fn fetch_station_metadata(&self) -> Result<StationInfo, SmartWeatherError>;
}

/// SmartWeather HTTP client implementation
#[derive(Debug)]
pub struct SmartWeatherClient {
    client: Client,
    config: SmartWeatherConfig,
}

impl SmartWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: SmartWeatherConfig) -> Result<Self, SmartWeatherError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SmartWeatherError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Display units applied by the decoders
    #[must_use]
    pub const fn units(&self) -> DisplayUnits {
        DisplayUnits::new(self.config.unit_system, self.config.wind_unit)
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn observation_url(&self) -> String {
        format!(
            "{}/observations/station/{}",
            self.base_url(),
            self.config.station_id
        )
    }

    fn forecast_url(&self) -> String {
        format!("{}/better_forecast", self.base_url())
    }

    fn station_url(&self) -> String {
        format!("{}/stations/{}", self.base_url(), self.config.station_id)
    }

    /// GET a JSON document and check that `required_key` is present
    ///
    /// The API key travels as a query parameter and is kept out of logs and
    /// error messages.
    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        required_key: &str,
    ) -> Result<Value, SmartWeatherError> {
        debug!(url = %url, "Requesting station data");

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.config.api_key())])
            .query(query)
            .send()
            .await
            .map_err(|e| SmartWeatherError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = %status, "API key rejected");
            return Err(SmartWeatherError::InvalidApiKey);
        }
        if !status.is_success() {
            return Err(SmartWeatherError::RequestError(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SmartWeatherError::RequestError(e.without_url().to_string()))?;

        let json: Value = serde_json::from_slice(&body)
            .map_err(|e| SmartWeatherError::ResultError(format!("invalid JSON: {e}")))?;

        check_status(&json)?;

        if json.get(required_key).is_none_or(Value::is_null) {
            return Err(SmartWeatherError::ResultError(format!(
                "response has no '{required_key}'"
            )));
        }

        Ok(json)
    }
}

/// Reject bodies whose embedded status reports a failure
///
/// An embedded 401/403 is an authentication rejection like its HTTP twin.
fn check_status(json: &Value) -> Result<(), SmartWeatherError> {
    let Some(status) = json.get("status") else {
        return Ok(());
    };
    match status.get("status_code").and_then(Value::as_i64) {
        Some(0) | None => Ok(()),
        Some(code @ (401 | 403)) => {
            warn!(status_code = code, "API key rejected");
            Err(SmartWeatherError::InvalidApiKey)
        },
        Some(code) => {
            let message = status
                .get("status_message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            Err(SmartWeatherError::ResultError(format!(
                "status {code}: {message}"
            )))
        },
    }
}

#[async_trait]
impl StationApi for SmartWeatherClient {
    #[instrument(skip(self), fields(station_id = %self.config.station_id))]
    async fn fetch_current(&self) -> Result<CurrentObservation, SmartWeatherError> {
        let json = self.get_json(&self.observation_url(), &[], "obs").await?;
        decoder::decode_observation(&json, self.units(), self.config.api_version)
    }

    #[instrument(skip(self), fields(station_id = %self.config.station_id))]
    async fn fetch_forecast(&self, kind: ForecastKind) -> Result<Forecast, SmartWeatherError> {
        let mut query = vec![("station_id", self.config.station_id.as_str())];
        query.extend(FORECAST_UNITS);

        let json = self
            .get_json(&self.forecast_url(), &query, "forecast")
            .await?;
        decoder::decode_forecast(&json, kind, self.units())
    }

    #[instrument(skip(self), fields(station_id = %self.config.station_id))]
    async fn fetch_devices(&self) -> Result<Vec<DeviceInfo>, SmartWeatherError> {
        let json = self.get_json(&self.station_url(), &[], "stations").await?;
        decoder::decode_devices(&json)
    }

    #[instrument(skip(self), fields(station_id = %self.config.station_id))]
    async fn fetch_station_metadata(&self) -> Result<StationInfo, SmartWeatherError> {
        let json = self.get_json(&self.station_url(), &[], "stations").await?;
        decoder::decode_station_info(&json)
    }
}
