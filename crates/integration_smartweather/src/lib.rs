//! WeatherFlow SmartWeather integration
//!
//! Client for the SmartWeather REST API (<https://swd.weatherflow.com>).
//! Fetches station observations, forecasts and metadata, decodes them into
//! domain values in the configured units, and keeps per-station snapshots.

pub mod client;
pub mod config;
pub mod decoder;
mod error;
pub mod schema;
pub mod session;

pub use client::{SmartWeatherClient, StationApi};
pub use config::SmartWeatherConfig;
pub use error::SmartWeatherError;
pub use schema::{ObservationKeys, ObservationSchema};
pub use session::StationSession;
