//! Configuration loading for the CLI
//!
//! Sources, lowest precedence first:
//! 1. `smartweather.toml` (or the file given with `--config`), optional
//! 2. `SMARTWEATHER_*` environment variables (e.g. `SMARTWEATHER_STATION_ID`)
//! 3. command-line flags

use std::path::Path;

use config::{Config, Environment, File};
use domain::{ForecastKind, UnitSystem, WindUnit};
use integration_smartweather::{ObservationSchema, SmartWeatherConfig};

/// Default configuration file name, resolved relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "smartweather";

/// Values given on the command line, applied over file and environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub station_id: Option<String>,
    pub unit_system: Option<UnitSystem>,
    pub wind_unit: Option<WindUnit>,
    pub forecast_type: Option<ForecastKind>,
    pub api_version: Option<ObservationSchema>,
    pub base_url: Option<String>,
}

/// Load and validate the station configuration
///
/// # Errors
///
/// Returns an error if a source cannot be read, a required key is missing,
/// or the resulting configuration fails validation.
pub fn load(path: Option<&Path>, overrides: Overrides) -> anyhow::Result<SmartWeatherConfig> {
    let environment = Environment::with_prefix("SMARTWEATHER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true);
    load_from(path, environment, overrides)
}

fn load_from(
    path: Option<&Path>,
    environment: Environment,
    overrides: Overrides,
) -> anyhow::Result<SmartWeatherConfig> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config: SmartWeatherConfig = Config::builder()
        .add_source(file)
        .add_source(environment)
        .set_override_option("api_key", overrides.api_key)?
        .set_override_option("station_id", overrides.station_id)?
        .set_override_option("unit_system", overrides.unit_system.map(|u| u.to_string()))?
        .set_override_option("wind_unit", overrides.wind_unit.map(|u| u.to_string()))?
        .set_override_option(
            "forecast_type",
            overrides.forecast_type.map(|k| k.to_string()),
        )?
        .set_override_option("api_version", overrides.api_version.map(|v| v.to_string()))?
        .set_override_option("base_url", overrides.base_url)?
        .build()?
        .try_deserialize()?;

    config.validate()?;
    Ok(config)
}
