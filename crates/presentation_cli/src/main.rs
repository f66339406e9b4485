//! SmartWeather CLI
//!
//! Command-line interface for fetching and inspecting station data.

#![allow(clippy::print_stdout)]

mod settings;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use domain::{
    BinarySensorKind, CurrentObservation, Forecast, ForecastKind, SensorKind, UnitSystem, WindUnit,
    get_units,
};
use integration_smartweather::{
    ObservationSchema, SmartWeatherClient, SmartWeatherConfig, StationApi, StationSession,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::settings::Overrides;

/// SmartWeather CLI
#[derive(Parser)]
#[command(name = "smartweather-cli")]
#[command(author, version, about = "WeatherFlow SmartWeather station client", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./smartweather.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// API key
    #[arg(long, env = "SMARTWEATHER_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Station id
    #[arg(long, global = true)]
    station_id: Option<String>,

    /// Unit system (metric, imperial)
    #[arg(long, global = true)]
    units: Option<UnitSystem>,

    /// Wind speed unit (ms, kmh)
    #[arg(long, global = true)]
    wind_unit: Option<WindUnit>,

    /// Observation payload version (legacy, tempest)
    #[arg(long, global = true)]
    api_version: Option<ObservationSchema>,

    /// REST API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest observation
    Current,

    /// Show sensor readings and binary sensor states for the latest observation
    Sensors,

    /// Show the current weather state: condition, pressure trend and today's range
    Conditions,

    /// Show the forecast
    Forecast {
        /// Forecast type (daily, hourly); defaults to the configured type
        #[arg(short, long)]
        kind: Option<ForecastKind>,

        /// Skip the first entry (today, or the current hour)
        #[arg(long)]
        future: bool,
    },

    /// Show station metadata
    Station,

    /// List devices attached to the station
    Devices,

    /// Show the unit labels for the configured unit selection
    Units,

    /// Poll the station on the configured intervals
    ///
    /// Example: smartweather-cli watch --count 10
    Watch {
        /// Stop after this many observation polls (0 = run until interrupted)
        #[arg(long, default_value = "0")]
        count: u64,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Readings view printed by the `sensors` command
#[derive(Serialize)]
struct SensorReport {
    sensors: Vec<domain::Reading>,
    binary_sensors: Vec<BinaryState>,
}

#[derive(Serialize)]
struct BinaryState {
    name: &'static str,
    on: bool,
    icon: &'static str,
}

/// Weather-entity view printed by the `conditions` command
#[derive(Serialize)]
struct ConditionsReport {
    condition: Option<domain::Condition>,
    conditions: Option<String>,
    current_icon: Option<String>,
    pressure_trend: Option<String>,
    temp_high_today: Option<f64>,
    temp_low_today: Option<f64>,
}

impl ConditionsReport {
    fn from_forecast(forecast: &Forecast) -> Self {
        let current = forecast.current.clone();
        let range = forecast.today_range();
        Self {
            condition: current.as_ref().and_then(|c| c.condition),
            conditions: current.as_ref().and_then(|c| c.conditions.clone()),
            current_icon: current.as_ref().map(|c| c.icon.clone()),
            pressure_trend: current.and_then(|c| c.pressure_trend),
            temp_high_today: range.map(|(high, _)| high),
            temp_low_today: range.map(|(_, low)| low),
        }
    }
}

fn log_observation(observation: &CurrentObservation) {
    info!(
        station = %observation.station_name,
        position = %observation.position(),
        alerts = observation.alerts.len(),
        "Observation received"
    );
    for alert in &observation.alerts {
        let fields: Vec<&str> = alert.field_names().collect();
        warn!(alert = %alert, fields = ?fields, "Station alert");
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn overrides(cli: &Cli) -> Overrides {
    Overrides {
        api_key: cli.api_key.clone(),
        station_id: cli.station_id.clone(),
        unit_system: cli.units,
        wind_unit: cli.wind_unit,
        forecast_type: match cli.command {
            Commands::Forecast { kind, .. } => kind,
            _ => None,
        },
        api_version: cli.api_version,
        base_url: cli.base_url.clone(),
    }
}

async fn watch(
    config: SmartWeatherConfig,
    client: SmartWeatherClient,
    count: u64,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(config.scan_interval());
    let mut session = StationSession::from_config(client, &config);
    let mut polls = 0;

    loop {
        interval.tick().await;

        match session.refresh_current().await {
            Ok(observation) => {
                log_observation(&observation);
                print_json(observation.as_ref())?;
            },
            Err(e) if e.is_fatal() => return Err(e.into()),
            Err(_) => {},
        }

        let now = Utc::now();
        if session.forecast_due(now) {
            match session.refresh_forecast(now).await {
                Ok(forecast) => info!(entries = forecast.len(), "Forecast updated"),
                Err(e) if e.is_fatal() => return Err(e.into()),
                Err(_) => {},
            }
        }

        polls += 1;
        if count > 0 && polls >= count {
            break;
        }
    }

    if session.current().is_none() {
        warn!("No observation was received");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = settings::load(cli.config.as_deref(), overrides(&cli))?;

    if let Commands::Units = cli.command {
        return print_json(&get_units(config.unit_system, config.wind_unit));
    }

    info!(station_id = %config.station_id, "Connecting to SmartWeather");
    let client = SmartWeatherClient::new(config.clone())?;

    match cli.command {
        Commands::Current => {
            let observation = client.fetch_current().await?;
            log_observation(&observation);
            print_json(&observation)?;
        },

        Commands::Conditions => {
            let forecast = client.fetch_forecast(ForecastKind::Daily).await?;
            print_json(&ConditionsReport::from_forecast(&forecast))?;
        },

        Commands::Sensors => {
            let observation = client.fetch_current().await?;
            let report = SensorReport {
                sensors: SensorKind::all_readings(&observation),
                binary_sensors: BinarySensorKind::ALL
                    .into_iter()
                    .map(|kind| {
                        let on = kind.is_on(&observation);
                        BinaryState {
                            name: kind.name(),
                            on,
                            icon: kind.icon(on),
                        }
                    })
                    .collect(),
            };
            print_json(&report)?;
        },

        Commands::Forecast { future, .. } => {
            let forecast = client.fetch_forecast(config.forecast_type).await?;
            if future {
                print_json(&forecast.future_days())?;
            } else {
                print_json(&forecast.entries)?;
            }
        },

        Commands::Station => {
            let station = client.fetch_station_metadata().await?;
            print_json(&station)?;
        },

        Commands::Devices => {
            let devices = client.fetch_devices().await?;
            print_json(&devices)?;
        },

        Commands::Watch { count } => {
            watch(config, client, count).await?;
        },

        Commands::Units => {},
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_verbosity_zero() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
    }

    #[test]
    fn log_filter_verbosity_one() {
        assert_eq!(log_filter_from_verbosity(1), "info");
    }

    #[test]
    fn log_filter_verbosity_two() {
        assert_eq!(log_filter_from_verbosity(2), "debug");
    }

    #[test]
    fn log_filter_verbosity_three_or_more() {
        assert_eq!(log_filter_from_verbosity(3), "trace");
        assert_eq!(log_filter_from_verbosity(10), "trace");
    }

    #[test]
    fn forecast_kind_flag_becomes_override() {
        let cli = Cli::try_parse_from(["smartweather-cli", "forecast", "--kind", "hourly"]).unwrap();
        assert_eq!(overrides(&cli).forecast_type, Some(ForecastKind::Hourly));
    }

    #[test]
    fn other_commands_keep_configured_forecast_kind() {
        let cli = Cli::try_parse_from(["smartweather-cli", "current"]).unwrap();
        assert_eq!(overrides(&cli).forecast_type, None);
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "smartweather-cli",
            "current",
            "--station-id",
            "2777",
            "--units",
            "imperial",
            "--wind-unit",
            "kmh",
            "--api-version",
            "legacy",
        ])
        .unwrap();
        let parsed = overrides(&cli);
        assert_eq!(parsed.station_id.as_deref(), Some("2777"));
        assert_eq!(parsed.unit_system, Some(UnitSystem::Imperial));
        assert_eq!(parsed.wind_unit, Some(WindUnit::KilometersPerHour));
        assert_eq!(parsed.api_version, Some(ObservationSchema::Legacy));
    }

    #[test]
    fn invalid_unit_is_rejected() {
        let result = Cli::try_parse_from(["smartweather-cli", "units", "--units", "kelvin"]);
        assert!(result.is_err());
    }

    #[test]
    fn conditions_report_from_forecast() {
        let cli = Cli::try_parse_from(["smartweather-cli", "conditions"]).unwrap();
        assert!(matches!(cli.command, Commands::Conditions));

        use domain::{
            Condition, CurrentConditions, DisplayUnits, ForecastEntry, ForecastTemperature,
        };

        let forecast = Forecast {
            kind: ForecastKind::Daily,
            units: DisplayUnits::new(UnitSystem::Metric, WindUnit::MetersPerSecond),
            current: Some(CurrentConditions {
                icon: "partly-cloudy-day".to_string(),
                conditions: Some("Partly Cloudy".to_string()),
                condition: Some(Condition::Partlycloudy),
                pressure_trend: Some("rising".to_string()),
                wind_direction_cardinal: None,
            }),
            entries: vec![ForecastEntry {
                time: chrono::DateTime::from_timestamp(1_596_412_800, 0).unwrap(),
                kind: ForecastKind::Daily,
                condition_code: "cloudy".to_string(),
                condition: Some(Condition::Cloudy),
                temperature: ForecastTemperature::Range {
                    high: 19.5,
                    low: 12.0,
                },
                precipitation: None,
                precipitation_probability: 0,
                wind_speed: None,
                wind_bearing: None,
            }],
        };

        let report = ConditionsReport::from_forecast(&forecast);
        assert_eq!(report.condition, Some(Condition::Partlycloudy));
        assert_eq!(report.current_icon.as_deref(), Some("partly-cloudy-day"));
        assert_eq!(report.pressure_trend.as_deref(), Some("rising"));
        assert_eq!(report.temp_high_today, Some(19.5));
        assert_eq!(report.temp_low_today, Some(12.0));

        let empty = Forecast {
            current: None,
            entries: Vec::new(),
            ..forecast
        };
        let report = ConditionsReport::from_forecast(&empty);
        assert_eq!(report.condition, None);
        assert_eq!(report.temp_high_today, None);
    }

    #[test]
    fn watch_defaults_to_unbounded() {
        let cli = Cli::try_parse_from(["smartweather-cli", "watch"]).unwrap();
        assert!(matches!(cli.command, Commands::Watch { count: 0 }));
    }
}
