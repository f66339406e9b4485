//! Domain entities - Snapshots produced by a successful poll

mod alert;
mod forecast;
mod observation;
mod station;

pub use alert::Alert;
pub use forecast::{
    CurrentConditions, Forecast, ForecastEntry, ForecastKind, ForecastTemperature,
};
pub use observation::CurrentObservation;
pub use station::{DeviceInfo, StationInfo};
