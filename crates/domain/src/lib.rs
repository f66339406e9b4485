//! Domain layer for the SmartWeather station integration
//!
//! Contains the normalized station data model, unit conversion, condition
//! mapping and sensor reading descriptors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod readings;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use readings::{BinarySensorKind, Reading, ReadingValue, SensorKind};
pub use value_objects::*;
