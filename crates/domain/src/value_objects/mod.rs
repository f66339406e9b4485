//! Value Objects - Immutable, identity-less domain primitives

pub mod condition;
pub mod units;

pub use condition::{Condition, ConditionToken, map_condition};
pub use units::{DisplayUnits, UnitKind, UnitSystem, WindUnit, get_units, wind_direction};
