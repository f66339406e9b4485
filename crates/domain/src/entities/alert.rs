//! Station alerts
//!
//! Alerts are sparse, loosely-typed records. Fields are looked up by name and
//! a missing field is reported as [`DomainError::PropertyUnavailable`].

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::DomainError;

/// A free-form alert attached to an observation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Alert {
    fields: Map<String, Value>,
}

impl Alert {
    /// Wrap the raw alert object
    #[must_use]
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Result<&Value, DomainError> {
        self.fields
            .get(name)
            .ok_or_else(|| DomainError::property_unavailable(name))
    }

    /// Look up a string field by name
    ///
    /// A present field that is not a string is reported as invalid rather
    /// than unavailable.
    pub fn get_str(&self, name: &str) -> Result<&str, DomainError> {
        self.get(name)?
            .as_str()
            .ok_or_else(|| DomainError::InvalidValue(format!("alert field '{name}' is not a string")))
    }

    /// Alert title
    pub fn title(&self) -> Result<&str, DomainError> {
        self.get_str("title")
    }

    /// Alert time as delivered upstream
    pub fn time(&self) -> Result<&Value, DomainError> {
        self.get("time")
    }

    /// Names of the fields this alert carries
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title().unwrap_or("untitled");
        match self.time() {
            Ok(time) => write!(f, "<Alert: {title} at {time}>"),
            Err(_) => write!(f, "<Alert: {title}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert(value: Value) -> Alert {
        match value {
            Value::Object(fields) => Alert::new(fields),
            _ => unreachable!("test alerts are objects"),
        }
    }

    #[test]
    fn test_get_present_field() {
        let a = alert(json!({"title": "Frost warning", "severity": "moderate"}));
        assert_eq!(a.get("severity").unwrap(), &json!("moderate"));
        assert_eq!(a.title().unwrap(), "Frost warning");
    }

    #[test]
    fn test_get_missing_field_is_unavailable() {
        let a = alert(json!({"title": "Frost warning"}));
        let err = a.get("expires").unwrap_err();
        assert!(matches!(err, DomainError::PropertyUnavailable { ref name } if name == "expires"));
    }

    #[test]
    fn test_get_str_wrong_type_is_invalid() {
        let a = alert(json!({"title": 42}));
        assert!(matches!(a.title(), Err(DomainError::InvalidValue(_))));
    }

    #[test]
    fn test_display() {
        let a = alert(json!({"title": "Wind", "time": 1_596_733_459}));
        assert_eq!(a.to_string(), "<Alert: Wind at 1596733459>");

        let a = alert(json!({}));
        assert_eq!(a.to_string(), "<Alert: untitled>");
    }

    #[test]
    fn test_field_names() {
        let a = alert(json!({"title": "Wind", "severity": "minor", "time": 1}));
        let mut names: Vec<&str> = a.field_names().collect();
        names.sort_unstable();
        assert_eq!(names, ["severity", "time", "title"]);
        assert_eq!(alert(json!({})).field_names().count(), 0);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let a = alert(json!({"title": "Wind"}));
        assert_eq!(serde_json::to_value(&a).unwrap(), json!({"title": "Wind"}));
    }
}
