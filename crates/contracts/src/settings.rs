//! Camera settings: closed tagged-variant values and their properties
//!
//! Settings follow the GenICam SFNC naming scheme. The value is a closed
//! enum; an unrecognized tag from the service is a hard error, never a guess.

use serde::{Deserialize, Serialize};

/// A named camera setting with its current (or desired) value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSetting {
    /// Setting name (SFNC), e.g. "ExposureTime"
    pub name: String,

    /// Current or desired value
    pub value: SettingValue,
}

/// Closed tagged value of a camera setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Enumeration(String),
    /// Command settings carry no value; updating one triggers execution
    Command,
}

impl SettingValue {
    /// Tag name, used in type-mismatch error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Bool(_) => "bool",
            Self::String(_) => "string",
            Self::Enumeration(_) => "enumeration",
            Self::Command => "command",
        }
    }
}

/// Properties of a setting, reported by the service.
///
/// Vendors implement these optionally; absent bounds stay `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingProperties {
    Integer {
        min: Option<i64>,
        max: Option<i64>,
        step: Option<i64>,
    },
    Float {
        min: Option<f64>,
        max: Option<f64>,
    },
    Enumeration {
        values: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(SettingValue::Integer(1).kind(), "integer");
        assert_eq!(SettingValue::Float(0.5).kind(), "float");
        assert_eq!(SettingValue::Command.kind(), "command");
    }

    #[test]
    fn test_serde_tagging() {
        let setting = CameraSetting {
            name: "ExposureTime".to_string(),
            value: SettingValue::Float(8000.0),
        };
        let json = serde_json::to_string(&setting).unwrap();
        let parsed: CameraSetting = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, setting);
    }
}
