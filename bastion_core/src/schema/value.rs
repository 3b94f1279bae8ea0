use std::fmt;

use serde::Serialize;

use super::ParameterKind;

/// A validated argument value.
///
/// Enum arguments are carried as text; their membership is checked
/// against the parameter's allowed values during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl ArgValue {
    /// Checks whether this value can stand for a parameter of the given kind.
    pub fn fits(&self, kind: ParameterKind) -> bool {
        matches!(
            (self, kind),
            (ArgValue::Text(_), ParameterKind::String)
                | (ArgValue::Text(_), ParameterKind::Enum)
                | (ArgValue::Integer(_), ParameterKind::Integer)
                | (ArgValue::Boolean(_), ParameterKind::Boolean)
        )
    }

    /// Converts the value into its JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ArgValue::Text(text) => serde_json::Value::String(text.clone()),
            ArgValue::Integer(number) => serde_json::Value::from(*number),
            ArgValue::Boolean(flag) => serde_json::Value::Bool(*flag),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(text) => write!(f, "{}", text),
            ArgValue::Integer(number) => write!(f, "{}", number),
            ArgValue::Boolean(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        ArgValue::Integer(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        ArgValue::Boolean(value)
    }
}
