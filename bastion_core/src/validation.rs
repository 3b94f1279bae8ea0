//! Validates supplied tool arguments against a tool's declared parameters.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde_json::{Map, Value};

use crate::schema::{ArgValue, ParameterKind, ParameterSpec, TextRule, ToolDescriptor};

/// Why a single argument was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    Missing,
    Unknown,
    WrongKind { expected: ParameterKind },
    OutOfRange { min: i64, max: i64 },
    NotAllowed { value: String, allowed: Vec<String> },
    Empty,
    ForbiddenCharacter(char),
}

/// A rejected argument, naming the offending parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub parameter: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(parameter: &str, reason: ValidationReason) -> Self {
        Self {
            parameter: parameter.to_string(),
            reason,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            ValidationReason::Missing => {
                write!(f, "Missing required parameter '{}'", self.parameter)
            }
            ValidationReason::Unknown => write!(f, "Unknown parameter '{}'", self.parameter),
            ValidationReason::WrongKind { expected } => write!(
                f,
                "Parameter '{}' must be of type {}",
                self.parameter, expected
            ),
            ValidationReason::OutOfRange { min, max } => write!(
                f,
                "Parameter '{}' must be between {} and {}",
                self.parameter, min, max
            ),
            ValidationReason::NotAllowed { value, allowed } => write!(
                f,
                "Parameter '{}' does not accept '{}'. Allowed values: {}",
                self.parameter,
                value,
                allowed.join(", ")
            ),
            ValidationReason::Empty => {
                write!(f, "Parameter '{}' must not be empty", self.parameter)
            }
            ValidationReason::ForbiddenCharacter(c) => write!(
                f,
                "Parameter '{}' contains a forbidden character {:?}",
                self.parameter, c
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Fully populated, validated arguments of one invocation.
///
/// Every declared parameter is present: omitted optional parameters
/// carry their default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: BTreeMap<String, ArgValue>,
}

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Result<&str, ValidationError> {
        match self.values.get(name) {
            Some(ArgValue::Text(text)) => Ok(text),
            Some(_) => Err(ValidationError::new(
                name,
                ValidationReason::WrongKind {
                    expected: ParameterKind::String,
                },
            )),
            None => Err(ValidationError::new(name, ValidationReason::Missing)),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64, ValidationError> {
        match self.values.get(name) {
            Some(ArgValue::Integer(number)) => Ok(*number),
            Some(_) => Err(ValidationError::new(
                name,
                ValidationReason::WrongKind {
                    expected: ParameterKind::Integer,
                },
            )),
            None => Err(ValidationError::new(name, ValidationReason::Missing)),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool, ValidationError> {
        match self.values.get(name) {
            Some(ArgValue::Boolean(flag)) => Ok(*flag),
            Some(_) => Err(ValidationError::new(
                name,
                ValidationReason::WrongKind {
                    expected: ParameterKind::Boolean,
                },
            )),
            None => Err(ValidationError::new(name, ValidationReason::Missing)),
        }
    }

    /// Text of an argument for use in report messages, empty if absent.
    pub fn display(&self, name: &str) -> String {
        self.values
            .get(name)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Validates supplied arguments against a tool descriptor.
///
/// Returns the first violation found. Unknown names are reported before
/// anything else, then parameters are checked in declaration order.
pub fn validate(
    descriptor: &ToolDescriptor,
    supplied: &Map<String, Value>,
) -> Result<Arguments, ValidationError> {
    debug!(
        "Validating {} argument(s) for tool '{}'",
        supplied.len(),
        descriptor.name
    );

    if let Some(unknown) = supplied
        .keys()
        .find(|name| descriptor.parameter(name).is_none())
    {
        return Err(ValidationError::new(unknown, ValidationReason::Unknown));
    }

    let mut values = BTreeMap::new();
    for spec in &descriptor.parameters {
        let value = match supplied.get(&spec.name) {
            Some(Value::Null) | None => match &spec.default {
                Some(default) if !spec.required => default.clone(),
                _ => {
                    return Err(ValidationError::new(
                        &spec.name,
                        ValidationReason::Missing,
                    ));
                }
            },
            Some(value) => {
                coerce(spec, value).map_err(|reason| ValidationError::new(&spec.name, reason))?
            }
        };
        values.insert(spec.name.clone(), value);
    }

    Ok(Arguments { values })
}

/// Converts one JSON value into an argument of the declared kind.
fn coerce(spec: &ParameterSpec, value: &Value) -> Result<ArgValue, ValidationReason> {
    let wrong_kind = || ValidationReason::WrongKind {
        expected: spec.kind,
    };

    match spec.kind {
        ParameterKind::String => {
            let text = value.as_str().ok_or_else(wrong_kind)?;
            check_text(spec.text_rule, text)?;
            Ok(ArgValue::Text(text.to_string()))
        }
        ParameterKind::Enum => {
            let text = value.as_str().ok_or_else(wrong_kind)?;
            if spec.allowed_values.iter().any(|allowed| allowed == text) {
                Ok(ArgValue::Text(text.to_string()))
            } else {
                Err(ValidationReason::NotAllowed {
                    value: text.to_string(),
                    allowed: spec.allowed_values.clone(),
                })
            }
        }
        ParameterKind::Integer => {
            let number = match value {
                Value::Number(number) => number.as_i64(),
                Value::String(text) => text.trim().parse::<i64>().ok(),
                _ => None,
            }
            .ok_or_else(wrong_kind)?;

            match spec.range {
                Some((min, max)) if number < min || number > max => {
                    Err(ValidationReason::OutOfRange { min, max })
                }
                _ => Ok(ArgValue::Integer(number)),
            }
        }
        ParameterKind::Boolean => match value {
            Value::Bool(flag) => Ok(ArgValue::Boolean(*flag)),
            Value::String(text) if text == "true" => Ok(ArgValue::Boolean(true)),
            Value::String(text) if text == "false" => Ok(ArgValue::Boolean(false)),
            _ => Err(wrong_kind()),
        },
    }
}

fn check_text(rule: TextRule, text: &str) -> Result<(), ValidationReason> {
    if let Some(c) = text.chars().find(|c| c.is_control()) {
        return Err(ValidationReason::ForbiddenCharacter(c));
    }

    match rule {
        TextRule::Free => Ok(()),
        TextRule::Identity => {
            if text.trim().is_empty() {
                return Err(ValidationReason::Empty);
            }
            match text.chars().find(|c| !is_identity_char(*c)) {
                Some(c) => Err(ValidationReason::ForbiddenCharacter(c)),
                None => Ok(()),
            }
        }
    }
}

fn is_identity_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(
            c,
            ' ' | '-' | '_' | '.' | '@' | '$' | '\\' | '/' | '=' | ',' | ':'
        )
}
