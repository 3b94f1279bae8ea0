//! Declared schemas for tools and their parameters.

mod value;

use std::fmt;

use serde::Serialize;

pub use value::ArgValue;

/// The kinds of values a tool parameter can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    String,
    Integer,
    Boolean,
    Enum,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::String => "string",
            ParameterKind::Integer => "integer",
            ParameterKind::Boolean => "boolean",
            ParameterKind::Enum => "enum",
        };
        write!(f, "{}", name)
    }
}

/// Character rules applied to string parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextRule {
    /// Names of directory objects and firewall rules. Non-empty, restricted
    /// to letters, digits, spaces and `- _ . @ $ \ / = , :`.
    Identity,
    /// Any text without control characters (display names, passwords).
    Free,
}

/// What a tool does to the system it manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    ReadOnly,
    Modifying,
    Destructive,
}

/// Declared schema of a single tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<ArgValue>,
    pub description: String,
    #[serde(skip)]
    pub text_rule: TextRule,
    #[serde(skip)]
    pub secret: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(i64, i64)>,
}

impl ParameterSpec {
    fn new(name: &str, kind: ParameterKind, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            allowed_values: Vec::new(),
            required: true,
            default: None,
            description: description.to_string(),
            text_rule: TextRule::Identity,
            secret: false,
            range: None,
        }
    }

    /// A required string parameter holding an identity-like name.
    pub fn string(name: &str, description: &str) -> Self {
        Self::new(name, ParameterKind::String, description)
    }

    /// A required integer parameter.
    pub fn integer(name: &str, description: &str) -> Self {
        Self::new(name, ParameterKind::Integer, description)
    }

    /// A required boolean parameter.
    pub fn boolean(name: &str, description: &str) -> Self {
        Self::new(name, ParameterKind::Boolean, description)
    }

    /// A required parameter restricted to a fixed set of literal values.
    pub fn enumeration(name: &str, allowed_values: &[&str], description: &str) -> Self {
        let mut spec = Self::new(name, ParameterKind::Enum, description);
        spec.allowed_values = allowed_values.iter().map(|v| v.to_string()).collect();
        spec
    }

    /// Relaxes the text rule to accept any text without control characters.
    pub fn free_text(mut self) -> Self {
        self.text_rule = TextRule::Free;
        self
    }

    /// Marks the parameter as secret so it is redacted from logged commands.
    pub fn secret(mut self) -> Self {
        self.text_rule = TextRule::Free;
        self.secret = true;
        self
    }

    /// Restricts an integer parameter to an inclusive range.
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.range = Some((min, max));
        self
    }

    /// Makes the parameter optional with the given default.
    pub fn with_default(mut self, default: impl Into<ArgValue>) -> Self {
        self.required = false;
        self.default = Some(default.into());
        self
    }

    /// Checks the invariants of the declaration itself.
    ///
    /// Enum parameters need at least one allowed value, and optional
    /// parameters need a default that fits their kind (and, for enums,
    /// is one of the allowed values).
    pub fn check(&self) -> Result<(), String> {
        if self.kind == ParameterKind::Enum && self.allowed_values.is_empty() {
            return Err("enum parameter declares no allowed values".to_string());
        }

        if let Some((min, max)) = self.range {
            if min > max {
                return Err(format!("range {}..={} is empty", min, max));
            }
        }

        match (&self.default, self.required) {
            (None, false) => Err("optional parameter has no default".to_string()),
            (Some(_), true) => Err("required parameter declares a default".to_string()),
            (Some(default), false) if !default.fits(self.kind) => Err(format!(
                "default '{}' does not fit kind {}",
                default, self.kind
            )),
            (Some(ArgValue::Text(default)), false)
                if self.kind == ParameterKind::Enum && !self.allowed_values.contains(default) =>
            {
                Err(format!("default '{}' is not an allowed value", default))
            }
            _ => Ok(()),
        }
    }
}

/// Declared schema of a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub title: String,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
    pub effect: Effect,
    pub idempotent: bool,
}

impl ToolDescriptor {
    pub fn new(name: &str, title: &str, description: &str, effect: Effect) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            parameters: Vec::new(),
            effect,
            idempotent: false,
        }
    }

    /// Appends a parameter, keeping declaration order.
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Marks the tool as safe to repeat with the same arguments.
    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn is_read_only(&self) -> bool {
        self.effect == Effect::ReadOnly
    }
}
