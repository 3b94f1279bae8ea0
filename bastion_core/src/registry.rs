//! The registry of available tools.

use std::fmt;

use log::debug;

use crate::command::CommandLine;
use crate::executor::ExecutionResult;
use crate::schema::ToolDescriptor;
use crate::validation::{Arguments, ValidationError};

/// What a tool wants done for a validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Execute the command, then report on its outcome.
    Run(CommandLine),
    /// Answer directly, without touching the system.
    Respond(String),
}

/// Formats validated arguments into a plan.
pub type PlanFn = fn(&Arguments) -> Result<Plan, ValidationError>;

/// Converts an execution outcome into the caller-facing text.
pub type ReportFn = fn(&Arguments, &ExecutionResult) -> String;

/// A tool: its declared schema plus the functions that serve it.
#[derive(Debug, Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    plan: PlanFn,
    report: ReportFn,
}

impl RegisteredTool {
    pub fn new(descriptor: ToolDescriptor, plan: PlanFn, report: ReportFn) -> Self {
        Self {
            descriptor,
            plan,
            report,
        }
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn plan(&self, arguments: &Arguments) -> Result<Plan, ValidationError> {
        (self.plan)(arguments)
    }

    pub fn report(&self, arguments: &Arguments, result: &ExecutionResult) -> String {
        (self.report)(arguments, result)
    }
}

/// Errors from building or querying the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with this name is already registered.
    DuplicateTool(String),
    /// A parameter declaration breaks its own invariants.
    InvalidParameter {
        tool: String,
        parameter: String,
        reason: String,
    },
    /// No tool with this name is registered.
    NotFound(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateTool(name) => {
                write!(f, "Tool '{}' is registered more than once", name)
            }
            RegistryError::InvalidParameter {
                tool,
                parameter,
                reason,
            } => write!(
                f,
                "Tool '{}' declares an invalid parameter '{}': {}",
                tool, parameter, reason
            ),
            RegistryError::NotFound(name) => write!(f, "Tool '{}' not found", name),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Tools in registration order, fixed once built.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry with the full administration catalog.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        crate::tools::register_all(&mut registry)?;
        debug!("Registered {} tools", registry.len());
        Ok(registry)
    }

    /// Adds a tool after checking its declaration.
    pub fn register(&mut self, tool: RegisteredTool) -> Result<(), RegistryError> {
        if self.tools.iter().any(|t| t.name() == tool.name()) {
            return Err(RegistryError::DuplicateTool(tool.name().to_string()));
        }

        let descriptor = tool.descriptor();
        for (index, parameter) in descriptor.parameters.iter().enumerate() {
            let invalid = |reason: String| RegistryError::InvalidParameter {
                tool: descriptor.name.clone(),
                parameter: parameter.name.clone(),
                reason,
            };
            parameter.check().map_err(invalid)?;
            if descriptor.parameters[..index]
                .iter()
                .any(|p| p.name == parameter.name)
            {
                return Err(invalid("declared more than once".to_string()));
            }
        }

        debug!("Registering tool: {}", tool.name());
        self.tools.push(tool);
        Ok(())
    }

    /// Looks up a tool by name.
    pub fn resolve(&self, name: &str) -> Result<&RegisteredTool, RegistryError> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// Descriptors of every tool, in registration order.
    pub fn describe(&self) -> Vec<&ToolDescriptor> {
        self.tools.iter().map(RegisteredTool::descriptor).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
