//! Dispatches tool invocations through the validate, format, execute
//! and report pipeline.

use std::fmt;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::executor::{Executor, ExecutorConfig};
use crate::registry::{Plan, RegistryError, ToolRegistry};
use crate::schema::ToolDescriptor;
use crate::validation::{ValidationError, validate};

/// A single request to run one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub tool_name: String,
    pub arguments: Map<String, Value>,
}

impl Invocation {
    pub fn new(tool_name: &str, arguments: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            arguments,
        }
    }
}

/// Errors surfaced before any command is executed.
///
/// Execution and parse failures never appear here: tools turn them
/// into their failure text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The requested tool is not registered.
    NotFound(String),
    /// An argument failed validation.
    Validation {
        tool: String,
        error: ValidationError,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NotFound(name) => write!(f, "Unknown tool '{}'", name),
            DispatchError::Validation { tool, error } => {
                write!(f, "Invalid arguments for '{}': {}", tool, error)
            }
        }
    }
}

impl std::error::Error for DispatchError {}

/// Runs invocations against a registry with a configured executor.
#[derive(Clone)]
pub struct Dispatcher {
    registry: ToolRegistry,
    executor: Executor,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, executor: Executor) -> Self {
        Self { registry, executor }
    }

    /// Dispatcher over the full catalog, running real processes unless simulating.
    pub fn standard(config: ExecutorConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(ToolRegistry::standard()?, Executor::new(config)))
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn describe(&self) -> Vec<&ToolDescriptor> {
        self.registry.describe()
    }

    /// Runs one invocation to completion and returns the report text.
    pub async fn invoke(&self, invocation: &Invocation) -> Result<String, DispatchError> {
        let tool_name = invocation.tool_name.as_str();
        debug!("Invoking tool '{}'", tool_name);

        let tool = self
            .registry
            .resolve(tool_name)
            .map_err(|_| DispatchError::NotFound(tool_name.to_string()))?;

        let validation_error = |error| DispatchError::Validation {
            tool: tool_name.to_string(),
            error,
        };
        let arguments =
            validate(tool.descriptor(), &invocation.arguments).map_err(validation_error)?;

        match tool.plan(&arguments).map_err(validation_error)? {
            Plan::Respond(text) => Ok(text),
            Plan::Run(command) => {
                let result = self
                    .executor
                    .execute(&command, tool.descriptor().effect)
                    .await;
                let report = tool.report(&arguments, &result);
                info!(
                    "Tool '{}' {}",
                    tool_name,
                    if result.succeeded { "succeeded" } else { "failed" }
                );
                Ok(report)
            }
        }
    }

    /// Shorthand for [`Dispatcher::invoke`] with a tool name and arguments.
    pub async fn call(
        &self,
        tool_name: &str,
        arguments: Map<String, Value>,
    ) -> Result<String, DispatchError> {
        self.invoke(&Invocation::new(tool_name, arguments)).await
    }
}
