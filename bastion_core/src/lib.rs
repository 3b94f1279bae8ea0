//! Core of Bastion: Windows administration tools for AI assistants.
//!
//! A tool call flows through a fixed pipeline:
//! registry lookup, argument validation, command formatting,
//! execution (real or simulated) and finally a human-readable report.

pub mod command;
pub mod dispatch;
pub mod executor;
pub mod firewall_rules;
pub mod registry;
pub mod report;
pub mod schema;
pub mod tools;
pub mod validation;

pub use command::{CommandLine, PowerShell};
pub use dispatch::{DispatchError, Dispatcher, Invocation};
pub use executor::{CommandRunner, ExecutionResult, Executor, ExecutorConfig, ProcessOutput};
pub use registry::{Plan, RegisteredTool, RegistryError, ToolRegistry};
pub use schema::{ArgValue, Effect, ParameterKind, ParameterSpec, TextRule, ToolDescriptor};
pub use validation::{Arguments, ValidationError, ValidationReason, validate};
