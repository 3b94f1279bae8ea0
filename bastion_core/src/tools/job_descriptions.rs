//! Job descriptions used as context when reviewing account access.

use crate::executor::ExecutionResult;
use crate::registry::{Plan, RegisteredTool, RegistryError, ToolRegistry};
use crate::schema::{Effect, ToolDescriptor};
use crate::validation::{Arguments, ValidationError};

pub const GET_JOB_DESCRIPTIONS: &str = "get_job_descriptions";

/// Job descriptions of the managed organization.
pub const JOB_DESCRIPTIONS: &str = include_str!("../../resources/job_descriptions.md");

pub fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            GET_JOB_DESCRIPTIONS,
            "Get Job Descriptions",
            "Returns the job descriptions of the organization's roles and accounts. \
             Use them to decide whether an account actually needs the access it holds.",
            Effect::ReadOnly,
        )
        .idempotent(),
        plan,
        report,
    ))
}

fn plan(_args: &Arguments) -> Result<Plan, ValidationError> {
    Ok(Plan::Respond(JOB_DESCRIPTIONS.to_string()))
}

fn report(_args: &Arguments, _result: &ExecutionResult) -> String {
    JOB_DESCRIPTIONS.to_string()
}
