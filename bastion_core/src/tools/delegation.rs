//! Kerberos constrained delegation tools.
//!
//! Delegation targets live in the `msDS-AllowedToDelegateTo` attribute of
//! user and computer accounts. Computer account names end with `$`.

use crate::command::PowerShell;
use crate::executor::ExecutionResult;
use crate::registry::{Plan, RegisteredTool, RegistryError, ToolRegistry};
use crate::report::{Messages, failed_to};
use crate::schema::{Effect, ParameterSpec, ToolDescriptor};
use crate::validation::{Arguments, ValidationError};

pub const LIST_CONSTRAINED_DELEGATION: &str = "list_constrained_delegation";
pub const REMOVE_CONSTRAINED_DELEGATION: &str = "remove_constrained_delegation";

const DELEGATION_ATTRIBUTE: &str = "msDS-AllowedToDelegateTo";

pub fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            LIST_CONSTRAINED_DELEGATION,
            "List Constrained Delegation",
            "Lists the services an Active Directory account is allowed to delegate to \
             (msDS-AllowedToDelegateTo).",
            Effect::ReadOnly,
        )
        .idempotent()
        .with_parameter(identity_parameter()),
        plan_list,
        report_list,
    ))?;
    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            REMOVE_CONSTRAINED_DELEGATION,
            "Remove Constrained Delegation",
            "Removes a service from the constrained delegation targets of an Active Directory account.",
            Effect::Destructive,
        )
        .idempotent()
        .with_parameter(identity_parameter())
        .with_parameter(ParameterSpec::string(
            "target",
            "Service principal name to remove (e.g. 'cifs/fileserver.corp.local')",
        )),
        plan_remove,
        report_remove,
    ))
}

fn identity_parameter() -> ParameterSpec {
    ParameterSpec::string(
        "identity",
        "SAM account name of the user or computer (computer names end with '$')",
    )
}

fn account_noun(identity: &str) -> &'static str {
    if identity.ends_with('$') {
        "ADComputer"
    } else {
        "ADUser"
    }
}

pub fn plan_list(args: &Arguments) -> Result<Plan, ValidationError> {
    let identity = args.text("identity")?;
    let command = PowerShell::cmdlet(&format!("Get-{}", account_noun(identity)))
        .literal("Identity", identity)
        .token("Properties", DELEGATION_ATTRIBUTE)
        .pipe("Select-Object")
        .token("ExpandProperty", DELEGATION_ATTRIBUTE)
        .into_command();
    Ok(Plan::Run(command))
}

/// Unlike the other tools, failures surface PowerShell's error text.
fn report_list(args: &Arguments, result: &ExecutionResult) -> String {
    let identity = args.display("identity");

    if !result.succeeded {
        let detail = result
            .error_detail
            .as_deref()
            .unwrap_or("no error output was produced");
        return format!(
            "Failed to list constrained delegation for '{}': {}",
            identity, detail
        );
    }

    let targets: Vec<&str> = result
        .raw_output
        .as_deref()
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if targets.is_empty() {
        format!(
            "No constrained delegation targets are configured for '{}'.",
            identity
        )
    } else {
        format!(
            "Constrained delegation targets for '{}':\n{}",
            identity,
            targets.join("\n")
        )
    }
}

pub fn plan_remove(args: &Arguments) -> Result<Plan, ValidationError> {
    let identity = args.text("identity")?;
    let command = PowerShell::cmdlet(&format!("Set-{}", account_noun(identity)))
        .literal("Identity", identity)
        .hashtable("Remove", DELEGATION_ATTRIBUTE, args.text("target")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_remove(args: &Arguments, result: &ExecutionResult) -> String {
    let identity = args.display("identity");
    let target = args.display("target");
    Messages::new(
        format!(
            "Removed constrained delegation to '{}' from '{}'.",
            target, identity
        ),
        failed_to(&format!(
            "remove constrained delegation to '{}' from '{}'",
            target, identity
        )),
    )
    .render(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_noun() {
        assert_eq!(account_noun("WEB01$"), "ADComputer");
        assert_eq!(account_noun("svc_sql"), "ADUser");
    }
}
