//! Windows Firewall tools.

use log::warn;

use crate::command::{CommandLine, PowerShell};
use crate::executor::ExecutionResult;
use crate::firewall_rules::inbound_allow_rules_json;
use crate::registry::{Plan, RegisteredTool, RegistryError, ToolRegistry};
use crate::report::{Messages, failed_to};
use crate::schema::{Effect, ParameterSpec, ToolDescriptor};
use crate::validation::{Arguments, ValidationError};

pub const CREATE_FIREWALL_RULE: &str = "create_firewall_rule";
pub const DISABLE_FIREWALL_RULE: &str = "disable_firewall_rule";
pub const LIST_INBOUND_FIREWALL_RULES: &str = "list_inbound_firewall_rules";

/// Returned whenever the inbound rules cannot be listed.
pub const LIST_FAILURE: &str = "Failed to list inbound firewall rules. Please try again later.";

pub fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(RegisteredTool::new(
        create_rule_descriptor(),
        plan_create_rule,
        report_create_rule,
    ))?;
    registry.register(RegisteredTool::new(
        disable_rule_descriptor(),
        plan_disable_rule,
        report_disable_rule,
    ))?;
    registry.register(RegisteredTool::new(
        list_rules_descriptor(),
        plan_list_rules,
        report_list_rules,
    ))
}

fn create_rule_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        CREATE_FIREWALL_RULE,
        "Create Firewall Rule",
        "Creates and enables a firewall rule with the specified parameters.",
        Effect::Modifying,
    )
    .with_parameter(ParameterSpec::string("rule_name", "Name of the firewall rule"))
    .with_parameter(ParameterSpec::string("display_name", "Display name for the rule").free_text())
    .with_parameter(ParameterSpec::enumeration(
        "action",
        &["Allow", "Deny"],
        "Action for the rule ('Allow' or 'Deny')",
    ))
    .with_parameter(ParameterSpec::integer("local_port", "Local port number").with_range(1, 65535))
    .with_parameter(ParameterSpec::enumeration(
        "protocol",
        &["TCP", "UDP"],
        "Protocol for the rule ('TCP' or 'UDP')",
    ))
    .with_parameter(ParameterSpec::enumeration(
        "direction",
        &["Inbound", "Outbound"],
        "Direction of the rule ('Inbound' or 'Outbound')",
    ))
}

/// `Deny` is what callers say; `New-NetFirewallRule` calls it `Block`.
fn netsecurity_action(action: &str) -> &str {
    match action {
        "Deny" => "Block",
        other => other,
    }
}

pub fn plan_create_rule(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("New-NetFirewallRule")
        .literal("Name", args.text("rule_name")?)
        .literal("DisplayName", args.text("display_name")?)
        .token("Action", netsecurity_action(args.text("action")?))
        .token("LocalPort", args.integer("local_port")?)
        .token("Protocol", args.text("protocol")?)
        .token("Direction", args.text("direction")?)
        .token("Enabled", "True")
        .into_command();
    Ok(Plan::Run(command))
}

fn report_create_rule(args: &Arguments, result: &ExecutionResult) -> String {
    let name = args.display("rule_name");
    Messages::new(
        format!("Firewall rule '{}' created successfully.", name),
        failed_to(&format!("create firewall rule '{}'", name)),
    )
    .render(result)
}

fn disable_rule_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        DISABLE_FIREWALL_RULE,
        "Disable Firewall Rule",
        "Disables an existing firewall rule without deleting it.",
        Effect::Modifying,
    )
    .idempotent()
    .with_parameter(ParameterSpec::string(
        "rule_name",
        "Name of the firewall rule to disable",
    ))
}

pub fn plan_disable_rule(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Disable-NetFirewallRule")
        .literal("Name", args.text("rule_name")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_disable_rule(args: &Arguments, result: &ExecutionResult) -> String {
    let name = args.display("rule_name");
    Messages::new(
        format!("Firewall rule '{}' disabled successfully.", name),
        failed_to(&format!("disable firewall rule '{}'", name)),
    )
    .render(result)
}

fn list_rules_descriptor() -> ToolDescriptor {
    ToolDescriptor::new(
        LIST_INBOUND_FIREWALL_RULES,
        "List Inbound Firewall Rules",
        "Lists enabled inbound firewall rules that allow traffic, excluding built-in system rules. \
         Returns a JSON array of objects with 'Rule Name', 'Grouping', 'LocalPort' and 'Protocol'.",
        Effect::ReadOnly,
    )
    .idempotent()
}

pub fn plan_list_rules(_args: &Arguments) -> Result<Plan, ValidationError> {
    Ok(Plan::Run(CommandLine::new(
        "netsh",
        ["advfirewall", "firewall", "show", "rule", "name=all", "dir=in"],
    )))
}

fn report_list_rules(_args: &Arguments, result: &ExecutionResult) -> String {
    if !result.succeeded {
        warn!(
            "Listing firewall rules failed: {}",
            result.error_detail.as_deref().unwrap_or("unknown error")
        );
        return LIST_FAILURE.to_string();
    }

    let output = result.raw_output.as_deref().unwrap_or_default();
    match inbound_allow_rules_json(output) {
        Ok(json) => json,
        Err(e) => {
            warn!("Could not parse firewall rules: {}", e);
            LIST_FAILURE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_maps_to_block() {
        assert_eq!(netsecurity_action("Deny"), "Block");
        assert_eq!(netsecurity_action("Allow"), "Allow");
    }

    #[test]
    fn test_list_failure_is_fixed_text() {
        let text = report_list_rules(&Arguments::default(), &ExecutionResult::failure("boom"));
        assert_eq!(text, LIST_FAILURE);
    }

    #[test]
    fn test_list_malformed_output_fails_soft() {
        let result = ExecutionResult::success(Some("Enabled: Yes\nDirection: In\n".to_string()));
        assert_eq!(report_list_rules(&Arguments::default(), &result), LIST_FAILURE);
    }
}
