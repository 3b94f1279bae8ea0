//! Active Directory group tools.

use crate::command::PowerShell;
use crate::executor::ExecutionResult;
use crate::registry::{Plan, RegisteredTool, RegistryError, ToolRegistry};
use crate::report::{Messages, failed_to};
use crate::schema::{Effect, ParameterSpec, ToolDescriptor};
use crate::validation::{Arguments, ValidationError};

pub const ADD_AD_GROUP_MEMBER: &str = "add_ad_group_member";
pub const REMOVE_AD_GROUP_MEMBER: &str = "remove_ad_group_member";
pub const NEW_AD_GROUP: &str = "new_ad_group";
pub const REMOVE_AD_GROUP: &str = "remove_ad_group";

/// Registers the group membership tools.
pub fn register_membership(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(RegisteredTool::new(
        membership_descriptor(
            ADD_AD_GROUP_MEMBER,
            "Add AD Group Member",
            "Adds a user, computer or group to an Active Directory group.",
            "Member to add to the group",
        ),
        plan_add_member,
        report_add_member,
    ))?;
    registry.register(RegisteredTool::new(
        membership_descriptor(
            REMOVE_AD_GROUP_MEMBER,
            "Remove AD Group Member",
            "Removes a user, computer or group from an Active Directory group.",
            "Member to remove from the group",
        ),
        plan_remove_member,
        report_remove_member,
    ))
}

/// Registers the group lifecycle tools.
pub fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            NEW_AD_GROUP,
            "New AD Group",
            "Creates a new Active Directory group.",
            Effect::Modifying,
        )
        .with_parameter(ParameterSpec::string("name", "Name of the new group").free_text())
        .with_parameter(ParameterSpec::enumeration(
            "group_scope",
            &["DomainLocal", "Global", "Universal"],
            "Scope of the group ('DomainLocal', 'Global' or 'Universal')",
        ))
        .with_parameter(
            ParameterSpec::enumeration(
                "group_category",
                &["Security", "Distribution"],
                "Category of the group ('Security' or 'Distribution')",
            )
            .with_default("Security"),
        ),
        plan_new_group,
        report_new_group,
    ))?;
    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            REMOVE_AD_GROUP,
            "Remove AD Group",
            "Deletes an Active Directory group.",
            Effect::Destructive,
        )
        .with_parameter(ParameterSpec::string("identity", "Name of the group to delete")),
        plan_remove_group,
        report_remove_group,
    ))
}

fn membership_descriptor(
    name: &str,
    title: &str,
    description: &str,
    member_description: &str,
) -> ToolDescriptor {
    let effect = if name == REMOVE_AD_GROUP_MEMBER {
        Effect::Destructive
    } else {
        Effect::Modifying
    };
    ToolDescriptor::new(name, title, description, effect)
        .idempotent()
        .with_parameter(ParameterSpec::string("identity", "Name of the group"))
        .with_parameter(ParameterSpec::string("member", member_description))
}

pub fn plan_add_member(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Add-ADGroupMember")
        .literal("Identity", args.text("identity")?)
        .literal("Members", args.text("member")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_add_member(args: &Arguments, result: &ExecutionResult) -> String {
    let group = args.display("identity");
    let member = args.display("member");
    Messages::new(
        format!("Added '{}' to group '{}'.", member, group),
        failed_to(&format!("add '{}' to group '{}'", member, group)),
    )
    .render(result)
}

pub fn plan_remove_member(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Remove-ADGroupMember")
        .literal("Identity", args.text("identity")?)
        .literal("Members", args.text("member")?)
        .switch("Confirm:$false")
        .into_command();
    Ok(Plan::Run(command))
}

fn report_remove_member(args: &Arguments, result: &ExecutionResult) -> String {
    let group = args.display("identity");
    let member = args.display("member");
    Messages::new(
        format!("Removed '{}' from group '{}'.", member, group),
        failed_to(&format!("remove '{}' from group '{}'", member, group)),
    )
    .render(result)
}

pub fn plan_new_group(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("New-ADGroup")
        .literal("Name", args.text("name")?)
        .token("GroupScope", args.text("group_scope")?)
        .token("GroupCategory", args.text("group_category")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_new_group(args: &Arguments, result: &ExecutionResult) -> String {
    let name = args.display("name");
    Messages::new(
        format!(
            "Group '{}' created successfully ({} {}).",
            name,
            args.display("group_scope"),
            args.display("group_category")
        ),
        failed_to(&format!("create group '{}'", name)),
    )
    .render(result)
}

pub fn plan_remove_group(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Remove-ADGroup")
        .literal("Identity", args.text("identity")?)
        .switch("Confirm:$false")
        .into_command();
    Ok(Plan::Run(command))
}

fn report_remove_group(args: &Arguments, result: &ExecutionResult) -> String {
    let name = args.display("identity");
    Messages::new(
        format!("Group '{}' removed successfully.", name),
        failed_to(&format!("remove group '{}'", name)),
    )
    .render(result)
}
