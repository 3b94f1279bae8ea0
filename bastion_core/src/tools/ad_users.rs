//! Active Directory user and account tools.

use crate::command::PowerShell;
use crate::executor::ExecutionResult;
use crate::registry::{Plan, PlanFn, RegisteredTool, RegistryError, ReportFn, ToolRegistry};
use crate::report::{Messages, failed_to};
use crate::schema::{Effect, ParameterSpec, ToolDescriptor};
use crate::validation::{Arguments, ValidationError};

pub const NEW_AD_USER: &str = "new_ad_user";
pub const REMOVE_AD_USER: &str = "remove_ad_user";
pub const DISABLE_AD_ACCOUNT: &str = "disable_ad_account";
pub const ENABLE_AD_ACCOUNT: &str = "enable_ad_account";
pub const SET_AD_ACCOUNT_PASSWORD: &str = "set_ad_account_password";

pub fn register(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            NEW_AD_USER,
            "New AD User",
            "Creates a new Active Directory user account.",
            Effect::Modifying,
        )
        .with_parameter(ParameterSpec::string("name", "Full name of the user").free_text())
        .with_parameter(ParameterSpec::string(
            "sam_account_name",
            "Logon name (sAMAccountName) of the user",
        ))
        .with_parameter(ParameterSpec::string("password", "Initial password for the account").secret())
        .with_parameter(
            ParameterSpec::boolean("enabled", "Whether the account is enabled after creation")
                .with_default(true),
        ),
        plan_new_user,
        report_new_user,
    ))?;

    account_tool(
        registry,
        REMOVE_AD_USER,
        "Remove AD User",
        "Deletes an Active Directory user account.",
        Effect::Destructive,
        plan_remove_user,
        report_remove_user,
    )?;
    account_tool(
        registry,
        DISABLE_AD_ACCOUNT,
        "Disable AD Account",
        "Disables an Active Directory account so it can no longer sign in.",
        Effect::Modifying,
        plan_disable_account,
        report_disable_account,
    )?;
    account_tool(
        registry,
        ENABLE_AD_ACCOUNT,
        "Enable AD Account",
        "Enables a disabled Active Directory account.",
        Effect::Modifying,
        plan_enable_account,
        report_enable_account,
    )?;

    registry.register(RegisteredTool::new(
        ToolDescriptor::new(
            SET_AD_ACCOUNT_PASSWORD,
            "Set AD Account Password",
            "Resets the password of an Active Directory account.",
            Effect::Modifying,
        )
        .with_parameter(identity_parameter())
        .with_parameter(ParameterSpec::string("new_password", "New password for the account").secret()),
        plan_set_password,
        report_set_password,
    ))
}

fn identity_parameter() -> ParameterSpec {
    ParameterSpec::string(
        "identity",
        "SAM account name, distinguished name or SID of the account",
    )
}

/// Registers a tool whose only parameter is the account identity.
fn account_tool(
    registry: &mut ToolRegistry,
    name: &str,
    title: &str,
    description: &str,
    effect: Effect,
    plan: PlanFn,
    report: ReportFn,
) -> Result<(), RegistryError> {
    let mut descriptor =
        ToolDescriptor::new(name, title, description, effect).with_parameter(identity_parameter());
    if effect != Effect::Destructive {
        descriptor = descriptor.idempotent();
    }
    registry.register(RegisteredTool::new(descriptor, plan, report))
}

pub fn plan_new_user(args: &Arguments) -> Result<Plan, ValidationError> {
    let enabled = if args.boolean("enabled")? { "$true" } else { "$false" };
    let command = PowerShell::cmdlet("New-ADUser")
        .literal("Name", args.text("name")?)
        .literal("SamAccountName", args.text("sam_account_name")?)
        .secure_string("AccountPassword", args.text("password")?)
        .token("Enabled", enabled)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_new_user(args: &Arguments, result: &ExecutionResult) -> String {
    let sam = args.display("sam_account_name");
    Messages::new(
        format!(
            "User '{}' ({}) created successfully.",
            args.display("name"),
            sam
        ),
        failed_to(&format!("create user '{}'", sam)),
    )
    .render(result)
}

pub fn plan_remove_user(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Remove-ADUser")
        .literal("Identity", args.text("identity")?)
        .switch("Confirm:$false")
        .into_command();
    Ok(Plan::Run(command))
}

fn report_remove_user(args: &Arguments, result: &ExecutionResult) -> String {
    let identity = args.display("identity");
    Messages::new(
        format!("User '{}' removed successfully.", identity),
        failed_to(&format!("remove user '{}'", identity)),
    )
    .render(result)
}

pub fn plan_disable_account(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Disable-ADAccount")
        .literal("Identity", args.text("identity")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_disable_account(args: &Arguments, result: &ExecutionResult) -> String {
    let identity = args.display("identity");
    Messages::new(
        format!("Account '{}' disabled successfully.", identity),
        failed_to(&format!("disable account '{}'", identity)),
    )
    .render(result)
}

pub fn plan_enable_account(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Enable-ADAccount")
        .literal("Identity", args.text("identity")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_enable_account(args: &Arguments, result: &ExecutionResult) -> String {
    let identity = args.display("identity");
    Messages::new(
        format!("Account '{}' enabled successfully.", identity),
        failed_to(&format!("enable account '{}'", identity)),
    )
    .render(result)
}

pub fn plan_set_password(args: &Arguments) -> Result<Plan, ValidationError> {
    let command = PowerShell::cmdlet("Set-ADAccountPassword")
        .literal("Identity", args.text("identity")?)
        .switch("Reset")
        .secure_string("NewPassword", args.text("new_password")?)
        .into_command();
    Ok(Plan::Run(command))
}

fn report_set_password(args: &Arguments, result: &ExecutionResult) -> String {
    let identity = args.display("identity");
    Messages::new(
        format!("Password for '{}' was reset successfully.", identity),
        failed_to(&format!("reset the password for '{}'", identity)),
    )
    .render(result)
}
