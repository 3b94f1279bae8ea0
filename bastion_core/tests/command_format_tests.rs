mod helpers;

use bastion_core::command::REDACTED;
use helpers::{RecordingRunner, args, live_dispatcher};
use serde_json::{Value, json};

/// Runs one tool against a recording runner and returns its PowerShell script.
async fn script_for(tool: &str, arguments: Value) -> String {
    let runner = RecordingRunner::succeeding("");
    let dispatcher = live_dispatcher(runner.clone());
    dispatcher.call(tool, args(arguments)).await.unwrap();
    runner.only_script()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_firewall_rule_command() {
        let script = script_for(
            "create_firewall_rule",
            json!({
                "rule_name": "WebHTTPS",
                "display_name": "Web HTTPS",
                "action": "Allow",
                "local_port": 443,
                "protocol": "TCP",
                "direction": "Inbound"
            }),
        )
        .await;

        assert_eq!(
            script,
            "New-NetFirewallRule -Name 'WebHTTPS' -DisplayName 'Web HTTPS' -Action Allow \
             -LocalPort 443 -Protocol TCP -Direction Inbound -Enabled True"
        );
    }

    #[tokio::test]
    async fn test_create_firewall_rule_deny_blocks() {
        let script = script_for(
            "create_firewall_rule",
            json!({
                "rule_name": "NoTelnet",
                "display_name": "No Telnet",
                "action": "Deny",
                "local_port": "23",
                "protocol": "TCP",
                "direction": "Inbound"
            }),
        )
        .await;

        assert!(script.contains("-Action Block"));
        assert!(script.contains("-LocalPort 23"));
    }

    #[tokio::test]
    async fn test_display_name_quotes_are_escaped() {
        let script = script_for(
            "create_firewall_rule",
            json!({
                "rule_name": "Evil",
                "display_name": "x'; Remove-Item C:\\ -Recurse; '",
                "action": "Allow",
                "local_port": 80,
                "protocol": "TCP",
                "direction": "Inbound"
            }),
        )
        .await;

        assert!(script.contains("-DisplayName 'x''; Remove-Item C:\\ -Recurse; '''"));
    }

    #[tokio::test]
    async fn test_disable_firewall_rule_command() {
        let script = script_for("disable_firewall_rule", json!({"rule_name": "WebHTTPS"})).await;
        assert_eq!(script, "Disable-NetFirewallRule -Name 'WebHTTPS'");
    }

    #[tokio::test]
    async fn test_list_inbound_firewall_rules_command() {
        let runner = RecordingRunner::succeeding("");
        let dispatcher = live_dispatcher(runner.clone());
        dispatcher
            .call("list_inbound_firewall_rules", args(json!({})))
            .await
            .unwrap();

        let commands = runner.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].program(), "netsh");
        assert_eq!(
            commands[0].args(),
            &["advfirewall", "firewall", "show", "rule", "name=all", "dir=in"]
        );
    }

    #[tokio::test]
    async fn test_delegation_commands_pick_account_type() {
        let user = script_for("list_constrained_delegation", json!({"identity": "svc_web"})).await;
        assert_eq!(
            user,
            "Get-ADUser -Identity 'svc_web' -Properties msDS-AllowedToDelegateTo \
             | Select-Object -ExpandProperty msDS-AllowedToDelegateTo"
        );

        let computer = script_for(
            "remove_constrained_delegation",
            json!({"identity": "WEB01$", "target": "cifs/dc01.corp.local"}),
        )
        .await;
        assert_eq!(
            computer,
            "Set-ADComputer -Identity 'WEB01$' -Remove @{'msDS-AllowedToDelegateTo'='cifs/dc01.corp.local'}"
        );
    }

    #[tokio::test]
    async fn test_group_membership_commands() {
        let add = script_for(
            "add_ad_group_member",
            json!({"identity": "Finance", "member": "sarah.johnson"}),
        )
        .await;
        assert_eq!(add, "Add-ADGroupMember -Identity 'Finance' -Members 'sarah.johnson'");

        let remove = script_for(
            "remove_ad_group_member",
            json!({"identity": "Domain Admins", "member": "alex.taylor"}),
        )
        .await;
        assert_eq!(
            remove,
            "Remove-ADGroupMember -Identity 'Domain Admins' -Members 'alex.taylor' -Confirm:$false"
        );
    }

    #[tokio::test]
    async fn test_new_ad_user_command() {
        let script = script_for(
            "new_ad_user",
            json!({
                "name": "Jane Roe",
                "sam_account_name": "jane.roe",
                "password": "P@ss'w0rd!",
                "enabled": false
            }),
        )
        .await;

        assert_eq!(
            script,
            "New-ADUser -Name 'Jane Roe' -SamAccountName 'jane.roe' \
             -AccountPassword (ConvertTo-SecureString 'P@ss''w0rd!' -AsPlainText -Force) -Enabled $false"
        );
    }

    #[tokio::test]
    async fn test_personal_and_group_names_keep_punctuation() {
        let user = script_for(
            "new_ad_user",
            json!({"name": "Mary O'Brien", "sam_account_name": "mobrien", "password": "x"}),
        )
        .await;
        assert!(user.starts_with("New-ADUser -Name 'Mary O''Brien' -SamAccountName 'mobrien'"));

        let group = script_for("new_ad_group", json!({"name": "R&D", "group_scope": "Global"})).await;
        assert_eq!(
            group,
            "New-ADGroup -Name 'R&D' -GroupScope Global -GroupCategory Security"
        );
    }

    #[tokio::test]
    async fn test_new_ad_user_password_is_redacted_from_display() {
        let runner = RecordingRunner::succeeding("");
        let dispatcher = live_dispatcher(runner.clone());
        dispatcher
            .call(
                "new_ad_user",
                args(json!({"name": "Jane Roe", "sam_account_name": "jane.roe", "password": "hunter2"})),
            )
            .await
            .unwrap();

        let command = &runner.commands()[0];
        assert!(!command.display().contains("hunter2"));
        assert!(command.display().contains(REDACTED));
        assert!(command.display().contains("-Enabled $true"));
    }

    #[tokio::test]
    async fn test_account_commands() {
        assert_eq!(
            script_for("remove_ad_user", json!({"identity": "alex.taylor"})).await,
            "Remove-ADUser -Identity 'alex.taylor' -Confirm:$false"
        );
        assert_eq!(
            script_for("disable_ad_account", json!({"identity": "alex.taylor"})).await,
            "Disable-ADAccount -Identity 'alex.taylor'"
        );
        assert_eq!(
            script_for("enable_ad_account", json!({"identity": "CORP\\alex.taylor"})).await,
            "Enable-ADAccount -Identity 'CORP\\alex.taylor'"
        );
    }

    #[tokio::test]
    async fn test_set_password_command() {
        let script = script_for(
            "set_ad_account_password",
            json!({"identity": "john.doe", "new_password": "N3w-Passw0rd"}),
        )
        .await;

        assert_eq!(
            script,
            "Set-ADAccountPassword -Identity 'john.doe' -Reset \
             -NewPassword (ConvertTo-SecureString 'N3w-Passw0rd' -AsPlainText -Force)"
        );
    }

    #[tokio::test]
    async fn test_group_lifecycle_commands() {
        assert_eq!(
            script_for(
                "new_ad_group",
                json!({"name": "Web Admins", "group_scope": "DomainLocal", "group_category": "Distribution"})
            )
            .await,
            "New-ADGroup -Name 'Web Admins' -GroupScope DomainLocal -GroupCategory Distribution"
        );
        assert_eq!(
            script_for("remove_ad_group", json!({"identity": "Web Admins"})).await,
            "Remove-ADGroup -Identity 'Web Admins' -Confirm:$false"
        );
    }
}
