//! Parsing of Windows firewall rule enumeration output.
//!
//! `netsh advfirewall firewall show rule` prints one block per rule:
//!
//! ```text
//! Rule Name:                            Web HTTPS
//! ----------------------------------------------------------------------
//! Enabled:                              Yes
//! Direction:                            In
//! Grouping:
//! LocalPort:                            443
//! Protocol:                             TCP
//! Action:                               Allow
//!
//! Rule Name:                            ...
//! ```
//!
//! Blocks are separated by blank lines; each line is `Key: Value`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

pub const RULE_NAME: &str = "Rule Name";
pub const GROUPING: &str = "Grouping";
pub const LOCAL_PORT: &str = "LocalPort";
pub const PROTOCOL: &str = "Protocol";
pub const ENABLED: &str = "Enabled";
pub const DIRECTION: &str = "Direction";
pub const ACTION: &str = "Action";

/// Prefixes marking built-in rules whose names are resource references.
const SYSTEM_PREFIXES: [char; 2] = ['@', '{'];

/// One parsed block of enumeration output.
pub type RuleRecord = BTreeMap<String, String>;

/// Malformed enumeration output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based index of the offending record.
    pub record: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record {}: {}", self.record, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A firewall rule projected to the fields reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallRule {
    #[serde(rename = "Rule Name")]
    pub rule_name: String,
    #[serde(rename = "Grouping")]
    pub grouping: String,
    #[serde(rename = "LocalPort")]
    pub local_port: String,
    #[serde(rename = "Protocol")]
    pub protocol: String,
}

impl FirewallRule {
    fn from_record(record: &RuleRecord) -> Self {
        let field = |key: &str| record.get(key).cloned().unwrap_or_default();
        Self {
            rule_name: field(RULE_NAME),
            grouping: field(GROUPING),
            local_port: field(LOCAL_PORT),
            protocol: field(PROTOCOL),
        }
    }
}

/// Splits enumeration output into key/value records.
///
/// Lines without a colon (separator dashes, the trailing `Ok.`) carry no
/// data and are skipped. Every record that has data must name its rule.
pub fn parse_rule_records(output: &str) -> Result<Vec<RuleRecord>, ParseError> {
    let mut records = Vec::new();
    let mut current = RuleRecord::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            finish_record(&mut records, &mut current)?;
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError {
                record: records.len() + 1,
                message: format!("line without a key: '{}'", line),
            });
        }
        current.insert(key.to_string(), value.trim().to_string());
    }
    finish_record(&mut records, &mut current)?;

    Ok(records)
}

fn finish_record(
    records: &mut Vec<RuleRecord>,
    current: &mut RuleRecord,
) -> Result<(), ParseError> {
    if current.is_empty() {
        return Ok(());
    }
    if !current.contains_key(RULE_NAME) {
        return Err(ParseError {
            record: records.len() + 1,
            message: format!("missing '{}'", RULE_NAME),
        });
    }
    records.push(std::mem::take(current));
    Ok(())
}

/// Keeps enabled inbound allow rules, dropping built-in system rules.
pub fn inbound_allow_rules(records: &[RuleRecord]) -> Vec<FirewallRule> {
    records
        .iter()
        .filter(|record| {
            let is = |key: &str, expected: &str| record.get(key).map(String::as_str) == Some(expected);
            is(ENABLED, "Yes") && is(DIRECTION, "In") && is(ACTION, "Allow")
        })
        .map(FirewallRule::from_record)
        .filter(|rule| !is_system_name(&rule.rule_name) && !is_system_name(&rule.grouping))
        .collect()
}

fn is_system_name(value: &str) -> bool {
    value.starts_with(SYSTEM_PREFIXES)
}

/// Parses enumeration output and renders the inbound allow rules as a JSON array.
pub fn inbound_allow_rules_json(output: &str) -> Result<String, ParseError> {
    let records = parse_rule_records(output)?;
    let rules = inbound_allow_rules(&records);
    serde_json::to_string(&rules).map_err(|e| ParseError {
        record: 0,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\r
Rule Name:                            Web HTTPS\r
----------------------------------------------------------------------\r
Enabled:                              Yes\r
Direction:                            In\r
Profiles:                             Domain,Private\r
Grouping:                             \r
LocalIP:                              Any\r
RemoteIP:                             Any\r
Protocol:                             TCP\r
LocalPort:                            443\r
RemotePort:                           Any\r
Edge traversal:                       No\r
Action:                               Allow\r
\r
Rule Name:                            @FirewallAPI.dll,-28502\r
----------------------------------------------------------------------\r
Enabled:                              Yes\r
Direction:                            In\r
Grouping:                             @FirewallAPI.dll,-28502\r
Protocol:                             TCP\r
LocalPort:                            445\r
Action:                               Allow\r
\r
Ok.\r
";

    #[test]
    fn test_parse_records() {
        let records = parse_rule_records(SAMPLE).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0][RULE_NAME], "Web HTTPS");
        assert_eq!(records[0][GROUPING], "");
        assert_eq!(records[0]["Edge traversal"], "No");
        assert_eq!(records[0][LOCAL_PORT], "443");
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let records = parse_rule_records("Rule Name: Remote: Admin\nLocalIP: fe80::1\n").unwrap();

        assert_eq!(records[0][RULE_NAME], "Remote: Admin");
        assert_eq!(records[0]["LocalIP"], "fe80::1");
    }

    #[test]
    fn test_system_rules_are_excluded() {
        let records = parse_rule_records(SAMPLE).unwrap();
        let rules = inbound_allow_rules(&records);

        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rule_name, "Web HTTPS");
    }

    #[test]
    fn test_braced_grouping_is_excluded() {
        let records = parse_rule_records(
            "Rule Name: App\nEnabled: Yes\nDirection: In\nGrouping: {78E1CD88-49E3-476E-B926-580E596AD309}\nAction: Allow\n",
        )
        .unwrap();

        assert!(inbound_allow_rules(&records).is_empty());
    }

    #[test]
    fn test_blocked_and_outbound_rules_are_excluded() {
        let output = "Rule Name: Block\nEnabled: Yes\nDirection: In\nAction: Block\n\n\
                      Rule Name: Out\nEnabled: Yes\nDirection: Out\nAction: Allow\n";
        let records = parse_rule_records(output).unwrap();

        assert_eq!(records.len(), 2);
        assert!(inbound_allow_rules(&records).is_empty());
    }

    #[test]
    fn test_record_without_rule_name_is_malformed() {
        let error = parse_rule_records("Rule Name: A\n\nEnabled: Yes\nDirection: In\n").unwrap_err();

        assert_eq!(error.record, 2);
        assert!(error.message.contains("Rule Name"));
    }

    #[test]
    fn test_line_without_key_is_malformed() {
        assert!(parse_rule_records("Rule Name: A\n: orphan\n").is_err());
    }

    #[test]
    fn test_no_rules_message_yields_empty_array() {
        let json = inbound_allow_rules_json("No rules match the specified criteria.\r\n").unwrap();
        assert_eq!(json, "[]");
    }
}
