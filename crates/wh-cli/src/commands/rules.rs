//! Rules command: lists the event classification table in effect.

use std::fmt::Write;

use anyhow::Result;
use wh_core::ClassificationTable;

use crate::Config;

/// Formats the table as aligned text.
pub fn format_rules(table: &ClassificationTable) -> String {
    let mut output = String::new();
    if table.is_empty() {
        writeln!(output, "No classification rules configured.").unwrap();
        return output;
    }

    let width = table
        .rules()
        .map(|rule| rule.provider.len())
        .max()
        .unwrap_or(0)
        .max("PROVIDER".len());

    writeln!(output, "{:<width$}  {:>5}  KIND", "PROVIDER", "ID").unwrap();
    for rule in table.rules() {
        writeln!(output, "{:<width$}  {:>5}  {}", rule.provider, rule.id, rule.kind).unwrap();
    }
    output
}

/// Runs the rules command.
pub fn run(config: &Config, json: bool) -> Result<()> {
    let table = config.classification_table();
    if json {
        let rules: Vec<_> = table.rules().collect();
        println!("{}", serde_json::to_string_pretty(&rules)?);
    } else {
        print!("{}", format_rules(&table));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;
    use wh_core::{ClassificationRule, EventKind};

    use super::*;

    #[test]
    fn test_default_rules_listing() {
        let output = format_rules(&ClassificationTable::default());
        assert_snapshot!(output, @r"
        PROVIDER                                   ID  KIND
        Microsoft-Windows-Kernel-General           12  start
        Microsoft-Windows-Kernel-General           13  stop
        Microsoft-Windows-Kernel-Power             42  stop
        Microsoft-Windows-Power-Troubleshooter      1  start
        ");
    }

    #[test]
    fn test_configured_rule_is_listed() {
        let table = ClassificationTable::empty().with_rule(ClassificationRule::new(
            "systemd-logind",
            7,
            EventKind::Stop,
        ));
        assert_eq!(
            format_rules(&table),
            "PROVIDER           ID  KIND\nsystemd-logind      7  stop\n"
        );
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(
            format_rules(&ClassificationTable::empty()),
            "No classification rules configured.\n"
        );
    }
}
