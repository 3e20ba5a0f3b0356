//! Interactive prompts
//!
//! [`TerminalDecisions`] shows what is about to happen and hands the raw
//! answers back to the rollout state machine, which decides whether a gate
//! passed.

use crate::ui;
use colored::Colorize;
use dashboard::{Direction, Organization};
use dialoguer::{Confirm, Input, Password};
use rollout::{
    DecisionSource, NetworkRef, RULES_AFFIRMATIVE, RuleDocument, TARGETS_AFFIRMATIVE,
};
use std::io;
use std::path::PathBuf;

/// Decision source backed by the terminal
///
/// Organization and network answers may be supplied up front from flags;
/// the two gates are always asked.
pub struct TerminalDecisions {
    org: Option<String>,
    networks: Option<String>,
}

impl TerminalDecisions {
    pub fn new(org: Option<String>, networks: Option<String>) -> Self {
        Self { org, networks }
    }
}

fn ask(prompt: &str) -> io::Result<String> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer)
}

impl DecisionSource for TerminalDecisions {
    fn review_rules(&mut self, rules: &RuleDocument) -> io::Result<String> {
        ui::header(&format!(
            "New {} firewall rules ({})",
            rules.direction(),
            ui::plural(rules.len(), "rule")
        ));
        println!("{}", rules.to_pretty_json());
        println!();
        ui::warn(&format!(
            "These rules REPLACE the whole {} rule set of every selected network.",
            rules.direction()
        ));
        if rules.is_empty() {
            ui::warn("The rule list is empty: selected networks will be left with no custom rules.");
        }

        ask(&format!("Type '{RULES_AFFIRMATIVE}' to continue with these rules"))
    }

    fn choose_organization(&mut self, orgs: &[Organization]) -> io::Result<String> {
        ui::header("Organizations");
        for (i, org) in orgs.iter().enumerate() {
            ui::numbered(i + 1, &format!("{} ({})", org.name, org.id));
        }

        if let Some(answer) = self.org.take() {
            ui::dim(&format!("Organization from --org: {answer}"));
            return Ok(answer);
        }
        ask("Organization number")
    }

    fn choose_networks(
        &mut self,
        networks: &[NetworkRef],
        tag: Option<&str>,
    ) -> io::Result<String> {
        match tag {
            Some(tag) => ui::header(&format!("Networks tagged '{tag}'")),
            None => ui::header("Networks"),
        }
        for (i, network) in networks.iter().enumerate() {
            ui::numbered(i + 1, &ui::describe_network(network));
        }

        if let Some(answer) = self.networks.take() {
            ui::dim(&format!("Selection from --networks: {answer}"));
            return Ok(answer);
        }

        let all = Confirm::new()
            .with_prompt(format!(
                "Apply to all {}?",
                ui::plural(networks.len(), "network")
            ))
            .default(false)
            .interact()?;
        if all {
            return Ok("all".to_string());
        }
        ask("Network numbers (comma-separated, e.g. 1,3,4)")
    }

    fn confirm_targets(
        &mut self,
        targets: &[NetworkRef],
        rules: &RuleDocument,
        dry_run: bool,
    ) -> io::Result<String> {
        ui::header("Final confirmation");
        ui::kv("Direction", rules.direction().as_str());
        ui::kv("Rules", &ui::plural(rules.len(), "rule"));
        if let Some(source) = rules.source() {
            ui::kv("Rule file", &source.display().to_string());
        }
        ui::kv(
            "Mode",
            &if dry_run {
                "DRY RUN (nothing is backed up or changed)".blue().to_string()
            } else {
                "LIVE (each network is backed up, then replaced)".red().bold().to_string()
            },
        );
        println!();
        for network in targets {
            println!("  • {}", ui::describe_network(network));
        }
        println!();

        ask(&format!(
            "Type {} to {} {}",
            TARGETS_AFFIRMATIVE,
            if dry_run { "simulate on" } else { "update" },
            ui::plural(targets.len(), "network")
        ))
    }
}

/// Hidden prompt for the Dashboard API key
pub fn api_key(env_name: &str) -> io::Result<String> {
    ui::info(&format!("{env_name} is not set."));
    let key = Password::new()
        .with_prompt("Meraki Dashboard API key")
        .interact()?;
    Ok(key.trim().to_string())
}

/// Ask for the rule direction; returns the raw answer
pub fn direction() -> io::Result<String> {
    let options: Vec<&str> = Direction::ALL.iter().map(Direction::as_str).collect();
    ask(&format!("Direction ({})", options.join("/")))
}

/// Ask for the rule file path
pub fn rules_path() -> io::Result<PathBuf> {
    let path: String = Input::new()
        .with_prompt("Path to the rule file (JSON)")
        .interact_text()?;
    Ok(crate::paths::expand(path.trim()))
}

/// Ask for a tag; an empty answer means every network is offered
pub fn tag() -> io::Result<Option<String>> {
    let tag = ask("Network tag to filter by (empty for all networks)")?;
    Ok(non_empty(&tag))
}

/// Ask whether to run without changing anything
pub fn dry_run() -> io::Result<bool> {
    let dry_run = Confirm::new()
        .with_prompt("Dry run (log only, no backups, no changes)?")
        .default(true)
        .interact()?;
    Ok(dry_run)
}

/// Trimmed value, or `None` when blank
pub fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  branch "), Some("branch".to_string()));
        assert_eq!(non_empty("   "), None);
        assert_eq!(non_empty(""), None);
    }
}
