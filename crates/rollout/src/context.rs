//! Run context and provider traits
//!
//! These traits keep the orchestrator independent of any particular
//! terminal: the CLI answers prompts with dialoguer, tests answer them from
//! a script.

use crate::rules::RuleDocument;
use crate::types::{NetworkRef, TargetReport};
use chrono::{Local, NaiveDateTime};
use dashboard::{Direction, Organization};
use std::io;
use std::path::{Path, PathBuf};

/// Answer the rule review gate must receive (trimmed, any case).
pub const RULES_AFFIRMATIVE: &str = "yes";

/// Answer the final gate must receive (trimmed, exact case).
pub const TARGETS_AFFIRMATIVE: &str = "CONFIRM";

/// Whether an answer to the rule review passes the gate
pub fn rules_accepted(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(RULES_AFFIRMATIVE)
}

/// Whether an answer to the final confirmation passes the gate
pub fn targets_confirmed(answer: &str) -> bool {
    answer.trim() == TARGETS_AFFIRMATIVE
}

/// Source of operator decisions
///
/// Every method returns the raw answer; the orchestrator decides what it
/// means. Each method is called at most once per run.
pub trait DecisionSource {
    /// Show the rule document and ask whether to proceed with it
    fn review_rules(&mut self, rules: &RuleDocument) -> io::Result<String>;

    /// Ask for a 1-based organization number
    fn choose_organization(&mut self, orgs: &[Organization]) -> io::Result<String>;

    /// Ask for `all` or comma-separated 1-based network numbers
    fn choose_networks(&mut self, networks: &[NetworkRef], tag: Option<&str>)
    -> io::Result<String>;

    /// Show the final target list and ask for confirmation
    fn confirm_targets(
        &mut self,
        targets: &[NetworkRef],
        rules: &RuleDocument,
        dry_run: bool,
    ) -> io::Result<String>;
}

/// Progress callback for target processing
pub trait ProgressCallback {
    /// Called once the run context exists, before the first target
    fn on_run_start(&mut self, ctx: &RunContext);

    /// Called before a target's backup
    fn on_target_start(&mut self, index: usize, total: usize, network: &NetworkRef);

    /// Called after a target's outcome has been logged
    fn on_target_complete(&mut self, report: &TargetReport);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_run_start(&mut self, _ctx: &RunContext) {}
    fn on_target_start(&mut self, _index: usize, _total: usize, _network: &NetworkRef) {}
    fn on_target_complete(&mut self, _report: &TargetReport) {}
}

/// Decision source that replays fixed answers
///
/// Records which prompts were asked, in order.
#[derive(Debug, Clone)]
pub struct ScriptedDecisions {
    pub rules: String,
    pub organization: String,
    pub networks: String,
    pub confirm: String,
    pub asked: Vec<&'static str>,
}

impl ScriptedDecisions {
    /// Answers that accept both gates and select everything in the first
    /// organization
    pub fn affirmative() -> Self {
        Self {
            rules: RULES_AFFIRMATIVE.to_string(),
            organization: "1".to_string(),
            networks: "all".to_string(),
            confirm: TARGETS_AFFIRMATIVE.to_string(),
            asked: Vec::new(),
        }
    }
}

impl DecisionSource for ScriptedDecisions {
    fn review_rules(&mut self, _rules: &RuleDocument) -> io::Result<String> {
        self.asked.push("rules");
        Ok(self.rules.clone())
    }

    fn choose_organization(&mut self, _orgs: &[Organization]) -> io::Result<String> {
        self.asked.push("organization");
        Ok(self.organization.clone())
    }

    fn choose_networks(
        &mut self,
        _networks: &[NetworkRef],
        _tag: Option<&str>,
    ) -> io::Result<String> {
        self.asked.push("networks");
        Ok(self.networks.clone())
    }

    fn confirm_targets(
        &mut self,
        _targets: &[NetworkRef],
        _rules: &RuleDocument,
        _dry_run: bool,
    ) -> io::Result<String> {
        self.asked.push("confirm");
        Ok(self.confirm.clone())
    }
}

/// Everything gathered before the state machine starts
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub direction: Direction,
    pub rules_path: PathBuf,
    /// Only networks with this tag are offered; `None` offers all
    pub tag: Option<String>,
    pub dry_run: bool,
    /// Directory that receives the log file and the backup directory
    pub output_dir: PathBuf,
    /// Fixed run timestamp; the clock is read at final confirmation if unset
    pub timestamp: Option<NaiveDateTime>,
}

impl RunRequest {
    pub fn new(direction: Direction, rules_path: impl Into<PathBuf>) -> Self {
        Self {
            direction,
            rules_path: rules_path.into(),
            tag: None,
            dry_run: false,
            output_dir: PathBuf::from("."),
            timestamp: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Immutable state of a confirmed run
///
/// Artifact paths are derived from direction and timestamp only, so two
/// runs in the same second and direction share them.
#[derive(Debug, Clone)]
pub struct RunContext {
    rules: RuleDocument,
    targets: Vec<NetworkRef>,
    dry_run: bool,
    tag: Option<String>,
    timestamp: NaiveDateTime,
    backup_dir: PathBuf,
    log_path: PathBuf,
}

impl RunContext {
    pub fn new(
        rules: RuleDocument,
        targets: Vec<NetworkRef>,
        dry_run: bool,
        tag: Option<String>,
        timestamp: Option<NaiveDateTime>,
        output_dir: &Path,
    ) -> Self {
        let timestamp = timestamp.unwrap_or_else(|| Local::now().naive_local());
        let stamp = timestamp.format("%Y%m%d_%H%M%S").to_string();
        let direction = rules.direction();

        Self {
            backup_dir: output_dir.join(format!("firewall_backups_{}_{}", direction, stamp)),
            log_path: output_dir.join(format!("firewall_update_log_{}_{}.txt", direction, stamp)),
            rules,
            targets,
            dry_run,
            tag,
            timestamp,
        }
    }

    pub fn direction(&self) -> Direction {
        self.rules.direction()
    }

    pub fn rules(&self) -> &RuleDocument {
        &self.rules
    }

    pub fn targets(&self) -> &[NetworkRef] {
        &self.targets
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Run timestamp as used in artifact names
    pub fn stamp(&self) -> String {
        self.timestamp.format("%Y%m%d_%H%M%S").to_string()
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|d| d.and_hms_opt(9, 5, 1))
            .unwrap()
    }

    #[test]
    fn test_rules_gate() {
        assert!(rules_accepted("yes"));
        assert!(rules_accepted(" YES "));
        assert!(rules_accepted("Yes"));
        assert!(!rules_accepted("y"));
        assert!(!rules_accepted("yes please"));
        assert!(!rules_accepted(""));
        assert!(!rules_accepted("no"));
    }

    #[test]
    fn test_targets_gate_is_exact() {
        assert!(targets_confirmed("CONFIRM"));
        assert!(targets_confirmed("  CONFIRM\n"));
        assert!(!targets_confirmed("confirm"));
        assert!(!targets_confirmed("Confirm"));
        assert!(!targets_confirmed("yes"));
        assert!(!targets_confirmed("CONFIRMED"));
    }

    #[test]
    fn test_context_paths_from_direction_and_timestamp() {
        let rules = RuleDocument::new(Direction::Outbound, vec![]);
        let ctx = RunContext::new(rules, vec![], false, None, Some(fixed()), Path::new("/out"));

        assert_eq!(ctx.stamp(), "20250307_090501");
        assert_eq!(
            ctx.backup_dir(),
            Path::new("/out/firewall_backups_outbound_20250307_090501")
        );
        assert_eq!(
            ctx.log_path(),
            Path::new("/out/firewall_update_log_outbound_20250307_090501.txt")
        );
    }

    #[test]
    fn test_context_paths_are_deterministic() {
        let a = RunContext::new(
            RuleDocument::new(Direction::Inbound, vec![]),
            vec![],
            true,
            Some("branch".into()),
            Some(fixed()),
            Path::new("out"),
        );
        let b = RunContext::new(
            RuleDocument::new(Direction::Inbound, vec![]),
            vec![],
            false,
            None,
            Some(fixed()),
            Path::new("out"),
        );
        assert_eq!(a.log_path(), b.log_path());
        assert_eq!(a.backup_dir(), b.backup_dir());
        assert_eq!(a.tag(), Some("branch"));
    }

    #[test]
    fn test_request_builder() {
        let request = RunRequest::new(Direction::Inbound, "rules.json")
            .with_tag("branch")
            .with_dry_run(true)
            .with_output_dir("/tmp/out");
        assert_eq!(request.tag.as_deref(), Some("branch"));
        assert!(request.dry_run);
        assert_eq!(request.output_dir, PathBuf::from("/tmp/out"));
        assert!(request.timestamp.is_none());
    }
}
