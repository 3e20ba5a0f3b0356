//! Core types for rollout runs

use std::fmt;
use std::path::{Path, PathBuf};

/// A network targeted by a run. Produced by listing, never modified.
pub type NetworkRef = dashboard::Network;

/// Result of processing one target network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome {
    /// Backup failed, so the rules were left untouched
    BackupFailed(String),
    /// Dry run: nothing was written
    DryRunSkipped,
    /// Remote rule set replaced
    UpdateSucceeded,
    /// Replacement rejected or failed after a successful backup
    UpdateFailed(String),
}

impl OperationOutcome {
    /// Check if the outcome represents a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::BackupFailed(_) | Self::UpdateFailed(_))
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::BackupFailed(reason) | Self::UpdateFailed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Short label for summaries
    pub fn label(&self) -> &'static str {
        match self {
            Self::BackupFailed(_) => "backup failed",
            Self::DryRunSkipped => "dry run",
            Self::UpdateSucceeded => "updated",
            Self::UpdateFailed(_) => "update failed",
        }
    }
}

impl fmt::Display for OperationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason() {
            Some(reason) => write!(f, "{}: {}", self.label(), reason),
            None => f.write_str(self.label()),
        }
    }
}

/// What happened to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub network: NetworkRef,
    /// Backup artifact, when a backup was written
    pub backup: Option<PathBuf>,
    pub outcome: OperationOutcome,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub dry_run: bool,
    pub log_path: PathBuf,
    pub backup_dir: PathBuf,
    pub targets: Vec<TargetReport>,
}

impl RunReport {
    pub(crate) fn new(dry_run: bool, log_path: &Path, backup_dir: &Path) -> Self {
        Self {
            dry_run,
            log_path: log_path.to_path_buf(),
            backup_dir: backup_dir.to_path_buf(),
            targets: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(&OperationOutcome) -> bool) -> usize {
        self.targets.iter().filter(|t| pred(&t.outcome)).count()
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::UpdateSucceeded))
    }

    pub fn update_failed(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::UpdateFailed(_)))
    }

    pub fn backup_failed(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::BackupFailed(_)))
    }

    pub fn dry_run_skipped(&self) -> usize {
        self.count(|o| matches!(o, OperationOutcome::DryRunSkipped))
    }

    /// Check if every target finished without failure
    pub fn is_success(&self) -> bool {
        self.targets.iter().all(|t| !t.outcome.is_failure())
    }

    /// Backup artifacts written during the run, in target order
    pub fn artifacts(&self) -> Vec<&Path> {
        self.targets
            .iter()
            .filter_map(|t| t.backup.as_deref())
            .collect()
    }

    /// Report for one network, if it was a target
    pub fn target(&self, network_id: &str) -> Option<&TargetReport> {
        self.targets.iter().find(|t| t.network.id == network_id)
    }
}

/// Confirmation gate where an operator can stop the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Review of the loaded rule document
    Rules,
    /// Final confirmation of the concrete target list
    Targets,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every target was processed (failures are inside the report)
    Completed(RunReport),
    /// Tag filter matched nothing; nothing was touched
    NoMatches { tag: String },
    /// Selection resolved to no networks; nothing was touched
    NothingSelected,
    /// Operator declined at a gate; nothing was touched
    Aborted(Gate),
}

impl RunOutcome {
    /// The report, if the run reached target processing
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard::Network;

    fn target(id: &str, outcome: OperationOutcome, backup: Option<&str>) -> TargetReport {
        TargetReport {
            network: Network::new(id, id, Vec::<String>::new()),
            backup: backup.map(PathBuf::from),
            outcome,
        }
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(OperationOutcome::UpdateSucceeded.to_string(), "updated");
        assert_eq!(
            OperationOutcome::BackupFailed("timeout".into()).to_string(),
            "backup failed: timeout"
        );
    }

    #[test]
    fn test_outcome_failure() {
        assert!(OperationOutcome::BackupFailed(String::new()).is_failure());
        assert!(OperationOutcome::UpdateFailed(String::new()).is_failure());
        assert!(!OperationOutcome::DryRunSkipped.is_failure());
        assert!(!OperationOutcome::UpdateSucceeded.is_failure());
    }

    #[test]
    fn test_report_counts() {
        let mut report = RunReport::new(false, Path::new("log.txt"), Path::new("backups"));
        report
            .targets
            .push(target("N1", OperationOutcome::UpdateSucceeded, Some("b/N1.json")));
        report.targets.push(target(
            "N2",
            OperationOutcome::BackupFailed("x".into()),
            None,
        ));
        report.targets.push(target(
            "N3",
            OperationOutcome::UpdateFailed("y".into()),
            Some("b/N3.json"),
        ));

        assert_eq!(report.updated(), 1);
        assert_eq!(report.backup_failed(), 1);
        assert_eq!(report.update_failed(), 1);
        assert_eq!(report.dry_run_skipped(), 0);
        assert!(!report.is_success());
        assert_eq!(
            report.artifacts(),
            vec![Path::new("b/N1.json"), Path::new("b/N3.json")]
        );
        assert!(report.target("N2").is_some());
        assert!(report.target("N9").is_none());
    }

    #[test]
    fn test_outcome_report_accessor() {
        assert!(RunOutcome::NothingSelected.report().is_none());
        assert!(RunOutcome::Aborted(Gate::Rules).report().is_none());
    }
}
