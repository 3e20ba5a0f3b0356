//! Audit Log - append-only, one line per record.
//!
//! Each [`AuditLog::append`] opens the file, writes a single timestamped
//! line, syncs it to disk and closes the handle again. A run killed at any
//! point leaves a log whose lines are complete and in order.

use crate::error::{Error, Result};
use crate::types::{NetworkRef, OperationOutcome, RunReport};
use chrono::Local;
use dashboard::Direction;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Handle to a run's log file. Holds no open file between records.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record and make it durable before returning.
    pub fn append(&self, record: impl fmt::Display) -> Result<()> {
        let line = format!("[{}] {}\n", Local::now().format("%Y-%m-%d %H:%M:%S"), record);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        write_synced(&mut file, &line).map_err(|e| Error::io(&self.path, e))?;

        Ok(())
    }
}

fn write_synced(file: &mut File, line: &str) -> io::Result<()> {
    file.write_all(line.as_bytes())?;
    file.flush()?;
    file.sync_data()
}

/// A line in the audit log.
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    /// First line of every log.
    Title {
        direction: Direction,
        timestamp: &'a str,
    },
    DryRunMode(bool),
    TargetCount {
        tag: Option<&'a str>,
        count: usize,
    },
    BackupSucceeded {
        network: &'a NetworkRef,
        direction: Direction,
        artifact: &'a Path,
    },
    BackupFailed {
        network: &'a NetworkRef,
        direction: Direction,
        reason: &'a str,
    },
    /// The apply outcome for a target whose backup did not fail.
    Applied {
        network: &'a NetworkRef,
        direction: Direction,
        outcome: &'a OperationOutcome,
    },
    Summary(&'a RunReport),
}

impl fmt::Display for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title {
                direction,
                timestamp,
            } => write!(
                f,
                "=== Firewall {} Update Log: {} ===",
                direction.title(),
                timestamp
            ),
            Self::DryRunMode(dry_run) => {
                write!(f, "Dry Run Mode: {}", if *dry_run { "YES" } else { "NO" })
            }
            Self::TargetCount { tag, count } => write!(
                f,
                "Target Networks (tag={}): {}",
                tag.unwrap_or("any"),
                count
            ),
            Self::BackupSucceeded {
                network,
                direction,
                artifact,
            } => write!(
                f,
                "BACKUP OK: saved current {} rules for '{}' ({}) to: {}",
                direction,
                network.name,
                network.id,
                artifact.display()
            ),
            Self::BackupFailed {
                network,
                direction,
                reason,
            } => write!(
                f,
                "BACKUP FAILED: could not back up {} rules for '{}' ({}): {} - rules left unchanged",
                direction, network.name, network.id, reason
            ),
            Self::Applied {
                network,
                direction,
                outcome,
            } => match outcome {
                OperationOutcome::DryRunSkipped => write!(
                    f,
                    "DRY RUN: would apply {} firewall rules to '{}' ({})",
                    direction, network.name, network.id
                ),
                OperationOutcome::UpdateSucceeded => write!(
                    f,
                    "UPDATE OK: replaced {} firewall rules for '{}' ({})",
                    direction, network.name, network.id
                ),
                OperationOutcome::UpdateFailed(reason) => write!(
                    f,
                    "UPDATE FAILED: could not update {} firewall rules for '{}' ({}): {}",
                    direction, network.name, network.id, reason
                ),
                OperationOutcome::BackupFailed(reason) => Record::BackupFailed {
                    network,
                    direction: *direction,
                    reason: reason.as_str(),
                }
                .fmt(f),
            },
            Self::Summary(report) => write!(
                f,
                "=== Done: {} updated, {} update failed, {} backup failed, {} dry run ===",
                report.updated(),
                report.update_failed(),
                report.backup_failed(),
                report.dry_run_skipped()
            ),
        }
    }
}
