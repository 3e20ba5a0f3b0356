//! Run Orchestrator - the guarded rollout state machine
//!
//! ```text
//! Init -> RulesLoaded -> RulesConfirmed -> OrgSelected -> TargetsSelected
//!      -> TargetsConfirmed -> Running -> Done
//! ```
//!
//! Nothing is written (no log, no backup, no remote change) before
//! `TargetsConfirmed`. In `Running`, targets are processed one at a time in
//! selection order: backup, then apply, then log.

use crate::apply;
use crate::audit::{AuditLog, Record};
use crate::backup;
use crate::context::{
    DecisionSource, ProgressCallback, RunContext, RunRequest, rules_accepted, targets_confirmed,
};
use crate::error::{Error, Result};
use crate::rules::RuleDocument;
use crate::selector::{self, Selection};
use crate::types::{Gate, NetworkRef, OperationOutcome, RunOutcome, RunReport, TargetReport};
use dashboard::Backend;

/// States of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    RulesLoaded,
    RulesConfirmed,
    OrgSelected,
    TargetsSelected,
    TargetsConfirmed,
    Running,
    Done,
}

/// Tracks the current stage and only moves forward
#[derive(Debug)]
struct Machine {
    stage: Stage,
}

impl Machine {
    fn new() -> Self {
        Self { stage: Stage::Init }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "{:?} -> {:?}", self.stage, next);
        log::debug!("Run stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    fn stop(&self, why: &str) {
        log::info!("Run stopped at {:?}: {}", self.stage, why);
    }
}

/// Drive a whole run, from loading the rule file to the last target
///
/// # Arguments
/// * `backend` - Dashboard API
/// * `request` - Inputs gathered before the run (direction, rule file, tag, ...)
/// * `decisions` - Answers the two gates and the selection prompts
/// * `progress` - Progress callback for target processing
///
/// # Returns
/// How the run ended. Declined gates and empty selections are `Ok`; only
/// fatal problems (bad rule file, listing failure, bad organization pick,
/// audit log failure) are `Err`.
pub fn run<B, D, P>(
    backend: &B,
    request: &RunRequest,
    decisions: &mut D,
    progress: &mut P,
) -> Result<RunOutcome>
where
    B: Backend + ?Sized,
    D: DecisionSource + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let mut machine = Machine::new();

    let rules = RuleDocument::load(&request.rules_path, request.direction)?;
    machine.advance(Stage::RulesLoaded);

    let answer = decisions.review_rules(&rules).map_err(Error::Input)?;
    if !rules_accepted(&answer) {
        machine.stop("rules not accepted");
        return Ok(RunOutcome::Aborted(Gate::Rules));
    }
    machine.advance(Stage::RulesConfirmed);

    let orgs = selector::list_organizations(backend)?;
    let answer = decisions.choose_organization(&orgs).map_err(Error::Input)?;
    let org = selector::pick_organization(&orgs, &answer)?;
    log::info!("Selected organization {} ({})", org.name, org.id);
    machine.advance(Stage::OrgSelected);

    let networks = selector::list_networks(backend, &org.id)?;
    let candidates = match request.tag.as_deref() {
        Some(tag) => selector::filter_by_tag(&networks, tag),
        None => networks,
    };
    if candidates.is_empty() {
        machine.stop("no networks matched");
        return Ok(RunOutcome::NoMatches {
            tag: request.tag.clone().unwrap_or_default(),
        });
    }

    let answer = decisions
        .choose_networks(&candidates, request.tag.as_deref())
        .map_err(Error::Input)?;
    let targets = selector::narrow_by_selection(&candidates, &Selection::parse(&answer));
    if targets.is_empty() {
        machine.stop("selection resolved to no networks");
        return Ok(RunOutcome::NothingSelected);
    }
    machine.advance(Stage::TargetsSelected);

    let answer = decisions
        .confirm_targets(&targets, &rules, request.dry_run)
        .map_err(Error::Input)?;
    if !targets_confirmed(&answer) {
        machine.stop("targets not confirmed");
        return Ok(RunOutcome::Aborted(Gate::Targets));
    }
    machine.advance(Stage::TargetsConfirmed);

    let ctx = RunContext::new(
        rules,
        targets,
        request.dry_run,
        request.tag.clone(),
        request.timestamp,
        &request.output_dir,
    );
    machine.advance(Stage::Running);
    let report = execute(backend, &ctx, progress)?;
    machine.advance(Stage::Done);

    Ok(RunOutcome::Completed(report))
}

/// Process every target of a confirmed run
///
/// Per-target failures are logged and recorded in the report; they never
/// stop the loop. A failure to write the audit log does, since the run would
/// otherwise continue unrecorded.
pub fn execute<B, P>(backend: &B, ctx: &RunContext, progress: &mut P) -> Result<RunReport>
where
    B: Backend + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let log = AuditLog::new(ctx.log_path());
    let stamp = ctx.stamp();
    log.append(Record::Title {
        direction: ctx.direction(),
        timestamp: &stamp,
    })?;
    log.append(Record::DryRunMode(ctx.dry_run()))?;
    log.append(Record::TargetCount {
        tag: ctx.tag(),
        count: ctx.targets().len(),
    })?;

    progress.on_run_start(ctx);

    let mut report = RunReport::new(ctx.dry_run(), ctx.log_path(), ctx.backup_dir());
    let total = ctx.targets().len();
    for (i, network) in ctx.targets().iter().enumerate() {
        progress.on_target_start(i + 1, total, network);
        let target = process_target(backend, ctx, &log, network)?;
        progress.on_target_complete(&target);
        report.targets.push(target);
    }

    log.append(Record::Summary(&report))?;
    Ok(report)
}

/// Backup, then apply, then log one network
fn process_target<B: Backend + ?Sized>(
    backend: &B,
    ctx: &RunContext,
    log: &AuditLog,
    network: &NetworkRef,
) -> Result<TargetReport> {
    let direction = ctx.direction();

    // Dry runs read nothing and write nothing remotely.
    if ctx.dry_run() {
        let outcome = apply::apply(backend, network, ctx.rules(), true);
        log.append(Record::Applied {
            network,
            direction,
            outcome: &outcome,
        })?;
        return Ok(TargetReport {
            network: network.clone(),
            backup: None,
            outcome,
        });
    }

    let artifact = match backup::backup(backend, network, direction, ctx.backup_dir()) {
        Ok(path) => {
            log.append(Record::BackupSucceeded {
                network,
                direction,
                artifact: &path,
            })?;
            path
        }
        Err(e) => {
            let reason = e.to_string();
            log::warn!("Backup of {} failed, skipping update: {}", network.id, reason);
            log.append(Record::BackupFailed {
                network,
                direction,
                reason: &reason,
            })?;
            return Ok(TargetReport {
                network: network.clone(),
                backup: None,
                outcome: OperationOutcome::BackupFailed(reason),
            });
        }
    };

    let outcome = apply::apply(backend, network, ctx.rules(), false);
    log.append(Record::Applied {
        network,
        direction,
        outcome: &outcome,
    })?;

    Ok(TargetReport {
        network: network.clone(),
        backup: Some(artifact),
        outcome,
    })
}
