//! Apply Engine - replaces a network's rule set, or simulates it on dry run.

use crate::error::Result;
use crate::rules::RuleDocument;
use crate::types::{NetworkRef, OperationOutcome};
use dashboard::Backend;

/// Replace the remote rule set for the document's direction.
///
/// This is a wholesale replacement: remote rules missing from `rules` are
/// dropped.
pub fn replace_rules<B: Backend + ?Sized>(
    backend: &B,
    network: &NetworkRef,
    rules: &RuleDocument,
) -> Result<()> {
    backend.replace_firewall_rules(&network.id, rules.direction(), rules.rules())?;
    Ok(())
}

/// Apply `rules` to one network and classify the result.
///
/// With `dry_run` set no remote call is made at all. Remote failures become
/// [`OperationOutcome::UpdateFailed`]; they never propagate.
pub fn apply<B: Backend + ?Sized>(
    backend: &B,
    network: &NetworkRef,
    rules: &RuleDocument,
    dry_run: bool,
) -> OperationOutcome {
    if dry_run {
        return OperationOutcome::DryRunSkipped;
    }

    match replace_rules(backend, network, rules) {
        Ok(()) => {
            log::info!("Updated {} rules on {}", rules.direction(), network.id);
            OperationOutcome::UpdateSucceeded
        }
        Err(e) => {
            log::warn!("Update of {} rules on {} failed: {}", rules.direction(), network.id, e);
            OperationOutcome::UpdateFailed(e.to_string())
        }
    }
}
