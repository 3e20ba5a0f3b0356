//! `fwguard apply` - guarded rule rollout
//!
//! Gathers the run inputs (credential, direction, rule file, tag, dry-run)
//! from flags, config and prompts, then hands control to the rollout state
//! machine with a terminal-backed decision source.

use crate::Context;
use crate::cli::ApplyArgs;
use crate::config::Config;
use crate::progress::TargetProgress;
use crate::prompt::{self, TerminalDecisions};
use crate::ui;
use anyhow::{Context as _, Result, bail};
use dashboard::Direction;
use dashboard::backend::meraki::MerakiBackend;
use rollout::{Gate, NoProgress, ProgressCallback, RunOutcome, RunReport, RunRequest};
use std::fs;
use std::path::PathBuf;

/// Inputs resolved before the state machine starts
struct Inputs {
    api_key: String,
    api_base: String,
    direction: Direction,
    rules_path: PathBuf,
    tag: Option<String>,
    dry_run: bool,
    output_dir: PathBuf,
}

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<()> {
    let config = Config::load()?;
    let org = args.org.clone();
    let networks = args.networks.clone();
    let inputs = resolve_inputs(&config, args)?;

    fs::create_dir_all(&inputs.output_dir).with_context(|| {
        format!(
            "Could not create output directory {}",
            inputs.output_dir.display()
        )
    })?;

    let mut request = RunRequest::new(inputs.direction, inputs.rules_path)
        .with_dry_run(inputs.dry_run)
        .with_output_dir(inputs.output_dir);
    if let Some(tag) = inputs.tag {
        request = request.with_tag(tag);
    }

    log::info!("Using Dashboard API at {}", inputs.api_base);
    let backend = MerakiBackend::with_api_base(inputs.api_key, inputs.api_base);
    let mut decisions = TerminalDecisions::new(org, networks);
    let mut progress: Box<dyn ProgressCallback> = if ctx.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(TargetProgress::new())
    };

    let outcome = match rollout::run(&backend, &request, &mut decisions, progress.as_mut()) {
        Ok(outcome) => outcome,
        Err(e) => {
            explain(&e);
            return Err(e).context("Rollout stopped");
        }
    };

    match outcome {
        RunOutcome::Completed(report) => finish(&report),
        RunOutcome::NoMatches { tag } if tag.is_empty() => {
            ui::warn("The organization has no networks. Nothing to do.");
            Ok(())
        }
        RunOutcome::NoMatches { tag } => {
            ui::warn(&format!("No networks carry the tag '{tag}'. Nothing to do."));
            Ok(())
        }
        RunOutcome::NothingSelected => {
            ui::warn("No valid network numbers were selected. Nothing to do.");
            Ok(())
        }
        RunOutcome::Aborted(Gate::Rules) => {
            ui::info("Rules not accepted. Aborted, no changes made.");
            Ok(())
        }
        RunOutcome::Aborted(Gate::Targets) => {
            ui::info("Not confirmed. Aborted, no changes made.");
            Ok(())
        }
    }
}

/// Flags win over config, config wins over defaults, prompts fill the rest
fn resolve_inputs(config: &Config, args: ApplyArgs) -> Result<Inputs> {
    let api_key = match config.api_key_from_env() {
        Some(key) => key,
        None => prompt::api_key(&config.api_key_env).context("Failed to read API key")?,
    };
    if api_key.is_empty() {
        bail!("An API key is required (set {})", config.api_key_env);
    }

    let direction = match args.direction {
        Some(direction) => direction,
        None => prompt::direction()
            .context("Failed to read direction")?
            .parse::<Direction>()?,
    };

    let rules_path = match args.rules {
        Some(path) => path,
        None => prompt::rules_path().context("Failed to read rule file path")?,
    };

    let tag = if args.all_networks {
        None
    } else {
        match args.tag {
            Some(tag) => prompt::non_empty(&tag),
            None => prompt::tag().context("Failed to read tag")?,
        }
    };

    let dry_run = if args.dry_run {
        true
    } else if args.live {
        false
    } else {
        prompt::dry_run().context("Failed to read dry-run choice")?
    };

    Ok(Inputs {
        api_key,
        api_base: args.api_base.unwrap_or_else(|| config.api_base.clone()),
        direction,
        rules_path,
        tag,
        dry_run,
        output_dir: args.output_dir.unwrap_or_else(|| config.output_dir()),
    })
}

/// Print a hint for what the operator can do about `err`
fn explain(err: &rollout::Error) {
    if let Some(category) = err.remote_category() {
        ui::error(category.description());
        ui::dim(category.advice());
    } else if let Some(hint) = input_hint(err) {
        ui::dim(hint);
    }
}

fn input_hint(err: &rollout::Error) -> Option<&'static str> {
    err.is_input_error()
        .then_some("Nothing was changed. Fix the input above and run fwguard apply again.")
}

fn finish(report: &RunReport) -> Result<()> {
    ui::header("Summary");
    if report.dry_run {
        ui::kv("Dry run", &ui::plural(report.dry_run_skipped(), "network"));
    } else {
        ui::kv("Updated", &report.updated().to_string());
        ui::kv("Update failed", &report.update_failed().to_string());
        ui::kv("Backup failed", &report.backup_failed().to_string());
    }
    ui::kv("Log", &report.log_path.display().to_string());
    if !report.artifacts().is_empty() {
        ui::kv("Backups", &report.backup_dir.display().to_string());
    }
    println!();

    if report.is_success() {
        ui::success("Done.");
        return Ok(());
    }

    let failed = report.update_failed() + report.backup_failed();
    if report.backup_failed() > 0 {
        ui::dim("Networks whose backup failed were left unchanged.");
    }
    if report.update_failed() > 0 {
        ui::dim("Restore a failed update by using its backup file as the rule file.");
    }
    bail!(
        "{} failed; see {}",
        ui::plural(failed, "network"),
        report.log_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_input_errors_get_a_hint() {
        let missing = rollout::Error::RulesNotFound {
            path: PathBuf::from("rules.json"),
        };
        assert!(input_hint(&missing).is_some());
        assert!(input_hint(&rollout::Error::NoOrganizations).is_some());
    }

    #[test]
    fn test_environment_errors_get_no_input_hint() {
        let io = rollout::Error::io("log.txt", std::io::Error::other("disk full"));
        assert!(input_hint(&io).is_none());

        let remote = rollout::Error::Remote(dashboard::Error::http("HTTP 500", Some(500)));
        assert!(input_hint(&remote).is_none());
    }
}
