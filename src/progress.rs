//! Terminal progress for target processing.

use crate::ui;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use rollout::{OperationOutcome, ProgressCallback, RunContext, TargetReport};
use std::time::Duration;

/// Spinner per target, followed by a one-line result
#[derive(Default)]
pub struct TargetProgress {
    spinner: Option<ProgressBar>,
}

impl TargetProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.blue.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl ProgressCallback for TargetProgress {
    fn on_run_start(&mut self, ctx: &RunContext) {
        ui::header(&format!(
            "Processing {}",
            ui::plural(ctx.targets().len(), "network")
        ));
        ui::kv("Log", &ctx.log_path().display().to_string());
        if !ctx.dry_run() {
            ui::kv("Backups", &ctx.backup_dir().display().to_string());
        }
        println!();
    }

    fn on_target_start(&mut self, index: usize, total: usize, network: &rollout::NetworkRef) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::style());
        pb.set_prefix(format!("[{index}/{total}]"));
        pb.set_message(ui::describe_network(network));
        pb.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(pb);
    }

    fn on_target_complete(&mut self, report: &TargetReport) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }

        let name = ui::describe_network(&report.network);
        match &report.outcome {
            OperationOutcome::UpdateSucceeded => {
                println!("  {} {}", "✓".green(), name);
            }
            OperationOutcome::DryRunSkipped => {
                println!("  {} {} {}", "○".blue(), name, "(dry run)".dimmed());
            }
            OperationOutcome::BackupFailed(reason) => {
                println!("  {} {} {}", "✗".red(), name, "backup failed, not updated".red());
                ui::dim(reason);
            }
            OperationOutcome::UpdateFailed(reason) => {
                println!("  {} {} {}", "✗".red(), name, "update failed".red());
                ui::dim(reason);
            }
        }
    }
}
