//! # Rollout
//!
//! Guarded bulk replacement of appliance firewall rules across many
//! networks.
//!
//! A run walks a fixed sequence: load the rule file, have the operator review
//! it, pick an organization, narrow its networks by tag and selection, then
//! confirm the concrete target list. Only after that final confirmation does
//! anything get written. Each target is then processed on its own:
//!
//! 1. back up the live rule set for the chosen direction
//! 2. replace it with the new rules (skipped on dry run)
//! 3. record both steps in the audit log
//!
//! A target whose backup fails is never updated. One target failing never
//! stops the others.
//!
//! ## Example
//!
//! ```ignore
//! use dashboard::backend::meraki::MerakiBackend;
//! use dashboard::Direction;
//! use rollout::{run, NoProgress, RunOutcome, RunRequest, ScriptedDecisions};
//!
//! let backend = MerakiBackend::new(api_key);
//! let request = RunRequest::new(Direction::Outbound, "deny_all.json")
//!     .with_tag("branch")
//!     .with_dry_run(true);
//!
//! match run(&backend, &request, &mut ScriptedDecisions::affirmative(), &mut NoProgress)? {
//!     RunOutcome::Completed(report) => println!("log: {}", report.log_path.display()),
//!     other => println!("{other:?}"),
//! }
//! ```
//!
//! ## Provider Traits
//!
//! - [`DecisionSource`]: answers the review, selection and confirmation prompts
//! - [`ProgressCallback`]: receives per-target progress
//!
//! The crate has no terminal dependency; the CLI supplies both.

pub mod apply;
pub mod audit;
pub mod backup;
pub mod context;
pub mod error;
pub mod orchestrator;
pub mod rules;
pub mod selector;
pub mod types;

// Re-export main types at crate root
pub use context::{
    DecisionSource, NoProgress, ProgressCallback, RULES_AFFIRMATIVE, RunContext, RunRequest,
    ScriptedDecisions, TARGETS_AFFIRMATIVE, rules_accepted, targets_confirmed,
};
pub use error::{Error, Result};
pub use orchestrator::{Stage, execute, run};
pub use rules::RuleDocument;
pub use selector::Selection;
pub use types::{Gate, NetworkRef, OperationOutcome, RunOutcome, RunReport, TargetReport};
