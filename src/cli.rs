use clap::{Parser, Subcommand};
use clap_complete::Shell;
use dashboard::Direction;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fwguard")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(
    about = "Roll out Meraki appliance firewall rules across many networks, with backups and an audit log",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Replace the firewall rules of selected networks
    ///
    /// Anything not given as a flag is asked for interactively. The rule
    /// review and the final CONFIRM are always interactive.
    Apply(ApplyArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Default)]
pub struct ApplyArgs {
    /// Rule set to replace: inbound or outbound
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// JSON file with the new rules
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Only offer networks carrying this tag
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Offer every network in the organization, without asking for a tag
    #[arg(long, conflicts_with = "tag")]
    pub all_networks: bool,

    /// Back up nothing and change nothing; only write the log
    #[arg(long)]
    pub dry_run: bool,

    /// Make the changes without asking about a dry run first
    #[arg(long, conflicts_with = "dry_run")]
    pub live: bool,

    /// Organization number from the listing (1-based)
    #[arg(long)]
    pub org: Option<String>,

    /// Networks to target: `all` or comma-separated numbers from the listing
    #[arg(long)]
    pub networks: Option<String>,

    /// Directory for the log file and backup directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Dashboard API base URL
    #[arg(long, env = "FWGUARD_API_BASE")]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the resolved configuration and where it came from
    Show,

    /// Print the config directory path
    Dir,
}
